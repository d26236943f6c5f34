//! Index management trait definition.

use async_trait::async_trait;

use crate::errors::ProductSearchError;
use crate::types::{AliasAction, BulkDocument, BulkSummary, CreateIndexRequest};

/// Index and alias management operations needed for blue-green rotation.
///
/// Methods that change cluster state return whether the engine acknowledged
/// the change. Deciding what an unacknowledged change means is left to the
/// caller.
#[async_trait]
pub trait IndexAdmin: Send + Sync {
    /// Create a physical index with settings, mappings and an optional alias.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the creation was acknowledged
    /// * `Ok(false)` - If the engine answered but did not acknowledge
    /// * `Err(ProductSearchError)` - On transport failure
    async fn create_index(&self, request: &CreateIndexRequest) -> Result<bool, ProductSearchError>;

    /// List the physical indices the alias currently points to.
    ///
    /// An alias that does not exist yields an empty list.
    async fn indices_for_alias(&self, alias: &str) -> Result<Vec<String>, ProductSearchError>;

    /// Apply all alias actions as one atomic update.
    async fn update_aliases(&self, actions: &[AliasAction]) -> Result<bool, ProductSearchError>;

    /// List physical index names matching a wildcard pattern such as `products_*`.
    async fn list_indices(&self, pattern: &str) -> Result<Vec<String>, ProductSearchError>;

    /// Delete the given physical indices in one request.
    async fn delete_indices(&self, indices: &[String]) -> Result<bool, ProductSearchError>;

    /// Index all documents into `index` in a single batch, refreshing immediately.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkSummary)` - Per-item outcome; individual documents may have failed
    /// * `Err(ProductSearchError)` - If the bulk request as a whole failed
    async fn bulk_index(
        &self,
        index: &str,
        documents: &[BulkDocument],
    ) -> Result<BulkSummary, ProductSearchError>;
}
