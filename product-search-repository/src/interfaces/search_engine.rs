//! Search engine query trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ProductSearchError;
use crate::types::EngineSearchResponse;

/// Executes structured search requests against the engine.
///
/// Implementations are injected into `ProductSearchService` so that the query
/// and facet logic can be tested with mock engines.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Run one search round trip.
    ///
    /// # Arguments
    ///
    /// * `index` - Index or alias to search
    /// * `body` - Complete request body (query, aggregations, sort, paging)
    ///
    /// # Returns
    ///
    /// * `Ok(EngineSearchResponse)` - Hits, total and raw aggregation results
    /// * `Err(ProductSearchError)` - On transport failure or an unparseable response
    async fn search(
        &self,
        index: &str,
        body: &Value,
    ) -> Result<EngineSearchResponse, ProductSearchError>;
}
