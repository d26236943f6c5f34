//! Resource loader trait definition.

use std::fmt;

use async_trait::async_trait;

use crate::errors::ProductSearchError;

/// The resources an index rotation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Index settings (analyzers, shards, replicas).
    Settings,
    /// Index mappings.
    Mappings,
    /// JSON array of product documents loaded into a fresh index.
    SeedData,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings => write!(f, "settings"),
            Self::Mappings => write!(f, "mappings"),
            Self::SeedData => write!(f, "seed data"),
        }
    }
}

/// Supplies the raw bytes of rotation resources.
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    /// Load a resource.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(bytes))` - The resource content
    /// * `Ok(None)` - If the resource does not exist
    /// * `Err(ProductSearchError)` - If the resource exists but could not be read
    async fn load(&self, kind: ResourceKind) -> Result<Option<Vec<u8>>, ProductSearchError>;
}
