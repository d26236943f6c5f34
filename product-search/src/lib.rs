//! # Product Search
//!
//! Faceted product search API backed by OpenSearch.
//!
//! ## Architecture
//!
//! 1. **Server**: axum routes for search, index rotation and health
//! 2. **Service**: `ProductSearchService` answers search requests with facets
//! 3. **Lifecycle**: `IndexLifecycleController` rebuilds the index behind the alias
//! 4. **Resources**: settings, mappings and seed data read from disk
//!
//! ## Modules
//!
//! - [`config`]: Environment configuration and dependency initialization
//! - [`resources`]: Filesystem resource loader
//! - [`server`]: HTTP routes and handlers

pub mod config;
pub mod resources;
pub mod server;

pub use config::{AppConfig, Dependencies};

use product_search_repository::ProductSearchError;
use thiserror::Error;

/// Errors that can occur during service startup or execution.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Index rotation failed.
    #[error("Rotation error: {0}")]
    RotationError(#[from] ProductSearchError),

    /// HTTP server error.
    #[error("Server error: {0}")]
    ServerError(String),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a server error.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        Self::ServerError(err.to_string())
    }
}
