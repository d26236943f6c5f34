//! OpenSearch implementation of the search engine interfaces.
//!
//! This module provides a concrete implementation of `SearchEngine` and
//! `IndexAdmin` using OpenSearch as the backend.

mod index_config;
mod provider;

pub use index_config::{IndexConfig, DEFAULT_INDEX_ALIAS, DEFAULT_RETENTION, INDEX_TIMESTAMP_FORMAT};
pub use provider::OpenSearchProvider;
