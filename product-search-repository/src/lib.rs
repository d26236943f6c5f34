//! # Product Search Repository
//!
//! This crate holds the core of the product search service: translating free
//! text into engine queries, mapping aggregation buckets into facets, and
//! rotating the product index behind its alias. It includes definitions for
//! errors and engine interfaces, and a concrete implementation for OpenSearch.

pub mod config;
pub mod errors;
pub mod facets;
pub mod fields;
pub mod interfaces;
pub mod lifecycle;
pub mod opensearch;
pub mod query;
pub mod service;
pub mod types;

pub use config::SearchServiceConfig;
pub use errors::ProductSearchError;
pub use facets::FacetAggregator;
pub use interfaces::{IndexAdmin, ResourceKind, ResourceLoader, SearchEngine};
pub use lifecycle::{IndexLifecycleController, PublishOrder, RotationReport};
pub use opensearch::{IndexConfig, OpenSearchProvider};
pub use query::{ClassificationTable, ClassifiedTokens, QueryTranslator};
pub use service::{Paging, ProductSearchService};
pub use types::{
    AliasAction, BulkDocument, BulkItemFailure, BulkSummary, CreateIndexRequest,
    EngineSearchResponse,
};
