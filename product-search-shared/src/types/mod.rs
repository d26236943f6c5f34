//! This module defines the core data structures used across the product search service.
//! It re-exports the request, response and document types.

pub mod product_document;
pub mod search_request;
pub mod search_response;

pub use product_document::ProductDocument;
pub use search_request::SearchRequest;
pub use search_response::{FacetBucket, Facets, SearchResponse};
