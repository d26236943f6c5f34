//! # Product Search Shared
//!
//! This crate defines the data structures shared between the product search
//! repository and the HTTP service: the inbound search request, the outbound
//! response with its facets, and the loosely-typed product document.

pub mod types;

pub use types::product_document::{document_id, ProductDocument};
pub use types::search_request::SearchRequest;
pub use types::search_response::{FacetBucket, Facets, SearchResponse};
