//! Error types for the product search repository.
//!
//! This module provides a unified error type for search, rotation and
//! configuration failures.

mod product_search_error;

pub use product_search_error::ProductSearchError;
