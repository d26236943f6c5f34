//! Search request types for the product search service.

use serde::{Deserialize, Serialize};

/// Inbound product search request.
///
/// Every field is optional. Missing or non-positive `page`/`size` values are
/// replaced by configured defaults before the engine is queried, and a missing
/// or too-short `text_query` short-circuits to an empty response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free-text query, e.g. `"calvin klein l blue skinny jeans"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_query: Option<String>,

    /// 1-based page number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i32>,

    /// Page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,
}

impl SearchRequest {
    /// Create a request for the given text with default paging.
    ///
    /// # Example
    ///
    /// ```
    /// use product_search_shared::SearchRequest;
    ///
    /// let request = SearchRequest::text("jeans").with_page(2).with_size(5);
    /// assert_eq!(request.page, Some(2));
    /// ```
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            text_query: Some(query.into()),
            page: None,
            size: None,
        }
    }

    /// Set the page number.
    pub fn with_page(mut self, page: i32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size.
    pub fn with_size(mut self, size: i32) -> Self {
        self.size = Some(size);
        self
    }
}
