//! Configuration types for the ProductSearchService.

/// Default minimum number of characters a text query needs.
pub const DEFAULT_MIN_QUERY_LENGTH: usize = 3;

/// Default 1-based page number.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Configuration for the ProductSearchService.
///
/// Controls request validation and the paging defaults applied when a request
/// omits `page`/`size` or sends non-positive values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchServiceConfig {
    /// Queries shorter than this, counted in characters as sent, are answered
    /// with an empty response without contacting the engine.
    pub min_query_length: usize,
    /// Page used when the request has none or a non-positive one; 0 is read as 1.
    pub default_page: u32,
    /// Page size used when the request has none or a non-positive one.
    pub default_size: u32,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            min_query_length: DEFAULT_MIN_QUERY_LENGTH,
            default_page: DEFAULT_PAGE,
            default_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchServiceConfig {
    /// Create a config with a custom minimum query length.
    pub fn with_min_query_length(mut self, min_query_length: usize) -> Self {
        self.min_query_length = min_query_length;
        self
    }

    /// Create a config with custom paging defaults.
    ///
    /// Zero values are raised to 1 so that paging stays positive.
    pub fn with_paging(mut self, default_page: u32, default_size: u32) -> Self {
        self.default_page = default_page.max(1);
        self.default_size = default_size.max(1);
        self
    }
}
