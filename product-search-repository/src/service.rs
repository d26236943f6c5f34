//! Product search service implementation.
//!
//! This module provides the orchestrator of the search path. It validates and
//! defaults an inbound request, combines the translated query with the facet
//! aggregations into one engine round trip and assembles the response.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, error, instrument};

use product_search_shared::{SearchRequest, SearchResponse};

use crate::config::SearchServiceConfig;
use crate::errors::ProductSearchError;
use crate::facets::FacetAggregator;
use crate::fields;
use crate::interfaces::SearchEngine;
use crate::query::QueryTranslator;

/// Effective paging of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    /// 1-based page number.
    pub page: u32,
    pub size: u32,
}

impl Paging {
    /// Offset of the first hit.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.size)
    }
}

/// The main service answering product search requests.
///
/// Searching never fails from the caller's point of view: a query that is too
/// short short-circuits to an empty response without contacting the engine,
/// and engine failures are logged and degrade to the same empty response.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use product_search_repository::{OpenSearchProvider, ProductSearchService};
/// use product_search_shared::SearchRequest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = Arc::new(OpenSearchProvider::new("http://localhost:9200").await?);
/// let service = ProductSearchService::new(provider, "products");
///
/// let response = service.search(&SearchRequest::text("blue jeans")).await;
/// println!("{} hits", response.total_hits);
/// # Ok(())
/// # }
/// ```
pub struct ProductSearchService {
    engine: Arc<dyn SearchEngine>,
    alias: String,
    translator: QueryTranslator,
    aggregator: FacetAggregator,
    config: SearchServiceConfig,
}

impl ProductSearchService {
    /// Create a new ProductSearchService with default configuration.
    ///
    /// # Arguments
    ///
    /// * `engine` - The search engine (e.g., `OpenSearchProvider`)
    /// * `alias` - Alias the searches run against
    pub fn new(engine: Arc<dyn SearchEngine>, alias: impl Into<String>) -> Self {
        Self {
            engine,
            alias: alias.into(),
            translator: QueryTranslator::default(),
            aggregator: FacetAggregator::default(),
            config: SearchServiceConfig::default(),
        }
    }

    /// Replace the validation and paging configuration.
    pub fn with_config(mut self, config: SearchServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the query translator, e.g. to use custom vocabularies.
    pub fn with_translator(mut self, translator: QueryTranslator) -> Self {
        self.translator = translator;
        self
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn config(&self) -> &SearchServiceConfig {
        &self.config
    }

    /// Answer a search request.
    ///
    /// # Returns
    ///
    /// The matching products with facets, or an empty response when the query
    /// is too short or the engine round trip failed.
    #[instrument(skip_all, fields(alias = %self.alias))]
    pub async fn search(&self, request: &SearchRequest) -> SearchResponse {
        let Some(text) = self.validated_text(request) else {
            debug!(text_query = ?request.text_query, "Query too short, skipping search");
            return SearchResponse::empty();
        };

        let paging = self.paging(request);
        match self.execute(text, paging).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, text_query = %text, "Search failed, returning empty response");
                SearchResponse::empty()
            }
        }
    }

    /// Trimmed query text, or `None` when it is missing, blank or shorter than the minimum.
    ///
    /// The minimum applies to the text as sent, surrounding whitespace included.
    fn validated_text<'a>(&self, request: &'a SearchRequest) -> Option<&'a str> {
        let raw = request.text_query.as_deref()?;
        if raw.chars().count() < self.config.min_query_length {
            return None;
        }
        let text = raw.trim();
        (!text.is_empty()).then_some(text)
    }

    /// Apply paging defaults; missing and non-positive values are treated alike.
    ///
    /// The configured defaults are raised to 1 as well, so paging is always positive.
    pub fn paging(&self, request: &SearchRequest) -> Paging {
        let positive = |value: Option<i32>| value.filter(|v| *v > 0).map(|v| v as u32);
        Paging {
            page: positive(request.page).unwrap_or(self.config.default_page.max(1)),
            size: positive(request.size).unwrap_or(self.config.default_size.max(1)),
        }
    }

    /// Build the complete engine request body for one search.
    pub fn request_body(&self, text: &str, paging: Paging) -> Value {
        json!({
            "query": self.translator.translate(text),
            "aggs": self.aggregator.aggregations(),
            "from": paging.offset(),
            "size": paging.size,
            "sort": [sort_desc(fields::SCORE), sort_desc(fields::DOC_ID)]
        })
    }

    async fn execute(&self, text: &str, paging: Paging) -> Result<SearchResponse, ProductSearchError> {
        let body = self.request_body(text, paging);
        let engine_response = self.engine.search(&self.alias, &body).await?;

        let facets = self.aggregator.map_facets(&engine_response.aggregations)?;
        let total_hits = engine_response.total_hits();
        let ids: Vec<&str> = engine_response
            .hits
            .hits
            .iter()
            .filter_map(|hit| hit.id.as_deref())
            .collect();
        debug!(
            total_hits,
            ids = ?ids,
            page = paging.page,
            size = paging.size,
            "Search completed"
        );

        let products = engine_response
            .hits
            .hits
            .into_iter()
            .map(|hit| hit.source)
            .collect();

        Ok(SearchResponse {
            total_hits,
            products,
            facets,
        })
    }
}

fn sort_desc(field: &str) -> Value {
    let mut sort = Map::new();
    sort.insert(field.to_string(), json!({ "order": "desc" }));
    Value::Object(sort)
}
