//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchEngine` and
//! `IndexAdmin` using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesGetAliasParts, IndicesGetParts},
    params::Refresh,
    BulkParts, OpenSearch, SearchParts,
};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::errors::ProductSearchError;
use crate::interfaces::{IndexAdmin, SearchEngine};
use crate::types::{
    AliasAction, BulkDocument, BulkItemFailure, BulkSummary, CreateIndexRequest,
    EngineSearchResponse,
};

/// OpenSearch provider implementation.
///
/// One client serves both the query path and index administration.
///
/// # Example
///
/// ```ignore
/// let provider = OpenSearchProvider::new("http://localhost:9200").await?;
/// provider.check_connection().await?;
/// let aliased = provider.indices_for_alias("products").await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(ProductSearchError)` - If the URL is invalid or the transport cannot be built
    pub async fn new(url: &str) -> Result<Self, ProductSearchError> {
        let parsed_url =
            Url::parse(url).map_err(|e| ProductSearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| ProductSearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch provider");

        Ok(Self { client })
    }

    /// Verify the cluster answers a ping.
    pub async fn check_connection(&self) -> Result<(), ProductSearchError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| ProductSearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(ProductSearchError::connection(format!(
                "Ping failed with status {}",
                status
            )));
        }
        Ok(())
    }

    /// Turn a non-success response into a transport error, otherwise parse its JSON body.
    async fn json_body(response: Response, operation: &str) -> Result<Value, ProductSearchError> {
        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, operation, "OpenSearch request failed");
            return Err(ProductSearchError::transport(format!(
                "{} failed with status {}: {}",
                operation, status, error_body
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProductSearchError::parse(format!("{} response: {}", operation, e)))
    }
}

/// Whether a cluster-state change response carries `"acknowledged": true`.
fn is_acknowledged(body: &Value) -> bool {
    body.get("acknowledged")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Index names are the top-level keys of get-index and get-alias responses.
fn index_names(body: &Value) -> Vec<String> {
    let mut names: Vec<String> = body
        .as_object()
        .map(|indices| indices.keys().cloned().collect())
        .unwrap_or_default();
    names.sort();
    names
}

fn alias_actions_body(actions: &[AliasAction]) -> Value {
    let actions: Vec<Value> = actions
        .iter()
        .map(|action| match action {
            AliasAction::Add { index, alias } => json!({"add": {"index": index, "alias": alias}}),
            AliasAction::Remove { index, alias } => {
                json!({"remove": {"index": index, "alias": alias}})
            }
        })
        .collect();
    json!({ "actions": actions })
}

fn create_index_body(request: &CreateIndexRequest) -> Value {
    let mut body = Map::new();
    body.insert("settings".to_string(), request.settings.clone());
    body.insert("mappings".to_string(), request.mappings.clone());
    if let Some(alias) = &request.alias {
        let mut aliases = Map::new();
        aliases.insert(alias.clone(), json!({}));
        body.insert("aliases".to_string(), Value::Object(aliases));
    }
    Value::Object(body)
}

/// Read per-item outcomes of a bulk response.
fn summarize_bulk(submitted: usize, body: &Value) -> BulkSummary {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut summary = BulkSummary {
        submitted,
        processed: items.len(),
        ..Default::default()
    };

    for item in items {
        // each item is keyed by its operation, e.g. {"index": {...}}
        let Some(result) = item.as_object().and_then(|op| op.values().next()) else {
            continue;
        };
        match result.get("error") {
            Some(error) if !error.is_null() => {
                let reason = error
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string());
                summary.failures.push(BulkItemFailure {
                    id: result.get("_id").and_then(Value::as_str).map(str::to_string),
                    reason,
                });
            }
            _ => summary.succeeded += 1,
        }
    }

    summary
}

#[async_trait]
impl SearchEngine for OpenSearchProvider {
    async fn search(
        &self,
        index: &str,
        body: &Value,
    ) -> Result<EngineSearchResponse, ProductSearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body.clone())
            .send()
            .await
            .map_err(|e| ProductSearchError::transport(e.to_string()))?;

        let body = Self::json_body(response, "Search").await?;
        serde_json::from_value(body)
            .map_err(|e| ProductSearchError::parse(format!("Search response: {}", e)))
    }
}

#[async_trait]
impl IndexAdmin for OpenSearchProvider {
    /// Create a physical index, binding the alias in the same request when given.
    async fn create_index(&self, request: &CreateIndexRequest) -> Result<bool, ProductSearchError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&request.name))
            .body(create_index_body(request))
            .send()
            .await
            .map_err(|e| ProductSearchError::transport(e.to_string()))?;

        let body = Self::json_body(response, "Create index").await?;
        let acknowledged = is_acknowledged(&body);
        debug!(index = %request.name, alias = ?request.alias, acknowledged, "Create index answered");
        Ok(acknowledged)
    }

    /// List indices the alias points to; a missing alias answers 404 and yields none.
    async fn indices_for_alias(&self, alias: &str) -> Result<Vec<String>, ProductSearchError> {
        let response = self
            .client
            .indices()
            .get_alias(IndicesGetAliasParts::Name(&[alias]))
            .send()
            .await
            .map_err(|e| ProductSearchError::transport(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            debug!(alias = %alias, "Alias does not exist yet");
            return Ok(Vec::new());
        }

        let body = Self::json_body(response, "Get alias").await?;
        Ok(index_names(&body))
    }

    async fn update_aliases(&self, actions: &[AliasAction]) -> Result<bool, ProductSearchError> {
        let response = self
            .client
            .indices()
            .update_aliases()
            .body(alias_actions_body(actions))
            .send()
            .await
            .map_err(|e| ProductSearchError::transport(e.to_string()))?;

        let body = Self::json_body(response, "Update aliases").await?;
        Ok(is_acknowledged(&body))
    }

    async fn list_indices(&self, pattern: &str) -> Result<Vec<String>, ProductSearchError> {
        let response = self
            .client
            .indices()
            .get(IndicesGetParts::Index(&[pattern]))
            .send()
            .await
            .map_err(|e| ProductSearchError::transport(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            return Ok(Vec::new());
        }

        let body = Self::json_body(response, "Get indices").await?;
        Ok(index_names(&body))
    }

    async fn delete_indices(&self, indices: &[String]) -> Result<bool, ProductSearchError> {
        if indices.is_empty() {
            return Ok(true);
        }

        let names: Vec<&str> = indices.iter().map(String::as_str).collect();
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&names))
            .send()
            .await
            .map_err(|e| ProductSearchError::transport(e.to_string()))?;

        let body = Self::json_body(response, "Delete indices").await?;
        Ok(is_acknowledged(&body))
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: &[BulkDocument],
    ) -> Result<BulkSummary, ProductSearchError> {
        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            body.push(JsonBody::new(json!({"index": {"_id": document.id}})));
            body.push(JsonBody::new(Value::Object(document.source.clone())));
        }

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .refresh(Refresh::True)
            .body(body)
            .send()
            .await
            .map_err(|e| ProductSearchError::transport(e.to_string()))?;

        let body = Self::json_body(response, "Bulk index").await?;
        let summary = summarize_bulk(documents.len(), &body);
        if summary.failed() > 0 {
            warn!(
                index = %index,
                failed = summary.failed(),
                "Bulk request reported item failures"
            );
        }
        Ok(summary)
    }
}
