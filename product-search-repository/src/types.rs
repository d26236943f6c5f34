//! Request and response types exchanged with the search engine.

use product_search_shared::ProductDocument;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request to create a physical index.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexRequest {
    /// Physical index name, e.g. `products_20240101120000`.
    pub name: String,
    /// Index settings document.
    pub settings: Value,
    /// Index mappings document.
    pub mappings: Value,
    /// Alias to bind to the index at creation time, if any.
    pub alias: Option<String>,
}

/// One action of an atomic alias update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasAction {
    /// Bind `alias` to `index`.
    Add { index: String, alias: String },
    /// Unbind `alias` from `index`.
    Remove { index: String, alias: String },
}

/// A document queued for bulk indexing with its explicit engine ID.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDocument {
    pub id: String,
    pub source: ProductDocument,
}

/// A single document that failed inside a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkItemFailure {
    /// The document ID, when known.
    pub id: Option<String>,
    /// Engine-provided failure reason.
    pub reason: String,
}

/// Summary of a bulk write.
///
/// A bulk write is allowed to partially fail. Callers decide whether a partial
/// failure matters; index rotation only logs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    /// Number of documents submitted.
    pub submitted: usize,
    /// Number of items the engine reported back.
    pub processed: usize,
    /// Number of items that were written.
    pub succeeded: usize,
    /// Items that failed, including documents that could not be submitted.
    pub failures: Vec<BulkItemFailure>,
}

impl BulkSummary {
    /// Number of failed documents.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when every submitted document was written.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.processed == self.submitted
    }

    /// Human readable list of failures, one per line.
    pub fn failure_message(&self) -> String {
        self.failures
            .iter()
            .map(|f| match &f.id {
                Some(id) => format!("[{}]: {}", id, f.reason),
                None => format!("[?]: {}", f.reason),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Raw search response as returned by the engine.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EngineSearchResponse {
    #[serde(default)]
    pub hits: EngineHits,
    /// Aggregation results keyed by aggregation name.
    #[serde(default)]
    pub aggregations: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EngineHits {
    #[serde(default)]
    pub total: Option<EngineTotal>,
    #[serde(default)]
    pub hits: Vec<EngineHit>,
}

/// Total hit count, either the modern `{"value": n, "relation": ...}` object or a bare number.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EngineTotal {
    Count(i64),
    Object { value: i64 },
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EngineHit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_source", default)]
    pub source: ProductDocument,
}

impl EngineSearchResponse {
    /// Total number of matching documents.
    pub fn total_hits(&self) -> i64 {
        match self.hits.total {
            Some(EngineTotal::Count(n)) | Some(EngineTotal::Object { value: n }) => n,
            None => self.hits.hits.len() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_engine_response_object_total() {
        let response: EngineSearchResponse = serde_json::from_value(json!({
            "took": 3,
            "hits": {
                "total": {"value": 8, "relation": "eq"},
                "hits": [{"_id": "2", "_score": 1.2, "_source": {"id": "2", "name": "Jeans"}}]
            },
            "aggregations": {"brands": {"buckets": []}}
        }))
        .unwrap();

        assert_eq!(response.total_hits(), 8);
        assert_eq!(response.hits.hits[0].id.as_deref(), Some("2"));
        assert_eq!(response.hits.hits[0].source["name"], "Jeans");
        assert!(response.aggregations.contains_key("brands"));
    }

    #[test]
    fn test_engine_response_numeric_total() {
        let response: EngineSearchResponse =
            serde_json::from_value(json!({"hits": {"total": 3, "hits": []}})).unwrap();
        assert_eq!(response.total_hits(), 3);
        assert!(response.aggregations.is_empty());
    }

    #[test]
    fn test_bulk_summary_completeness() {
        let mut summary = BulkSummary {
            submitted: 2,
            processed: 2,
            succeeded: 2,
            failures: vec![],
        };
        assert!(summary.is_complete());

        summary.processed = 1;
        assert!(!summary.is_complete());

        summary.processed = 2;
        summary.succeeded = 1;
        summary.failures.push(BulkItemFailure {
            id: Some("7".to_string()),
            reason: "mapper_parsing_exception".to_string(),
        });
        assert!(!summary.is_complete());
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failure_message(), "[7]: mapper_parsing_exception");
    }
}
