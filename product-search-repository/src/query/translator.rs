//! Translation of free text into an engine boolean query.

use serde_json::{json, Value};
use tracing::debug;

use super::classification::{ClassificationTable, ClassifiedTokens};
use crate::fields;

/// Boost of the optional shingle phrase clause.
pub const PHRASE_BOOST: f64 = 5.0;

/// Turns free text into a structured boolean query.
///
/// - Size and color tokens become a `nested` filter requiring all of them on
///   the same SKU.
/// - Remaining tokens become a required `cross_fields` match over `name` and
///   `brand` (AND semantics), plus an optional phrase match over the shingle
///   subfields that only influences ranking.
#[derive(Debug, Clone, Default)]
pub struct QueryTranslator {
    table: ClassificationTable,
}

impl QueryTranslator {
    pub fn new(table: ClassificationTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ClassificationTable {
        &self.table
    }

    /// Translate text into a `bool` query.
    pub fn translate(&self, text: &str) -> Value {
        let tokens = self.table.classify(text);
        debug!(
            size = ?tokens.size,
            color = ?tokens.color,
            general = ?tokens.general,
            "Classified query tokens"
        );
        Self::build_query(&tokens)
    }

    /// Build the `bool` query for already classified tokens.
    pub fn build_query(tokens: &ClassifiedTokens) -> Value {
        let mut must = Vec::new();
        let mut should = Vec::new();

        if let Some(nested) = Self::sku_filter(tokens) {
            must.push(nested);
        }

        if let Some(text) = tokens.general_text() {
            must.push(json!({
                "multi_match": {
                    "query": text,
                    "fields": [fields::NAME, fields::BRAND],
                    "type": "cross_fields",
                    "operator": "and"
                }
            }));
            should.push(json!({
                "multi_match": {
                    "query": text,
                    "fields": [fields::NAME_SHINGLES, fields::BRAND_SHINGLES],
                    "type": "phrase",
                    "boost": PHRASE_BOOST
                }
            }));
        }

        let mut bool_query = serde_json::Map::new();
        if !must.is_empty() {
            bool_query.insert("must".to_string(), Value::Array(must));
        }
        if !should.is_empty() {
            bool_query.insert("should".to_string(), Value::Array(should));
        }

        json!({ "bool": bool_query })
    }

    /// Nested filter requiring every matched attribute on one SKU.
    fn sku_filter(tokens: &ClassifiedTokens) -> Option<Value> {
        if !tokens.has_attributes() {
            return None;
        }

        let mut sku_must = Vec::new();
        if let Some(color) = &tokens.color {
            sku_must.push(field_match(fields::SKU_COLOR, color));
        }
        if let Some(size) = &tokens.size {
            sku_must.push(field_match(fields::SKU_SIZE, size));
        }

        Some(json!({
            "nested": {
                "path": fields::SKUS,
                "score_mode": "avg",
                "query": {
                    "bool": { "must": sku_must }
                }
            }
        }))
    }
}

fn field_match(field: &str, value: &str) -> Value {
    let mut clause = serde_json::Map::new();
    clause.insert(field.to_string(), Value::String(value.to_string()));
    json!({ "match": clause })
}
