//! Search response types for the product search service.
//!
//! This module defines the response returned for a product search: the total
//! hit count, the raw product documents of the requested page and the facets
//! describing the whole result set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::product_document::ProductDocument;

/// One bucket of a facet: a displayable value and the number of products in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetBucket {
    pub value: String,
    pub count: i64,
}

impl FacetBucket {
    pub fn new(value: impl Into<String>, count: i64) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

/// Facets keyed by facet name (`price`, `brand`, `size`, `color`).
pub type Facets = BTreeMap<String, Vec<FacetBucket>>;

/// Complete product search response.
///
/// Empty `products` and `facets` are omitted from the serialized JSON rather
/// than written as empty collections or nulls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Total number of matching products.
    /// May be greater than the number of returned products due to pagination.
    pub total_hits: i64,

    /// Products of the requested page, in engine order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<ProductDocument>,

    /// Facets over the full result set.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: Facets,
}

impl SearchResponse {
    /// Create an empty search response.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if there are no products in this response.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Returns the buckets of a facet, if present.
    pub fn facet(&self, name: &str) -> Option<&[FacetBucket]> {
        self.facets.get(name).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_response_omits_collections() {
        let json = serde_json::to_value(SearchResponse::empty()).unwrap();
        assert_eq!(json, json!({"totalHits": 0}));
    }

    #[test]
    fn test_populated_response_serialization() {
        let mut facets = Facets::new();
        facets.insert(
            "brand".to_string(),
            vec![FacetBucket::new("Calvin Klein", 4), FacetBucket::new("Levi's", 4)],
        );
        let product = json!({"id": "2", "name": "Women ankle skinny jeans"});
        let response = SearchResponse {
            total_hits: 1,
            products: vec![product.as_object().cloned().unwrap()],
            facets,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["totalHits"], 1);
        assert_eq!(json["products"][0]["id"], "2");
        assert_eq!(json["facets"]["brand"][1]["value"], "Levi's");
        assert_eq!(json["facets"]["brand"][1]["count"], 4);
    }

    #[test]
    fn test_facet_lookup() {
        let mut response = SearchResponse::empty();
        assert!(response.facet("size").is_none());
        response
            .facets
            .insert("size".to_string(), vec![FacetBucket::new("L", 8)]);
        assert_eq!(response.facet("size").unwrap()[0], FacetBucket::new("L", 8));
        assert!(response.is_empty());
    }
}
