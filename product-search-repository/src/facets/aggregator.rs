//! Facet aggregation specs and bucket mapping.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use product_search_shared::{FacetBucket, Facets};

use crate::errors::ProductSearchError;
use crate::fields;

pub const PRICE_FACET: &str = "price";
pub const BRAND_FACET: &str = "brand";
pub const SIZE_FACET: &str = "size";
pub const COLOR_FACET: &str = "color";

const PRICE_AGG: &str = "price_ranges";
const BRAND_AGG: &str = "brands";
const SIZE_AGG: &str = "sku_sizes";
const COLOR_AGG: &str = "sku_colors";
/// Terms aggregation inside each nested SKU aggregation.
const SKU_TERMS_AGG: &str = "values";
/// Reverse-nested aggregation counting parent products per SKU bucket.
const PRODUCTS_AGG: &str = "products";

/// Default maximum number of term buckets per facet.
pub const DEFAULT_BUCKET_LIMIT: usize = 1000;

/// A labeled price range; `to` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub label: &'static str,
    pub from: Option<f64>,
    pub to: Option<f64>,
}

/// Fixed price ranges, in display order.
pub const PRICE_RANGES: [PriceRange; 3] = [
    PriceRange {
        label: "Cheap",
        from: Some(0.0),
        to: Some(100.0),
    },
    PriceRange {
        label: "Average",
        from: Some(100.0),
        to: Some(500.0),
    },
    PriceRange {
        label: "Expensive",
        from: Some(500.0),
        to: None,
    },
];

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "B: Deserialize<'de>"))]
struct Buckets<B> {
    #[serde(default)]
    buckets: Vec<B>,
}

#[derive(Debug, Deserialize)]
struct CountBucket {
    key: Value,
    doc_count: i64,
}

#[derive(Debug, Deserialize)]
struct NestedTerms {
    #[serde(rename = "values")]
    terms: Option<Buckets<ReverseNestedBucket>>,
}

#[derive(Debug, Deserialize)]
struct ReverseNestedBucket {
    key: Value,
    #[serde(rename = "products")]
    parents: DocCount,
}

#[derive(Debug, Deserialize)]
struct DocCount {
    doc_count: i64,
}

/// Builds the four facet aggregations and maps their buckets back into facets.
///
/// Size and color are counted through a reverse-nested step, so their counts
/// are numbers of distinct products having at least one matching SKU rather
/// than numbers of SKUs.
#[derive(Debug, Clone)]
pub struct FacetAggregator {
    bucket_limit: usize,
}

impl Default for FacetAggregator {
    fn default() -> Self {
        Self {
            bucket_limit: DEFAULT_BUCKET_LIMIT,
        }
    }
}

impl FacetAggregator {
    pub fn with_bucket_limit(bucket_limit: usize) -> Self {
        Self { bucket_limit }
    }

    /// Aggregation specs to send alongside the query.
    pub fn aggregations(&self) -> Value {
        let ranges: Vec<Value> = PRICE_RANGES
            .iter()
            .map(|range| {
                let mut spec = Map::new();
                spec.insert("key".to_string(), json!(range.label));
                if let Some(from) = range.from {
                    spec.insert("from".to_string(), json!(from));
                }
                if let Some(to) = range.to {
                    spec.insert("to".to_string(), json!(to));
                }
                Value::Object(spec)
            })
            .collect();

        let mut aggs = Map::new();
        aggs.insert(
            PRICE_AGG.to_string(),
            json!({
                "range": {
                    "field": fields::PRICE,
                    "keyed": false,
                    "ranges": ranges
                }
            }),
        );
        aggs.insert(
            BRAND_AGG.to_string(),
            json!({
                "terms": {
                    "field": fields::BRAND_KEYWORD,
                    "size": self.bucket_limit,
                    "order": [{"_count": "desc"}, {"_key": "asc"}]
                }
            }),
        );
        aggs.insert(SIZE_AGG.to_string(), self.sku_aggregation(fields::SKU_SIZE));
        aggs.insert(
            COLOR_AGG.to_string(),
            self.sku_aggregation(fields::SKU_COLOR),
        );
        Value::Object(aggs)
    }

    fn sku_aggregation(&self, field: &str) -> Value {
        let reverse_count = format!("{}.doc_count", PRODUCTS_AGG);
        let mut order_by_products = Map::new();
        order_by_products.insert(reverse_count, json!("desc"));

        let mut sub_aggs = Map::new();
        sub_aggs.insert(PRODUCTS_AGG.to_string(), json!({ "reverse_nested": {} }));

        let mut terms = Map::new();
        terms.insert(
            SKU_TERMS_AGG.to_string(),
            json!({
                "terms": {
                    "field": field,
                    "size": self.bucket_limit,
                    "order": [Value::Object(order_by_products), {"_key": "asc"}]
                },
                "aggs": sub_aggs
            }),
        );

        json!({
            "nested": { "path": fields::SKUS },
            "aggs": terms
        })
    }

    /// Map engine aggregation results into the four facets.
    ///
    /// Aggregations missing from the response yield empty facets, except price
    /// which always lists every range. Present but malformed aggregations are
    /// reported as parse errors.
    pub fn map_facets(&self, aggregations: &Map<String, Value>) -> Result<Facets, ProductSearchError> {
        let mut facets = Facets::new();
        facets.insert(PRICE_FACET.to_string(), Self::price_facet(aggregations)?);
        facets.insert(BRAND_FACET.to_string(), Self::brand_facet(aggregations)?);
        facets.insert(
            SIZE_FACET.to_string(),
            Self::sku_facet(aggregations, SIZE_AGG, |key| key.to_uppercase())?,
        );
        facets.insert(
            COLOR_FACET.to_string(),
            Self::sku_facet(aggregations, COLOR_AGG, capitalize)?,
        );
        Ok(facets)
    }

    fn price_facet(aggregations: &Map<String, Value>) -> Result<Vec<FacetBucket>, ProductSearchError> {
        let reported: Vec<CountBucket> = match aggregations.get(PRICE_AGG) {
            Some(value) => parse::<Buckets<CountBucket>>(PRICE_AGG, value)?.buckets,
            None => Vec::new(),
        };

        Ok(PRICE_RANGES
            .iter()
            .map(|range| {
                let count = reported
                    .iter()
                    .find(|b| key_text(&b.key) == range.label)
                    .map(|b| b.doc_count)
                    .unwrap_or(0);
                FacetBucket::new(range.label, count)
            })
            .collect())
    }

    fn brand_facet(aggregations: &Map<String, Value>) -> Result<Vec<FacetBucket>, ProductSearchError> {
        let Some(value) = aggregations.get(BRAND_AGG) else {
            return Ok(Vec::new());
        };

        let buckets = parse::<Buckets<CountBucket>>(BRAND_AGG, value)?
            .buckets
            .into_iter()
            .map(|b| FacetBucket::new(key_text(&b.key), b.doc_count))
            .collect();
        Ok(sorted(buckets))
    }

    fn sku_facet(
        aggregations: &Map<String, Value>,
        name: &str,
        display: impl Fn(&str) -> String,
    ) -> Result<Vec<FacetBucket>, ProductSearchError> {
        let Some(value) = aggregations.get(name) else {
            return Ok(Vec::new());
        };

        let buckets = parse::<NestedTerms>(name, value)?
            .terms
            .map(|terms| terms.buckets)
            .unwrap_or_default()
            .into_iter()
            .map(|b| FacetBucket::new(display(&key_text(&b.key)), b.parents.doc_count))
            .collect();
        Ok(sorted(buckets))
    }
}

fn parse<T: for<'de> Deserialize<'de>>(name: &str, value: &Value) -> Result<T, ProductSearchError> {
    T::deserialize(value)
        .map_err(|e| ProductSearchError::parse(format!("Malformed aggregation '{}': {}", name, e)))
}

fn key_text(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Count descending, then value ascending.
fn sorted(mut buckets: Vec<FacetBucket>) -> Vec<FacetBucket> {
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    buckets
}

/// Upper-case the first character, leave the rest unchanged.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sku_buckets(buckets: &[(&str, i64, i64)]) -> Value {
        let buckets: Vec<Value> = buckets
            .iter()
            .map(|(key, skus, products)| {
                json!({"key": key, "doc_count": skus, "products": {"doc_count": products}})
            })
            .collect();
        json!({"doc_count": 100, "values": {"buckets": buckets}})
    }

    /// Aggregations as the engine returns them for the query "jeans".
    fn jeans_aggregations() -> Map<String, Value> {
        json!({
            "price_ranges": {"buckets": [
                {"key": "Cheap", "from": 0.0, "to": 100.0, "doc_count": 2},
                {"key": "Average", "from": 100.0, "to": 500.0, "doc_count": 6},
                {"key": "Expensive", "from": 500.0, "doc_count": 0}
            ]},
            "brands": {"buckets": [
                {"key": "Calvin Klein", "doc_count": 4},
                {"key": "Levi's", "doc_count": 4}
            ]},
            "sku_sizes": sku_buckets(&[
                ("l", 14, 8), ("m", 16, 8), ("s", 9, 6), ("xl", 7, 5), ("xxl", 3, 3), ("xs", 2, 2)
            ]),
            "sku_colors": sku_buckets(&[
                ("blue", 41, 8), ("black", 15, 7), ("red", 1, 1), ("white", 2, 1)
            ])
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    fn pairs(buckets: &[FacetBucket]) -> Vec<(&str, i64)> {
        buckets.iter().map(|b| (b.value.as_str(), b.count)).collect()
    }

    #[test]
    fn test_aggregation_specs() {
        let aggs = FacetAggregator::default().aggregations();

        let ranges = aggs["price_ranges"]["range"]["ranges"].as_array().unwrap();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0], json!({"key": "Cheap", "from": 0.0, "to": 100.0}));
        assert_eq!(ranges[2], json!({"key": "Expensive", "from": 500.0}));

        assert_eq!(aggs["brands"]["terms"]["field"], "brand.keyword");
        assert_eq!(aggs["brands"]["terms"]["size"], 1000);
        assert_eq!(
            aggs["brands"]["terms"]["order"],
            json!([{"_count": "desc"}, {"_key": "asc"}])
        );

        let sizes = &aggs["sku_sizes"];
        assert_eq!(sizes["nested"]["path"], "skus");
        let terms = &sizes["aggs"]["values"];
        assert_eq!(terms["terms"]["field"], "skus.size");
        assert_eq!(
            terms["terms"]["order"],
            json!([{"products.doc_count": "desc"}, {"_key": "asc"}])
        );
        assert_eq!(terms["aggs"]["products"], json!({"reverse_nested": {}}));

        assert_eq!(aggs["sku_colors"]["aggs"]["values"]["terms"]["field"], "skus.color");
    }

    #[test]
    fn test_bucket_limit() {
        let aggs = FacetAggregator::with_bucket_limit(25).aggregations();
        assert_eq!(aggs["brands"]["terms"]["size"], 25);
        assert_eq!(aggs["sku_colors"]["aggs"]["values"]["terms"]["size"], 25);
    }

    #[test]
    fn test_map_jeans_facets() {
        let facets = FacetAggregator::default()
            .map_facets(&jeans_aggregations())
            .unwrap();

        assert_eq!(
            pairs(&facets["brand"]),
            vec![("Calvin Klein", 4), ("Levi's", 4)]
        );
        assert_eq!(
            pairs(&facets["price"]),
            vec![("Cheap", 2), ("Average", 6), ("Expensive", 0)]
        );
        assert_eq!(
            pairs(&facets["color"]),
            vec![("Blue", 8), ("Black", 7), ("Red", 1), ("White", 1)]
        );
        assert_eq!(
            pairs(&facets["size"]),
            vec![("L", 8), ("M", 8), ("S", 6), ("XL", 5), ("XXL", 3), ("XS", 2)]
        );
    }

    #[test]
    fn test_sku_facets_use_product_counts() {
        let facets = FacetAggregator::default()
            .map_facets(&jeans_aggregations())
            .unwrap();
        // "m" has more SKUs than "l" but the same number of products
        let m = facets["size"].iter().find(|b| b.value == "M").unwrap();
        assert_eq!(m.count, 8);
        let blue = facets["color"].iter().find(|b| b.value == "Blue").unwrap();
        assert_eq!(blue.count, 8);
    }

    #[test]
    fn test_buckets_resorted_by_count_then_value() {
        let aggs = json!({
            "brands": {"buckets": [
                {"key": "Wrangler", "doc_count": 1},
                {"key": "Levi's", "doc_count": 3},
                {"key": "Diesel", "doc_count": 1}
            ]},
            "sku_colors": sku_buckets(&[("white", 1, 1), ("red", 5, 2), ("black", 1, 1)])
        });
        let facets = FacetAggregator::default()
            .map_facets(aggs.as_object().unwrap())
            .unwrap();

        assert_eq!(
            pairs(&facets["brand"]),
            vec![("Levi's", 3), ("Diesel", 1), ("Wrangler", 1)]
        );
        assert_eq!(
            pairs(&facets["color"]),
            vec![("Red", 2), ("Black", 1), ("White", 1)]
        );
    }

    #[test]
    fn test_price_facet_fixed_order_with_missing_ranges() {
        let aggs = json!({
            "price_ranges": {"buckets": [
                {"key": "Expensive", "from": 500.0, "doc_count": 3}
            ]}
        });
        let facets = FacetAggregator::default()
            .map_facets(aggs.as_object().unwrap())
            .unwrap();
        assert_eq!(
            pairs(&facets["price"]),
            vec![("Cheap", 0), ("Average", 0), ("Expensive", 3)]
        );
    }

    #[test]
    fn test_missing_aggregations() {
        let facets = FacetAggregator::default().map_facets(&Map::new()).unwrap();
        assert_eq!(facets["price"].len(), 3);
        assert!(facets["brand"].is_empty());
        assert!(facets["size"].is_empty());
        assert!(facets["color"].is_empty());
    }

    #[test]
    fn test_aggregations_without_buckets_map_to_empty_facets() {
        let aggs = json!({
            "brands": {},
            "price_ranges": {},
            "sku_sizes": {"doc_count": 0, "values": {}},
            "sku_colors": {"doc_count": 0}
        });
        let facets = FacetAggregator::default()
            .map_facets(aggs.as_object().unwrap())
            .unwrap();

        assert!(facets["brand"].is_empty());
        assert!(facets["size"].is_empty());
        assert!(facets["color"].is_empty());
        assert!(facets["price"].iter().all(|bucket| bucket.count == 0));
    }

    #[test]
    fn test_malformed_aggregation() {
        let aggs = json!({"brands": {"buckets": [{"key": "Levi's"}]}});
        let result = FacetAggregator::default().map_facets(aggs.as_object().unwrap());
        assert!(matches!(result, Err(ProductSearchError::ParseError(_))));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("blue"), "Blue");
        assert_eq!(capitalize("navy blue"), "Navy blue");
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
    }
}
