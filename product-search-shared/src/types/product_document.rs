//! Product document types for the search index.
//!
//! Products are passed through the service without being interpreted. They are
//! kept as ordered JSON objects so that arbitrary catalog schemas survive the
//! round trip from seed data to the index and back out of search hits.

use serde_json::{Map, Value};

/// Name of the field holding the document identifier.
pub const ID_FIELD: &str = "id";

/// A product as stored in the search engine.
///
/// Field order is preserved. At minimum a catalog product carries `id`, `name`,
/// `brand`, `price` and a `skus` array whose entries carry `color` and `size`,
/// but nothing here depends on that shape except [`document_id`].
pub type ProductDocument = Map<String, Value>;

/// Extract the engine document ID from a product's `id` field.
///
/// Strings are used verbatim; numbers and booleans are rendered as their JSON
/// text. Returns `None` when the field is missing, null, or a composite value.
///
/// # Example
///
/// ```
/// use product_search_shared::document_id;
/// use serde_json::json;
///
/// let product = json!({"id": 42, "name": "Slim jeans"});
/// assert_eq!(document_id(product.as_object().unwrap()), Some("42".to_string()));
/// ```
pub fn document_id(product: &ProductDocument) -> Option<String> {
    match product.get(ID_FIELD)? {
        Value::String(id) => Some(id.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(value: Value) -> ProductDocument {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_document_id_string() {
        let doc = product(json!({"id": "2", "name": "Women ankle skinny jeans"}));
        assert_eq!(document_id(&doc), Some("2".to_string()));
    }

    #[test]
    fn test_document_id_number() {
        let doc = product(json!({"id": 17}));
        assert_eq!(document_id(&doc), Some("17".to_string()));
    }

    #[test]
    fn test_document_id_missing_or_composite() {
        assert_eq!(document_id(&product(json!({"name": "no id"}))), None);
        assert_eq!(document_id(&product(json!({"id": null}))), None);
        assert_eq!(document_id(&product(json!({"id": ["1"]}))), None);
    }

    #[test]
    fn test_field_order_preserved() {
        let doc: ProductDocument =
            serde_json::from_str(r#"{"id":"1","name":"Jeans","brand":"Levi's","price":99.0}"#)
                .unwrap();
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name", "brand", "price"]);
    }
}
