//! End-to-end tests against a running OpenSearch instance.
//!
//! Run with `OPENSEARCH_URL=http://localhost:9200 cargo test -- --ignored`.
//! Every test rotates its own alias so runs do not interfere with a live
//! `products` alias.

use std::sync::Arc;

use product_search::resources::FileResourceLoader;
use product_search_repository::{
    IndexAdmin, IndexConfig, IndexLifecycleController, OpenSearchProvider, ProductSearchService,
};
use product_search_shared::{FacetBucket, SearchRequest, SearchResponse};

async fn provider() -> Arc<OpenSearchProvider> {
    let url =
        std::env::var("OPENSEARCH_URL").unwrap_or_else(|_| "http://localhost:9200".to_string());
    let provider = OpenSearchProvider::new(&url).await.unwrap();
    provider.check_connection().await.unwrap();
    Arc::new(provider)
}

fn controller(provider: Arc<OpenSearchProvider>, alias: &str) -> IndexLifecycleController {
    IndexLifecycleController::new(
        provider,
        Arc::new(FileResourceLoader::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/resources/product"
        ))),
        IndexConfig::new(alias, 3),
    )
}

async fn seeded_service(alias: &str) -> ProductSearchService {
    let provider = provider().await;
    controller(provider.clone(), alias).rotate().await.unwrap();
    ProductSearchService::new(provider, alias)
}

fn buckets(response: &SearchResponse, facet: &str) -> Vec<(String, i64)> {
    response
        .facet(facet)
        .unwrap_or_default()
        .iter()
        .map(|FacetBucket { value, count }| (value.clone(), *count))
        .collect()
}

fn pairs(expected: &[(&str, i64)]) -> Vec<(String, i64)> {
    expected.iter().map(|(v, c)| (v.to_string(), *c)).collect()
}

#[tokio::test]
#[ignore = "requires a running OpenSearch"]
async fn test_attributes_and_text_match_one_product() {
    let service = seeded_service("it_products_attrs").await;

    let response = service
        .search(&SearchRequest::text("Calvin klein L blue ankle skinny jeans"))
        .await;

    assert_eq!(response.total_hits, 1);
    assert_eq!(response.products[0]["id"], "2");
    assert_eq!(response.products[0]["skus"].as_array().unwrap().len(), 9);
    assert!(!response.facets.is_empty());
}

#[tokio::test]
#[ignore = "requires a running OpenSearch"]
async fn test_attributes_must_match_on_same_sku() {
    let service = seeded_service("it_products_same_sku").await;

    // product 2 has a red SKU, but only in size M
    let response = service
        .search(&SearchRequest::text("Calvin klein L red ankle skinny jeans"))
        .await;

    assert_eq!(response.total_hits, 0);
    assert!(response.products.is_empty());
}

#[tokio::test]
#[ignore = "requires a running OpenSearch"]
async fn test_jeans_facets() {
    let service = seeded_service("it_products_facets").await;

    let response = service.search(&SearchRequest::text("jeans")).await;

    assert_eq!(response.total_hits, 8);
    assert_eq!(
        buckets(&response, "brand"),
        pairs(&[("Calvin Klein", 4), ("Levi's", 4)])
    );
    assert_eq!(
        buckets(&response, "price"),
        pairs(&[("Cheap", 2), ("Average", 6), ("Expensive", 0)])
    );
    assert_eq!(
        buckets(&response, "color"),
        pairs(&[("Blue", 8), ("Black", 7), ("Red", 1), ("White", 1)])
    );
    assert_eq!(
        buckets(&response, "size"),
        pairs(&[("L", 8), ("M", 8), ("S", 6), ("XL", 5), ("XXL", 3), ("XS", 2)])
    );
}

#[tokio::test]
#[ignore = "requires a running OpenSearch"]
async fn test_rotation_keeps_retention_and_single_alias_target() {
    let alias = "it_products_rotation";
    let provider = provider().await;
    let controller = controller(provider.clone(), alias);

    for _ in 0..4 {
        controller.rotate().await.unwrap();
        // index names have second resolution
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    }

    let indices = provider.list_indices(&format!("{}_*", alias)).await.unwrap();
    assert_eq!(indices.len(), 3);
    let aliased = provider.indices_for_alias(alias).await.unwrap();
    assert_eq!(aliased.len(), 1);
    assert_eq!(Some(&aliased[0]), indices.iter().max());
}
