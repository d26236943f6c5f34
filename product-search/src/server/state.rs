// App state for the axum server
use std::sync::Arc;

use product_search_repository::{IndexLifecycleController, ProductSearchService};

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<ProductSearchService>,
    pub lifecycle: Arc<IndexLifecycleController>,
}
