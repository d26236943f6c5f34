// HTTP request handlers
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::{error, info, warn};

use product_search_repository::ProductSearchError;
use product_search_shared::SearchRequest;

use crate::server::state::AppState;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Product search endpoint - always answers 200 for a well-formed body
pub async fn search_products(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> impl IntoResponse {
    let response = state.search.search(&request).await;
    (StatusCode::OK, Json(response))
}

/// Rotate the product index behind the alias
pub async fn recreate_index(State(state): State<AppState>) -> impl IntoResponse {
    info!("Received index rotation request");

    match state.lifecycle.rotate().await {
        Ok(report) => (StatusCode::OK, Json(json!(report))),
        Err(e @ ProductSearchError::RotationInProgress(_)) => {
            warn!(error = %e, "Rejected concurrent rotation");
            (
                StatusCode::CONFLICT,
                Json(json!({
                    "status": "error",
                    "message": e.to_string()
                })),
            )
        }
        Err(e) => {
            error!(error = %e, "Index rotation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": e.to_string()
                })),
            )
        }
    }
}
