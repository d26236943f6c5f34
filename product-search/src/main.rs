//! Product Search Main Entry Point
//!
//! Serves the faceted product search API. With `RECREATE_INDEX=true` or the
//! `recreateIndex` argument the product index is rotated once before the
//! server starts accepting traffic.

use dotenv::dotenv;
use product_search::server::{create_app, run_server};
use product_search::{AppConfig, Dependencies, ServiceError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), ServiceError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("product_search=info,product_search_repository=info"));

    let json_logs = env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| ServiceError::config(e.to_string()))?;

        info!(
            service_name = "product-search",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| ServiceError::config(e.to_string()))?;

        info!(
            service_name = "product-search",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

/// Whether the command line asks for a startup rotation.
fn recreate_index_requested() -> bool {
    env::args()
        .skip(1)
        .any(|arg| arg == "recreateIndex" || arg == "--recreate-index")
}

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting Product Search");

    let config = AppConfig::from_env()?;

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    if config.recreate_index || recreate_index_requested() {
        match deps.lifecycle.rotate().await {
            Ok(report) => info!(
                index = %report.index_name,
                deleted = ?report.deleted_indices,
                indexed = report.bulk.succeeded,
                "Startup index rotation completed"
            ),
            Err(e) => {
                error!(error = %e, "Startup index rotation failed");
                return Err(e.into());
            }
        }
    }

    let app = create_app(deps.app_state());
    match run_server(app, config.server_addr).await {
        Ok(()) => {
            info!("Product search stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Server failed");
            Err(e)
        }
    }
}
