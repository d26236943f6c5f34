//! Dependency initialization and wiring for the product search service.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use product_search_repository::{
    IndexLifecycleController, OpenSearchProvider, ProductSearchService, QueryTranslator,
};

use super::AppConfig;
use crate::resources::FileResourceLoader;
use crate::server::AppState;
use crate::ServiceError;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection at a fixed interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse the connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive)
    /// Defaults to "retry" if not set or invalid.
    pub fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Search path orchestrator.
    pub search: Arc<ProductSearchService>,
    /// Index rotation controller.
    pub lifecycle: Arc<IndexLifecycleController>,
}

impl Dependencies {
    /// Initialize all dependencies from the configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ServiceError)` - If the configuration is invalid or, in fail-fast
    ///   mode, OpenSearch is unreachable
    pub async fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        info!(
            opensearch_url = %config.opensearch_url,
            alias = %config.index.alias,
            retention = config.index.retention,
            publish_order = %config.publish_order,
            resources_dir = %config.resources_dir.display(),
            connection_mode = ?config.connection_mode,
            retry_interval_secs = config.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let table = config.classification_table()?;

        let provider = Arc::new(
            Self::connect_to_opensearch(
                &config.opensearch_url,
                config.connection_mode,
                config.retry_interval,
            )
            .await?,
        );

        info!("OpenSearch connection established");

        let search = ProductSearchService::new(provider.clone(), config.index.alias.clone())
            .with_config(config.search.clone())
            .with_translator(QueryTranslator::new(table));

        let resources = FileResourceLoader::new(&config.resources_dir);
        let lifecycle =
            IndexLifecycleController::new(provider, Arc::new(resources), config.index.clone())
                .with_publish_order(config.publish_order);

        Ok(Self {
            search: Arc::new(search),
            lifecycle: Arc::new(lifecycle),
        })
    }

    /// Shared state for the HTTP handlers.
    pub fn app_state(&self) -> AppState {
        AppState {
            search: self.search.clone(),
            lifecycle: self.lifecycle.clone(),
        }
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchProvider, ServiceError> {
        loop {
            match Self::try_connect_opensearch(url).await {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(ServiceError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Attempt to connect to OpenSearch and verify it answers.
    async fn try_connect_opensearch(url: &str) -> Result<OpenSearchProvider, ServiceError> {
        let provider = OpenSearchProvider::new(url).await.map_err(|e| {
            ServiceError::config(format!("Failed to create OpenSearch provider: {}", e))
        })?;

        provider
            .check_connection()
            .await
            .map_err(|e| ServiceError::config(format!("OpenSearch is unreachable: {}", e)))?;

        Ok(provider)
    }
}
