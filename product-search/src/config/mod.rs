//! Configuration and dependency initialization.
//!
//! All settings come from environment variables (optionally loaded from a
//! `.env` file) with defaults suitable for local development.

mod dependencies;

pub use dependencies::{ConnectionMode, Dependencies};

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use product_search_repository::opensearch::{DEFAULT_INDEX_ALIAS, DEFAULT_RETENTION};
use product_search_repository::query::{DEFAULT_COLORS, DEFAULT_SIZES};
use product_search_repository::{
    ClassificationTable, IndexConfig, PublishOrder, SearchServiceConfig,
};

use crate::ServiceError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default directory holding `settings.json`, `mappings.json` and `products.json`.
const DEFAULT_RESOURCES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources/product");

/// Default HTTP bind host.
const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP port.
const DEFAULT_SERVER_PORT: u16 = 8080;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub opensearch_url: String,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    pub index: IndexConfig,
    pub publish_order: PublishOrder,
    pub resources_dir: PathBuf,
    pub search: SearchServiceConfig,
    /// Size vocabulary override.
    pub sizes: Option<Vec<String>>,
    /// Color vocabulary override.
    pub colors: Option<Vec<String>>,
    pub server_addr: SocketAddr,
    /// Rotate the index once before serving traffic.
    pub recreate_index: bool,
}

impl AppConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `PRODUCT_INDEX_ALIAS`: Alias searched and rotated (default: products)
    /// - `PRODUCT_INDEX_RETENTION`: Physical indices kept after rotation (default: 3)
    /// - `ROTATION_PUBLISH_ORDER`: "publish-first" or "populate-first" (default: publish-first)
    /// - `PRODUCT_RESOURCES_DIR`: Directory of settings, mappings and seed data
    /// - `SEARCH_MIN_QUERY_LENGTH`: Minimum query length (default: 3)
    /// - `SEARCH_DEFAULT_PAGE` / `SEARCH_DEFAULT_SIZE`: Paging defaults (default: 1 / 10)
    /// - `PRODUCT_SEARCH_SIZES` / `PRODUCT_SEARCH_COLORS`: Comma-separated vocabularies
    /// - `SERVER_HOST` / `SERVER_PORT`: HTTP bind address (default: 0.0.0.0:8080)
    /// - `RECREATE_INDEX`: Rotate the index at startup (default: false)
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let opensearch_url =
            lookup("OPENSEARCH_URL").unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string());
        let connection_mode = ConnectionMode::parse(lookup("OPENSEARCH_CONNECTION_MODE").as_deref());
        let retry_interval = Duration::from_secs(parse_or(
            &lookup,
            "OPENSEARCH_RETRY_INTERVAL_SECS",
            DEFAULT_RETRY_INTERVAL_SECS,
        ));

        let alias = lookup("PRODUCT_INDEX_ALIAS")
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_INDEX_ALIAS.to_string());
        let retention = parse_or(&lookup, "PRODUCT_INDEX_RETENTION", DEFAULT_RETENTION);
        let index = IndexConfig::new(alias, retention);

        let publish_order = match lookup("ROTATION_PUBLISH_ORDER") {
            Some(value) => PublishOrder::from_str(&value)
                .map_err(|e| ServiceError::config(e.to_string()))?,
            None => PublishOrder::default(),
        };

        let resources_dir = lookup("PRODUCT_RESOURCES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCES_DIR));

        let defaults = SearchServiceConfig::default();
        let search = SearchServiceConfig::default()
            .with_min_query_length(parse_or(
                &lookup,
                "SEARCH_MIN_QUERY_LENGTH",
                defaults.min_query_length,
            ))
            .with_paging(
                parse_or(&lookup, "SEARCH_DEFAULT_PAGE", defaults.default_page),
                parse_or(&lookup, "SEARCH_DEFAULT_SIZE", defaults.default_size),
            );

        let host = lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string());
        let host: IpAddr = host
            .parse()
            .map_err(|e| ServiceError::config(format!("Invalid SERVER_HOST '{}': {}", host, e)))?;
        let port = match lookup("SERVER_PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|e| ServiceError::config(format!("Invalid SERVER_PORT '{}': {}", port, e)))?,
            None => DEFAULT_SERVER_PORT,
        };

        let recreate_index = lookup("RECREATE_INDEX")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            opensearch_url,
            connection_mode,
            retry_interval,
            index,
            publish_order,
            resources_dir,
            search,
            sizes: lookup("PRODUCT_SEARCH_SIZES").map(|v| split_list(&v)),
            colors: lookup("PRODUCT_SEARCH_COLORS").map(|v| split_list(&v)),
            server_addr: SocketAddr::new(host, port),
            recreate_index,
        })
    }

    /// Classification table from the configured vocabularies.
    ///
    /// A vocabulary that is not overridden falls back to the built-in one.
    pub fn classification_table(&self) -> Result<ClassificationTable, ServiceError> {
        if self.sizes.is_none() && self.colors.is_none() {
            return Ok(ClassificationTable::default());
        }

        let sizes = self
            .sizes
            .clone()
            .unwrap_or_else(|| DEFAULT_SIZES.iter().map(|s| s.to_string()).collect());
        let colors = self
            .colors
            .clone()
            .unwrap_or_else(|| DEFAULT_COLORS.iter().map(|c| c.to_string()).collect());

        ClassificationTable::new(sizes, colors).map_err(|e| ServiceError::config(e.to_string()))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Invalid value, using default");
            default
        }),
        None => default,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
