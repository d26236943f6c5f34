//! Naming of the physical product indices behind the alias.

use chrono::{DateTime, Utc};

/// Default alias searched by the service.
pub const DEFAULT_INDEX_ALIAS: &str = "products";

/// Default number of physical indices kept after a rotation.
pub const DEFAULT_RETENTION: usize = 3;

/// Timestamp suffix format of physical index names.
pub const INDEX_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Configuration for the product index alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// The alias name used for all searches.
    pub alias: String,
    /// Number of most recent physical indices kept during cleanup.
    pub retention: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_ALIAS, DEFAULT_RETENTION)
    }
}

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `alias` - The index alias name
    /// * `retention` - How many physical indices to keep (at least 1)
    pub fn new(alias: impl Into<String>, retention: usize) -> Self {
        Self {
            alias: alias.into(),
            retention: retention.max(1),
        }
    }

    /// Physical index name for a rotation started at `now`.
    ///
    /// # Returns
    ///
    /// `<alias>_<yyyyMMddHHmmss>`, e.g. `products_20240101120000`
    pub fn timestamped_index_name(&self, now: DateTime<Utc>) -> String {
        format!("{}_{}", self.alias, now.format(INDEX_TIMESTAMP_FORMAT))
    }

    /// Wildcard pattern matching every physical index of this alias.
    pub fn index_pattern(&self) -> String {
        format!("{}_*", self.alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamped_index_name() {
        let config = IndexConfig::default();
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(config.timestamped_index_name(now), "products_20240307090501");
    }

    #[test]
    fn test_names_sort_chronologically() {
        let config = IndexConfig::new("catalog", 3);
        let earlier = config.timestamped_index_name(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap());
        let later = config.timestamped_index_name(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert!(earlier < later);
    }

    #[test]
    fn test_index_pattern() {
        assert_eq!(IndexConfig::new("catalog", 2).index_pattern(), "catalog_*");
    }

    #[test]
    fn test_retention_is_at_least_one() {
        assert_eq!(IndexConfig::new("products", 0).retention, 1);
        assert_eq!(IndexConfig::default().retention, 3);
    }
}
