//! Filesystem source of index rotation resources.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use product_search_repository::{ProductSearchError, ResourceKind, ResourceLoader};

pub const SETTINGS_FILE: &str = "settings.json";
pub const MAPPINGS_FILE: &str = "mappings.json";
pub const SEED_DATA_FILE: &str = "products.json";

/// Reads rotation resources from one directory.
///
/// The directory holds `settings.json`, `mappings.json` and `products.json`.
/// A missing file is reported as absent rather than as an error so the
/// rotation can fail with a precise `ResourceNotFound`.
#[derive(Debug, Clone)]
pub struct FileResourceLoader {
    dir: PathBuf,
}

impl FileResourceLoader {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the file backing a resource.
    pub fn path(&self, kind: ResourceKind) -> PathBuf {
        let file = match kind {
            ResourceKind::Settings => SETTINGS_FILE,
            ResourceKind::Mappings => MAPPINGS_FILE,
            ResourceKind::SeedData => SEED_DATA_FILE,
        };
        self.dir.join(file)
    }
}

#[async_trait]
impl ResourceLoader for FileResourceLoader {
    async fn load(&self, kind: ResourceKind) -> Result<Option<Vec<u8>>, ProductSearchError> {
        let path = self.path(kind);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "Loaded {}", kind);
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ProductSearchError::configuration(format!(
                "Failed to read {} from {}: {}",
                kind,
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_existing_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), br#"{"number_of_shards": 1}"#).unwrap();

        let loader = FileResourceLoader::new(dir.path());
        let settings = loader.load(ResourceKind::Settings).await.unwrap();
        assert_eq!(settings.as_deref(), Some(&br#"{"number_of_shards": 1}"#[..]));
        assert_eq!(loader.load(ResourceKind::Mappings).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bundled_resources_are_valid_json() {
        let loader = FileResourceLoader::new(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/product"));
        for kind in [ResourceKind::Settings, ResourceKind::Mappings, ResourceKind::SeedData] {
            let bytes = loader.load(kind).await.unwrap().unwrap();
            let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert!(!value.is_null(), "{} is empty", kind);
        }
    }

    #[test]
    fn test_paths() {
        let loader = FileResourceLoader::new("/srv/resources");
        assert_eq!(
            loader.path(ResourceKind::SeedData),
            PathBuf::from("/srv/resources/products.json")
        );
    }
}
