//! Blue-green rotation of the physical index behind the product alias.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use product_search_shared::{document_id, ProductDocument};

use crate::errors::ProductSearchError;
use crate::interfaces::{IndexAdmin, ResourceKind, ResourceLoader};
use crate::opensearch::IndexConfig;
use crate::types::{AliasAction, BulkDocument, BulkItemFailure, BulkSummary, CreateIndexRequest};

/// When the alias moves relative to loading the seed data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublishOrder {
    /// Bind the alias at creation, repoint, prune, then load. Searches may see
    /// the new index before it holds any documents.
    #[default]
    PublishThenPopulate,
    /// Create without the alias, load, then repoint and prune.
    PopulateThenPublish,
}

impl FromStr for PublishOrder {
    type Err = ProductSearchError;

    /// Accepts `publish-first` or `populate-first` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "publish-first" | "publish_first" => Ok(Self::PublishThenPopulate),
            "populate-first" | "populate_first" => Ok(Self::PopulateThenPublish),
            other => Err(ProductSearchError::configuration(format!(
                "Unknown publish order '{}', expected 'publish-first' or 'populate-first'",
                other
            ))),
        }
    }
}

impl fmt::Display for PublishOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PublishThenPopulate => write!(f, "publish-first"),
            Self::PopulateThenPublish => write!(f, "populate-first"),
        }
    }
}

/// Outcome of one completed rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationReport {
    /// The physical index now behind the alias.
    pub index_name: String,
    pub alias: String,
    /// Retired indices removed by the cleanup step.
    pub deleted_indices: Vec<String>,
    /// Seed data load outcome; partial failures do not fail the rotation.
    pub bulk: BulkSummary,
}

/// Settings, mappings and documents read up front for one rotation.
struct ResourceBundle {
    settings: Value,
    mappings: Value,
    documents: Vec<ProductDocument>,
}

/// Rotates the product alias onto a freshly built physical index.
///
/// Every rotation creates `<alias>_<timestamp>`, points the alias at it,
/// keeps only the newest `retention` physical indices and loads the seed data.
/// Only one rotation runs at a time per controller; a concurrent request is
/// rejected with [`ProductSearchError::RotationInProgress`].
pub struct IndexLifecycleController {
    admin: Arc<dyn IndexAdmin>,
    resources: Arc<dyn ResourceLoader>,
    config: IndexConfig,
    publish_order: PublishOrder,
    rotation: Mutex<()>,
}

impl IndexLifecycleController {
    /// Create a new controller.
    ///
    /// # Arguments
    ///
    /// * `admin` - Index management implementation (e.g., `OpenSearchProvider`)
    /// * `resources` - Source of settings, mappings and seed data
    /// * `config` - Alias and retention
    pub fn new(
        admin: Arc<dyn IndexAdmin>,
        resources: Arc<dyn ResourceLoader>,
        config: IndexConfig,
    ) -> Self {
        Self {
            admin,
            resources,
            config,
            publish_order: PublishOrder::default(),
            rotation: Mutex::new(()),
        }
    }

    pub fn with_publish_order(mut self, publish_order: PublishOrder) -> Self {
        self.publish_order = publish_order;
        self
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn publish_order(&self) -> PublishOrder {
        self.publish_order
    }

    /// Rotate the alias onto a new index named after the current UTC time.
    pub async fn rotate(&self) -> Result<RotationReport, ProductSearchError> {
        self.rotate_at(Utc::now()).await
    }

    /// Rotate the alias onto a new index named after `now`.
    ///
    /// # Returns
    ///
    /// * `Ok(RotationReport)` - The alias points at the new index
    /// * `Err(ProductSearchError::RotationInProgress)` - Another rotation is running
    /// * `Err(ProductSearchError)` - A resource was missing or invalid, the engine
    ///   failed, or a change was not acknowledged
    #[instrument(skip_all, fields(alias = %self.config.alias, order = %self.publish_order))]
    pub async fn rotate_at(&self, now: DateTime<Utc>) -> Result<RotationReport, ProductSearchError> {
        let _guard = self
            .rotation
            .try_lock()
            .map_err(|_| ProductSearchError::rotation_in_progress(&self.config.alias))?;

        let bundle = self.load_bundle().await?;
        let index_name = self.config.timestamped_index_name(now);
        info!(index = %index_name, documents = bundle.documents.len(), "Starting index rotation");

        let (deleted_indices, bulk) = match self.publish_order {
            PublishOrder::PublishThenPopulate => {
                self.create_index(&index_name, &bundle, true).await?;
                self.publish(&index_name).await?;
                let deleted = self.prune(&index_name).await?;
                let bulk = self.populate(&index_name, &bundle.documents).await?;
                (deleted, bulk)
            }
            PublishOrder::PopulateThenPublish => {
                self.create_index(&index_name, &bundle, false).await?;
                let bulk = self.populate(&index_name, &bundle.documents).await?;
                self.publish(&index_name).await?;
                let deleted = self.prune(&index_name).await?;
                (deleted, bulk)
            }
        };

        info!(
            index = %index_name,
            deleted = deleted_indices.len(),
            indexed = bulk.succeeded,
            failed = bulk.failed(),
            "Index rotation completed"
        );

        Ok(RotationReport {
            index_name,
            alias: self.config.alias.clone(),
            deleted_indices,
            bulk,
        })
    }

    async fn load_bundle(&self) -> Result<ResourceBundle, ProductSearchError> {
        let settings = self.load_json::<Value>(ResourceKind::Settings).await?;
        let mappings = self.load_json::<Value>(ResourceKind::Mappings).await?;
        let documents = self
            .load_json::<Vec<ProductDocument>>(ResourceKind::SeedData)
            .await?;
        Ok(ResourceBundle {
            settings,
            mappings,
            documents,
        })
    }

    async fn load_json<T>(&self, kind: ResourceKind) -> Result<T, ProductSearchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let bytes = self
            .resources
            .load(kind)
            .await?
            .ok_or_else(|| ProductSearchError::resource_not_found(kind.to_string()))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| ProductSearchError::parse(format!("Invalid {}: {}", kind, e)))
    }

    async fn create_index(
        &self,
        index_name: &str,
        bundle: &ResourceBundle,
        with_alias: bool,
    ) -> Result<(), ProductSearchError> {
        let request = CreateIndexRequest {
            name: index_name.to_string(),
            settings: bundle.settings.clone(),
            mappings: bundle.mappings.clone(),
            alias: with_alias.then(|| self.config.alias.clone()),
        };

        if !self.admin.create_index(&request).await? {
            return Err(ProductSearchError::not_acknowledged(format!(
                "Creation of index {}",
                index_name
            )));
        }
        info!(index = %index_name, aliased = with_alias, "Created index");
        Ok(())
    }

    /// Move the alias exclusively onto `index_name` in one atomic update.
    async fn publish(&self, index_name: &str) -> Result<(), ProductSearchError> {
        let alias = &self.config.alias;
        let current = self.admin.indices_for_alias(alias).await?;

        let mut actions: Vec<AliasAction> = current
            .iter()
            .map(|index| AliasAction::Remove {
                index: index.clone(),
                alias: alias.clone(),
            })
            .collect();
        actions.push(AliasAction::Add {
            index: index_name.to_string(),
            alias: alias.clone(),
        });

        if !self.admin.update_aliases(&actions).await? {
            return Err(ProductSearchError::not_acknowledged(format!(
                "Alias {} update to {}",
                alias, index_name
            )));
        }
        info!(index = %index_name, previous = ?current, "Alias repointed");
        Ok(())
    }

    /// Delete all but `retention` indices under the alias prefix: the published
    /// one and the newest of the others.
    async fn prune(&self, published: &str) -> Result<Vec<String>, ProductSearchError> {
        let mut indices = self.admin.list_indices(&self.config.index_pattern()).await?;
        indices.retain(|index| index != published);
        // timestamps sort lexicographically
        indices.sort_unstable_by(|a, b| b.cmp(a));

        let stale: Vec<String> = indices
            .into_iter()
            .skip(self.config.retention.saturating_sub(1))
            .collect();
        if stale.is_empty() {
            debug!(retention = self.config.retention, "No stale indices to delete");
            return Ok(stale);
        }

        if !self.admin.delete_indices(&stale).await? {
            return Err(ProductSearchError::not_acknowledged(format!(
                "Deletion of indices {}",
                stale.join(", ")
            )));
        }
        info!(deleted = ?stale, "Deleted stale indices");
        Ok(stale)
    }

    /// Bulk-load seed documents; item failures are logged, not returned as errors.
    async fn populate(
        &self,
        index_name: &str,
        documents: &[ProductDocument],
    ) -> Result<BulkSummary, ProductSearchError> {
        let mut skipped = Vec::new();
        let mut batch = Vec::with_capacity(documents.len());
        for (position, document) in documents.iter().enumerate() {
            match document_id(document) {
                Some(id) => batch.push(BulkDocument {
                    id,
                    source: document.clone(),
                }),
                None => {
                    warn!(position, "Skipping seed document without a usable id");
                    skipped.push(BulkItemFailure {
                        id: None,
                        reason: format!("document at position {} has no usable id", position),
                    });
                }
            }
        }

        let mut summary = self.admin.bulk_index(index_name, &batch).await?;
        summary.submitted += skipped.len();
        summary.failures.extend(skipped);

        if summary.succeeded < summary.submitted {
            warn!(
                index = %index_name,
                submitted = summary.submitted,
                succeeded = summary.succeeded,
                "Fewer documents indexed than submitted"
            );
        }
        if !summary.failures.is_empty() {
            warn!(index = %index_name, failures = %summary.failure_message(), "Seed documents failed to index");
        }
        Ok(summary)
    }
}
