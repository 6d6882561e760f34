//! Reconciler — drives one reconciliation cycle against a [`SchemaClient`].
//!
//! A cycle is stateless: the tree is rebuilt from the remote side every time.
//!
//! ```text
//! fetch → read → align → merge → invert → prune → submit
//!       → fetch → read → align → prune → flatten
//! ```
//!
//! Cycles for the same connector must be serialized by the caller.

use crate::client::SchemaClient;
use crate::engine::{observed_tree, plan_patch};
use crate::error::{SyncError, SyncResult};
use crate::flatten::flatten;
use crate::reader::read_upstream;
use crate::remote::{ReloadExcludeMode, SchemaPatch};
use schemacfg_model::{ConfigTree, PolicyMode, SchemaRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Configuration for the reconciler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Exclude mode used when a missing schema config forces a reload.
    #[serde(default)]
    pub reload_exclude_mode: ReloadExcludeMode,
    /// Reload and fetch once more when the connector has no schema config.
    #[serde(default = "default_retry_after_reload")]
    pub retry_after_reload: bool,
}

fn default_retry_after_reload() -> bool {
    true
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            reload_exclude_mode: ReloadExcludeMode::default(),
            retry_after_reload: default_retry_after_reload(),
        }
    }
}

/// Persistable view of a connector's schema configuration: its policy and
/// the flattened entries that diverge from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfigState {
    pub schema_change_handling: PolicyMode,
    #[serde(default)]
    pub schemas: Vec<SchemaRecord>,
}

impl SchemaConfigState {
    /// Builds the state from a freshly read tree.
    pub fn from_upstream(upstream: ConfigTree) -> Self {
        let policy = upstream.policy;
        Self {
            schema_change_handling: policy,
            schemas: flatten(&observed_tree(upstream)),
        }
    }
}

/// Result of a full reconciliation cycle.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// The patch that was submitted, if anything needed to travel.
    pub patch: Option<SchemaPatch>,
    /// State read back after the submit.
    pub state: SchemaConfigState,
}

/// Runs reconciliation cycles against a remote schema API.
pub struct Reconciler<C> {
    client: C,
    config: ReconcilerConfig,
}

impl<C: SchemaClient> Reconciler<C> {
    /// Creates a reconciler with the default configuration.
    pub fn new(client: C) -> Self {
        Self::with_config(client, ReconcilerConfig::default())
    }

    /// Creates a reconciler with a custom configuration.
    pub fn with_config(client: C, config: ReconcilerConfig) -> Self {
        Self { client, config }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Fetches and reads the upstream tree. Unless disabled in the config, a
    /// missing schema config triggers one reload followed by exactly one retry.
    pub async fn fetch_tree(&self, connector_id: &str) -> SyncResult<ConfigTree> {
        let remote = match self.client.fetch_schema_config(connector_id).await {
            Err(SyncError::SchemaConfigNotInitialized { code, message })
                if self.config.retry_after_reload =>
            {
                warn!(
                    "No schema config for connector {} ({}: {}), reloading",
                    connector_id, code, message
                );
                self.client
                    .reload_schema_config(connector_id, self.config.reload_exclude_mode)
                    .await?;
                self.client.fetch_schema_config(connector_id).await?
            }
            other => other?,
        };
        read_upstream(&remote)
    }

    /// Reads the current state without changing anything.
    pub async fn read(&self, connector_id: &str) -> SyncResult<SchemaConfigState> {
        let upstream = self.fetch_tree(connector_id).await?;
        Ok(SchemaConfigState::from_upstream(upstream))
    }

    /// Computes the patch `declared` would produce, without submitting it.
    pub async fn plan(&self, connector_id: &str, declared: &ConfigTree) -> SyncResult<SchemaPatch> {
        let upstream = self.fetch_tree(connector_id).await?;
        let patch = plan_patch(upstream, declared);
        debug!(
            "Planned patch for connector {}: {} entries, policy change: {:?}",
            connector_id,
            patch.entry_count(),
            patch.schema_change_handling
        );
        Ok(patch)
    }

    /// Runs a full cycle: plan, submit when needed, then read back.
    ///
    /// A rejected patch is returned as [`SyncError::PatchRejected`] with the
    /// remote code and message. The remote state is still re-read first so a
    /// partially applied patch shows up in the logs; that read is best effort
    /// and its result is discarded.
    pub async fn reconcile(
        &self,
        connector_id: &str,
        declared: &ConfigTree,
    ) -> SyncResult<ReconcileOutcome> {
        let patch = self.plan(connector_id, declared).await?;

        let submitted = if patch.is_empty() {
            info!("Schema config of connector {} already up to date", connector_id);
            None
        } else {
            info!(
                "Applying schema patch to connector {} ({} entries)",
                connector_id,
                patch.entry_count()
            );
            if let Err(e) = self.client.apply_patch(connector_id, &patch).await {
                let rejection = e.into_patch_rejection();
                match self.read(connector_id).await {
                    Ok(state) => warn!(
                        "Patch for connector {} rejected ({}), {} schemas diverge after read-back",
                        connector_id,
                        rejection,
                        state.schemas.len()
                    ),
                    Err(read_err) => warn!(
                        "Patch for connector {} rejected ({}); read-back failed: {}",
                        connector_id, rejection, read_err
                    ),
                }
                return Err(rejection);
            }
            Some(patch)
        };

        let state = self.read(connector_id).await?;
        Ok(ReconcileOutcome {
            patch: submitted,
            state,
        })
    }
}
