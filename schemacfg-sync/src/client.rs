//! Remote schema API abstraction.
//!
//! The reconciler only needs three calls from the remote side; transports
//! (HTTP, fakes in tests) implement this trait.

use crate::error::SyncResult;
use crate::remote::{ReloadExcludeMode, RemoteSchemaConfig, SchemaPatch};
use async_trait::async_trait;

/// Remote collaborator holding the authoritative schema configuration.
#[async_trait]
pub trait SchemaClient: Send + Sync {
    /// Fetches the current schema configuration of a connector.
    ///
    /// Returns [`SyncError::SchemaConfigNotInitialized`](crate::SyncError::SchemaConfigNotInitialized)
    /// when the remote side has not built one yet.
    async fn fetch_schema_config(&self, connector_id: &str) -> SyncResult<RemoteSchemaConfig>;

    /// Asks the remote side to (re)discover the connector's schemas.
    async fn reload_schema_config(
        &self,
        connector_id: &str,
        exclude_mode: ReloadExcludeMode,
    ) -> SyncResult<()>;

    /// Submits a pruned patch.
    async fn apply_patch(&self, connector_id: &str, patch: &SchemaPatch) -> SyncResult<()>;
}
