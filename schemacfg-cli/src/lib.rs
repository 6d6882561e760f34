//! Library half of the `schemacfg` operator tool.
//!
//! File formats:
//! - **upstream**: a remote schema config, either bare or wrapped in the API
//!   envelope (`{"code": ..., "data": {...}}`)
//! - **declaration**: the same shape the tool prints as state
//!   (`{"schema_change_handling": ..., "schemas": [...]}`), so a state dump can
//!   be edited and fed back as a declaration

use anyhow::{Context, Result};
use schemacfg_sync::{
    ApiResponse, ConfigTree, HttpClientConfig, HttpSchemaClient, Reconciler, RemoteSchemaConfig,
    SchemaConfigState, SchemaPatch, plan_patch, read_upstream, unflatten,
};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Loads a fetched remote configuration from disk and reads it into a tree.
pub fn load_upstream(path: &Path) -> Result<ConfigTree> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read upstream file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let remote: RemoteSchemaConfig = if value.get("data").is_some() {
        let envelope: ApiResponse<RemoteSchemaConfig> = serde_json::from_value(value)?;
        envelope
            .data
            .context("upstream envelope has no data")?
    } else {
        serde_json::from_value(value)
            .with_context(|| format!("{} is not a schema config", path.display()))?
    };

    let tree = read_upstream(&remote)?;
    debug!(
        "Loaded upstream {} ({} schemas)",
        path.display(),
        tree.schemas.len()
    );
    Ok(tree)
}

/// Loads a local declaration from disk.
pub fn load_declaration(path: &Path) -> Result<ConfigTree> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read declaration file {}", path.display()))?;
    let declared: SchemaConfigState = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid declaration", path.display()))?;
    Ok(unflatten(declared.schema_change_handling, &declared.schemas))
}

/// Offline plan: computes the patch a declaration would send.
pub fn plan_files(upstream: &Path, declaration: &Path) -> Result<SchemaPatch> {
    let upstream = load_upstream(upstream)?;
    let declared = load_declaration(declaration)?;
    Ok(plan_patch(upstream, &declared))
}

/// Offline show: the state a read of this upstream would persist.
pub fn show_file(upstream: &Path) -> Result<SchemaConfigState> {
    Ok(SchemaConfigState::from_upstream(load_upstream(upstream)?))
}

/// What an online run did.
#[derive(Debug)]
pub enum RunReport {
    /// Dry run: the patch that would be sent.
    Planned(SchemaPatch),
    /// Full cycle: the submitted patch (if any) and the state read back.
    Reconciled {
        patch: Option<SchemaPatch>,
        state: SchemaConfigState,
    },
}

/// Online run against the remote API.
pub async fn run_online(
    config: HttpClientConfig,
    connector_id: &str,
    declared: &ConfigTree,
    dry_run: bool,
) -> Result<RunReport> {
    let client = HttpSchemaClient::new(config).context("failed to build HTTP client")?;
    let reconciler = Reconciler::new(client);

    if dry_run {
        let patch = reconciler
            .plan(connector_id, declared)
            .await
            .with_context(|| format!("failed to plan connector {connector_id}"))?;
        return Ok(RunReport::Planned(patch));
    }

    let outcome = reconciler
        .reconcile(connector_id, declared)
        .await
        .with_context(|| format!("failed to reconcile connector {connector_id}"))?;
    info!(
        "Connector {} reconciled ({})",
        connector_id,
        if outcome.patch.is_some() { "patched" } else { "unchanged" }
    );
    Ok(RunReport::Reconciled {
        patch: outcome.patch,
        state: outcome.state,
    })
}

/// Renders a patch for the terminal.
pub fn render_patch(patch: &SchemaPatch) -> Result<String> {
    if patch.is_empty() {
        return Ok("No changes. Schema config is up to date.".to_string());
    }
    Ok(serde_json::to_string_pretty(patch)?)
}
