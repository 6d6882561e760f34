//! Upstream reader: remote fetch result → [`ConfigTree`].
//!
//! Pure format conversion. `locked` is derived from the remote patch marker;
//! `excluded` and `handled` always start false.

use crate::error::SyncResult;
use crate::remote::{PatchSettings, RemoteColumn, RemoteSchema, RemoteSchemaConfig, RemoteTable};
use schemacfg_model::{ColumnNode, ConfigTree, PolicyMode, SchemaNode, TableNode};
use tracing::debug;

/// Converts a fetched remote configuration into a fresh tree.
pub fn read_upstream(remote: &RemoteSchemaConfig) -> SyncResult<ConfigTree> {
    let policy: PolicyMode = remote.schema_change_handling.parse()?;
    let tree = ConfigTree {
        policy,
        schemas: remote
            .schemas
            .iter()
            .map(|(name, schema)| (name.clone(), read_schema(name, schema)))
            .collect(),
    };
    debug!(
        "Read upstream tree: policy={}, schemas={}, tables={}, columns={}",
        tree.policy,
        tree.schemas.len(),
        tree.table_count(),
        tree.column_count()
    );
    Ok(tree)
}

fn read_schema(name: &str, schema: &RemoteSchema) -> SchemaNode {
    SchemaNode {
        name: name.to_string(),
        enabled: schema.enabled,
        excluded: false,
        handled: false,
        tables: schema
            .tables
            .iter()
            .map(|(name, table)| (name.clone(), read_table(name, table)))
            .collect(),
    }
}

fn read_table(name: &str, table: &RemoteTable) -> TableNode {
    TableNode {
        name: name.to_string(),
        enabled: table.enabled,
        locked: PatchSettings::is_locked(table.enabled_patch_settings.as_ref()),
        excluded: false,
        handled: false,
        columns: table
            .columns
            .iter()
            .map(|(name, column)| (name.clone(), read_column(name, column)))
            .collect(),
    }
}

fn read_column(name: &str, column: &RemoteColumn) -> ColumnNode {
    ColumnNode {
        name: name.to_string(),
        enabled: column.enabled,
        hashed: column.hashed,
        locked: PatchSettings::is_locked(column.enabled_patch_settings.as_ref()),
        excluded: false,
        handled: false,
    }
}
