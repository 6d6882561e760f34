//! Wire shapes exchanged with the remote schema API.
//!
//! Fetch responses and outbound patches share the same nested
//! schemas → tables → columns layout, keyed by name.

use schemacfg_model::{ColumnNode, ConfigTree, PolicyMode, SchemaNode, TableNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response envelope used by every remote endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Remote code for "this connector has no schema configuration yet".
pub const NOT_FOUND_SCHEMA_CONFIG: &str = "NotFound_SchemaConfig";

/// Schema configuration of one connector as returned by the remote side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSchemaConfig {
    /// Policy token (`ALLOW_ALL`, `ALLOW_COLUMNS`, `BLOCK_ALL`).
    pub schema_change_handling: String,
    #[serde(default)]
    pub schemas: BTreeMap<String, RemoteSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_in_destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub tables: BTreeMap<String, RemoteTable>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_in_destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_patch_settings: Option<PatchSettings>,
    #[serde(default)]
    pub columns: BTreeMap<String, RemoteColumn>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_in_destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_patch_settings: Option<PatchSettings>,
}

/// Remote immutability marker attached to tables and columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PatchSettings {
    /// True when the remote refuses patches. A missing `allowed` means allowed.
    pub fn is_locked(settings: Option<&PatchSettings>) -> bool {
        settings.and_then(|s| s.allowed).is_some_and(|allowed| !allowed)
    }
}

/// How a reload treats newly discovered entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReloadExcludeMode {
    /// Keep the current configuration and apply the policy to new entities.
    #[default]
    Preserve,
    /// Disable everything that is not already enabled.
    Exclude,
}

/// Body of a reload request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadRequest {
    pub exclude_mode: ReloadExcludeMode,
}

// ── Outbound patch ───────────────────────────────────────────────

/// The minimal change set sent to the remote side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaPatch {
    /// Present only when the declared policy differs from the fetched one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_change_handling: Option<PolicyMode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, SchemaPatchEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaPatchEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tables: BTreeMap<String, TablePatchEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePatchEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub columns: BTreeMap<String, ColumnPatchEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPatchEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed: Option<bool>,
}

impl SchemaPatch {
    /// Encodes a pruned tree. Every node still in the tree travels; the
    /// enabled flag of a locked table is left out since the remote would
    /// refuse it.
    pub fn from_tree(pruned: &ConfigTree, policy_change: Option<PolicyMode>) -> Self {
        Self {
            schema_change_handling: policy_change,
            schemas: pruned
                .schemas
                .iter()
                .map(|(name, schema)| (name.clone(), SchemaPatchEntry::from_node(schema)))
                .collect(),
        }
    }

    /// True when nothing would travel.
    pub fn is_empty(&self) -> bool {
        self.schema_change_handling.is_none() && self.schemas.is_empty()
    }

    /// Number of schema, table and column entries in the patch.
    pub fn entry_count(&self) -> usize {
        self.schemas
            .values()
            .map(|s| {
                1 + s
                    .tables
                    .values()
                    .map(|t| 1 + t.columns.len())
                    .sum::<usize>()
            })
            .sum()
    }
}

impl SchemaPatchEntry {
    fn from_node(schema: &SchemaNode) -> Self {
        Self {
            enabled: schema.enabled,
            tables: schema
                .tables
                .iter()
                .map(|(name, table)| (name.clone(), TablePatchEntry::from_node(table)))
                .collect(),
        }
    }
}

impl TablePatchEntry {
    fn from_node(table: &TableNode) -> Self {
        Self {
            enabled: if table.locked { None } else { table.enabled },
            columns: table
                .columns
                .iter()
                .map(|(name, column)| (name.clone(), ColumnPatchEntry::from_node(column)))
                .collect(),
        }
    }
}

impl ColumnPatchEntry {
    fn from_node(column: &ColumnNode) -> Self {
        Self {
            enabled: column.enabled,
            hashed: column.hashed,
        }
    }
}
