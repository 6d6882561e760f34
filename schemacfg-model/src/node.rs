use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::PolicyMode;

/// A single column of a table.
///
/// `enabled` and `hashed` are tri-state: `None` means "no opinion".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Values are stored hashed instead of plain. Only meaningful when enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed: Option<bool>,
    /// The remote side refuses patches to this column.
    #[serde(default)]
    pub locked: bool,
    /// Already at the policy default; nothing to send.
    #[serde(default)]
    pub excluded: bool,
    /// Explicitly set by the local declaration.
    #[serde(default)]
    pub handled: bool,
}

impl ColumnNode {
    /// Creates a column with no opinion on any field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: None,
            hashed: None,
            locked: false,
            excluded: false,
            handled: false,
        }
    }

    /// Sets the enabled state.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Sets the hashed state.
    #[must_use]
    pub fn hashed(mut self, hashed: bool) -> Self {
        self.hashed = Some(hashed);
        self
    }

    /// Marks the column as immutable on the remote side.
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

/// A table and its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub excluded: bool,
    #[serde(default)]
    pub handled: bool,
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnNode>,
}

impl TableNode {
    /// Creates a table with no opinion and no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: None,
            locked: false,
            excluded: false,
            handled: false,
            columns: BTreeMap::new(),
        }
    }

    /// Sets the enabled state.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Marks the table as immutable on the remote side.
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Adds (or replaces) a column, keyed by its name.
    #[must_use]
    pub fn with_column(mut self, column: ColumnNode) -> Self {
        self.columns.insert(column.name.clone(), column);
        self
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnNode> {
        self.columns.get(name)
    }
}

/// A schema and its tables. Schemas carry no lock marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub excluded: bool,
    #[serde(default)]
    pub handled: bool,
    #[serde(default)]
    pub tables: BTreeMap<String, TableNode>,
}

impl SchemaNode {
    /// Creates a schema with no opinion and no tables.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: None,
            excluded: false,
            handled: false,
            tables: BTreeMap::new(),
        }
    }

    /// Sets the enabled state.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Adds (or replaces) a table, keyed by its name.
    #[must_use]
    pub fn with_table(mut self, table: TableNode) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableNode> {
        self.tables.get(name)
    }
}

/// Root of the schema configuration of one connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigTree {
    pub policy: PolicyMode,
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaNode>,
}

impl ConfigTree {
    /// Creates an empty tree governed by `policy`.
    pub fn new(policy: PolicyMode) -> Self {
        Self {
            policy,
            schemas: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a schema, keyed by its name.
    #[must_use]
    pub fn with_schema(mut self, schema: SchemaNode) -> Self {
        self.schemas.insert(schema.name.clone(), schema);
        self
    }

    /// Returns the same tree governed by a different policy.
    #[must_use]
    pub fn with_policy(mut self, policy: PolicyMode) -> Self {
        self.policy = policy;
        self
    }

    /// Looks up a schema by name.
    pub fn schema(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    /// Looks up a table by schema and table name.
    pub fn table(&self, schema: &str, table: &str) -> Option<&TableNode> {
        self.schema(schema).and_then(|s| s.table(table))
    }

    /// Looks up a column by its full path.
    pub fn column(&self, schema: &str, table: &str, column: &str) -> Option<&ColumnNode> {
        self.table(schema, table).and_then(|t| t.column(column))
    }

    /// True if the tree holds no schemas.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Total number of columns across all schemas and tables.
    pub fn column_count(&self) -> usize {
        self.schemas
            .values()
            .flat_map(|s| s.tables.values())
            .map(|t| t.columns.len())
            .sum()
    }

    /// Total number of tables across all schemas.
    pub fn table_count(&self) -> usize {
        self.schemas.values().map(|s| s.tables.len()).sum()
    }
}
