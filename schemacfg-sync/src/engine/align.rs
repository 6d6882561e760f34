//! Policy aligner.
//!
//! Recomputes `excluded` bottom-up from each node's current state and the
//! tree's policy. A parent is excluded only when it is itself at the default
//! and nothing beneath it still needs to travel.

use schemacfg_model::{ColumnNode, ConfigTree, PolicyMode, SchemaNode, TableNode};
use tracing::trace;

/// Recomputes `excluded` on every node of the tree.
pub fn align(mut tree: ConfigTree) -> ConfigTree {
    let policy = tree.policy;
    for schema in tree.schemas.values_mut() {
        align_schema(schema, policy);
    }
    trace!(
        "Aligned tree under {}: {} of {} schemas excluded",
        policy,
        tree.schemas.values().filter(|s| s.excluded).count(),
        tree.schemas.len()
    );
    tree
}

fn align_schema(schema: &mut SchemaNode, policy: PolicyMode) {
    for table in schema.tables.values_mut() {
        align_table(table, policy);
    }
    let pending = schema.tables.values().filter(|t| !t.excluded).count();
    // Schemas share the table rule; there is no schema-level column notion.
    schema.excluded = pending == 0 && policy.table_aligned(schema.enabled);
}

fn align_table(table: &mut TableNode, policy: PolicyMode) {
    for column in table.columns.values_mut() {
        column.excluded = column_excluded(column, policy);
    }
    let pending = table.columns.values().filter(|c| !c.excluded).count();
    table.excluded = pending == 0 && (table.locked || policy.table_aligned(table.enabled));
}

fn column_excluded(column: &ColumnNode, policy: PolicyMode) -> bool {
    // Hashing is never a policy default, so a patchable hashed column travels.
    if !column.locked && column.hashed == Some(true) {
        return false;
    }
    column.locked || policy.column_aligned(column.enabled)
}
