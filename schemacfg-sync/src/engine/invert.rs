//! Policy inverter.
//!
//! Every node that is neither handled, locked nor excluded is reset to the
//! policy's raw default for its level, so "no opinion" locally ends up as the
//! policy default in the desired tree.

use schemacfg_model::{ConfigTree, PolicyMode, SchemaNode, TableNode};
use tracing::debug;

/// Resets unhandled, unlocked, non-excluded nodes to the policy default.
pub fn invert(mut tree: ConfigTree) -> ConfigTree {
    let policy = tree.policy;
    let mut inverted = 0usize;
    for schema in tree.schemas.values_mut() {
        inverted += invert_schema(schema, policy);
    }
    debug!("Inverted {} unhandled nodes to {} defaults", inverted, policy);
    tree
}

fn is_unresolved(handled: bool, locked: bool, excluded: bool) -> bool {
    !handled && !locked && !excluded
}

fn invert_schema(schema: &mut SchemaNode, policy: PolicyMode) -> usize {
    let mut inverted = 0;
    for table in schema.tables.values_mut() {
        inverted += invert_table(table, policy);
    }
    if is_unresolved(schema.handled, false, schema.excluded) {
        schema.enabled = Some(policy.table_default());
        inverted += 1;
    }
    inverted
}

fn invert_table(table: &mut TableNode, policy: PolicyMode) -> usize {
    let mut inverted = 0;
    for column in table.columns.values_mut() {
        if is_unresolved(column.handled, column.locked, column.excluded) {
            column.enabled = Some(policy.column_default());
            column.hashed = Some(false);
            inverted += 1;
        }
    }
    if is_unresolved(table.handled, table.locked, table.excluded) {
        table.enabled = Some(policy.table_default());
        inverted += 1;
    }
    inverted
}
