//! Local merger.
//!
//! Overlays a sparse local declaration onto the aligned upstream tree. Every
//! declared node ends up `handled`; undeclared upstream nodes are untouched
//! and left for the inverter. Values declared on locked nodes are absorbed
//! without effect so that state read back from the remote side can be fed in
//! again as a declaration.

use schemacfg_model::{ColumnNode, ConfigTree, SchemaNode, TableNode};
use tracing::debug;

/// Merges `declared` onto `aligned`. The result takes the declared policy.
pub fn merge(mut aligned: ConfigTree, declared: &ConfigTree) -> ConfigTree {
    aligned.policy = declared.policy;
    let mut adopted = 0usize;

    for (name, local) in &declared.schemas {
        match aligned.schemas.get_mut(name) {
            Some(schema) => adopted += merge_schema(schema, local),
            None => {
                aligned.schemas.insert(name.clone(), adopt_schema(local));
                adopted += 1;
            }
        }
    }

    debug!(
        "Merged local declaration: {} schemas declared, {} nodes unknown upstream",
        declared.schemas.len(),
        adopted
    );
    aligned
}

/// Returns how many declared nodes were unknown upstream.
fn merge_schema(schema: &mut SchemaNode, local: &SchemaNode) -> usize {
    if local.enabled.is_some() {
        schema.enabled = local.enabled;
    }
    schema.handled = true;

    let mut adopted = 0;
    for (name, local_table) in &local.tables {
        match schema.tables.get_mut(name) {
            Some(table) => adopted += merge_table(table, local_table),
            None => {
                schema.tables.insert(name.clone(), adopt_table(local_table));
                adopted += 1;
            }
        }
    }
    adopted
}

fn merge_table(table: &mut TableNode, local: &TableNode) -> usize {
    if !table.locked && local.enabled.is_some() {
        table.enabled = local.enabled;
    }
    table.handled = true;

    let mut adopted = 0;
    for (name, local_column) in &local.columns {
        match table.columns.get_mut(name) {
            Some(column) => merge_column(column, local_column),
            None => {
                table.columns.insert(name.clone(), adopt_column(local_column));
                adopted += 1;
            }
        }
    }
    adopted
}

fn merge_column(column: &mut ColumnNode, local: &ColumnNode) {
    if !column.locked {
        if local.enabled.is_some() {
            column.enabled = local.enabled;
        }
        if local.hashed.is_some() {
            column.hashed = local.hashed;
        }
    }
    column.handled = true;
}

// A declared node with no upstream counterpart is taken as-is: handled,
// patchable and never excluded by the merge itself.

fn adopt_schema(local: &SchemaNode) -> SchemaNode {
    SchemaNode {
        name: local.name.clone(),
        enabled: local.enabled,
        excluded: false,
        handled: true,
        tables: local
            .tables
            .iter()
            .map(|(name, table)| (name.clone(), adopt_table(table)))
            .collect(),
    }
}

fn adopt_table(local: &TableNode) -> TableNode {
    TableNode {
        name: local.name.clone(),
        enabled: local.enabled,
        locked: false,
        excluded: false,
        handled: true,
        columns: local
            .columns
            .iter()
            .map(|(name, column)| (name.clone(), adopt_column(column)))
            .collect(),
    }
}

fn adopt_column(local: &ColumnNode) -> ColumnNode {
    ColumnNode {
        name: local.name.clone(),
        enabled: local.enabled,
        hashed: local.hashed,
        locked: false,
        excluded: false,
        handled: true,
    }
}
