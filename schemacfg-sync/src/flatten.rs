//! Flattener: tree ↔ name-ordered record lists.
//!
//! Carries only name, enabled, hashed and the `patch_allowed` inverse of
//! `locked`. Derived flags (`excluded`, `handled`) are not part of the
//! projection.

use schemacfg_model::{
    ColumnNode, ColumnRecord, ConfigTree, PolicyMode, SchemaNode, SchemaRecord, TableNode,
    TableRecord,
};

/// Flattens a tree into schema records, each with nested table and column lists.
pub fn flatten(tree: &ConfigTree) -> Vec<SchemaRecord> {
    tree.schemas.values().map(flatten_schema).collect()
}

fn flatten_schema(schema: &SchemaNode) -> SchemaRecord {
    SchemaRecord {
        name: schema.name.clone(),
        enabled: schema.enabled,
        tables: schema.tables.values().map(flatten_table).collect(),
    }
}

fn flatten_table(table: &TableNode) -> TableRecord {
    TableRecord {
        name: table.name.clone(),
        enabled: table.enabled,
        patch_allowed: !table.locked,
        columns: table.columns.values().map(flatten_column).collect(),
    }
}

fn flatten_column(column: &ColumnNode) -> ColumnRecord {
    ColumnRecord {
        name: column.name.clone(),
        enabled: column.enabled,
        hashed: column.hashed,
        patch_allowed: !column.locked,
    }
}

/// Rebuilds a tree from flat records, e.g. to use persisted state as a local
/// declaration. Later records win when a name repeats.
pub fn unflatten(policy: PolicyMode, records: &[SchemaRecord]) -> ConfigTree {
    records
        .iter()
        .fold(ConfigTree::new(policy), |tree, record| {
            tree.with_schema(unflatten_schema(record))
        })
}

fn unflatten_schema(record: &SchemaRecord) -> SchemaNode {
    let schema = SchemaNode {
        enabled: record.enabled,
        ..SchemaNode::new(&record.name)
    };
    record
        .tables
        .iter()
        .fold(schema, |schema, table| schema.with_table(unflatten_table(table)))
}

fn unflatten_table(record: &TableRecord) -> TableNode {
    let table = TableNode {
        enabled: record.enabled,
        locked: !record.patch_allowed,
        ..TableNode::new(&record.name)
    };
    record
        .columns
        .iter()
        .fold(table, |table, column| table.with_column(unflatten_column(column)))
}

fn unflatten_column(record: &ColumnRecord) -> ColumnNode {
    ColumnNode {
        enabled: record.enabled,
        hashed: record.hashed,
        locked: !record.patch_allowed,
        ..ColumnNode::new(&record.name)
    }
}
