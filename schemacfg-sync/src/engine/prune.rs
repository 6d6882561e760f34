//! Patch pruner.

use super::align::align;
use schemacfg_model::ConfigTree;
use tracing::debug;

/// Re-derives exclusion from the tree's current state and drops every
/// excluded node, columns first.
///
/// A table that is not itself excluded stays even when all of its columns
/// were dropped: its own enabled flag may still need to travel.
pub fn prune(tree: ConfigTree) -> ConfigTree {
    let mut tree = align(tree);
    tree.schemas.retain(|_, schema| {
        schema.tables.retain(|_, table| {
            table.columns.retain(|_, column| !column.excluded);
            !table.excluded
        });
        !schema.excluded
    });
    debug!(
        "Pruned tree: {} schemas, {} tables, {} columns remain",
        tree.schemas.len(),
        tree.table_count(),
        tree.column_count()
    );
    tree
}
