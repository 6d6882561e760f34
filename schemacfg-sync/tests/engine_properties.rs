//! Property-based tests for the reconciliation engine.
//!
//! Verifies the laws every reconciliation must respect, over generated trees:
//! - No-op reconciliation produces no traffic
//! - Locked nodes are never changed by merge or inversion
//! - A patchable hashed column is never excluded
//! - Parents are excluded only when aligned and all children are excluded
//! - Flatten/read round-trips the remote values

use proptest::prelude::*;
use schemacfg_sync::remote::{PatchSettings, RemoteColumn, RemoteSchema, RemoteTable};
use schemacfg_sync::{
    ColumnNode, ConfigTree, PolicyMode, RemoteSchemaConfig, SchemaNode, TableNode, align,
    desired_tree, flatten, invert, merge, observed_tree, plan_patch, prune, read_upstream,
};

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn policy_strategy() -> impl Strategy<Value = PolicyMode> {
    prop_oneof![
        Just(PolicyMode::AllowAll),
        Just(PolicyMode::AllowColumns),
        Just(PolicyMode::BlockAll),
    ]
}

fn tri_state() -> impl Strategy<Value = Option<bool>> {
    prop_oneof![Just(None), Just(Some(true)), Just(Some(false))]
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(String::from)
}

fn column_strategy() -> impl Strategy<Value = ColumnNode> {
    (name_strategy(), tri_state(), tri_state(), any::<bool>()).prop_map(
        |(name, enabled, hashed, locked)| ColumnNode {
            enabled,
            hashed,
            locked,
            ..ColumnNode::new(name)
        },
    )
}

fn table_strategy() -> impl Strategy<Value = TableNode> {
    (
        name_strategy(),
        tri_state(),
        any::<bool>(),
        prop::collection::vec(column_strategy(), 0..4),
    )
        .prop_map(|(name, enabled, locked, columns)| {
            let table = TableNode {
                enabled,
                locked,
                ..TableNode::new(name)
            };
            columns.into_iter().fold(table, TableNode::with_column)
        })
}

fn schema_strategy() -> impl Strategy<Value = SchemaNode> {
    (
        name_strategy(),
        tri_state(),
        prop::collection::vec(table_strategy(), 0..4),
    )
        .prop_map(|(name, enabled, tables)| {
            let schema = SchemaNode {
                enabled,
                ..SchemaNode::new(name)
            };
            tables.into_iter().fold(schema, SchemaNode::with_table)
        })
}

fn tree_strategy() -> impl Strategy<Value = ConfigTree> {
    (policy_strategy(), prop::collection::vec(schema_strategy(), 0..3)).prop_map(
        |(policy, schemas)| {
            schemas
                .into_iter()
                .fold(ConfigTree::new(policy), ConfigTree::with_schema)
        },
    )
}

/// Declarations never carry lock markers; those come from the remote side.
fn declaration_strategy() -> impl Strategy<Value = ConfigTree> {
    tree_strategy().prop_map(|mut tree| {
        for schema in tree.schemas.values_mut() {
            for table in schema.tables.values_mut() {
                table.locked = false;
                for column in table.columns.values_mut() {
                    column.locked = false;
                }
            }
        }
        tree
    })
}

fn to_remote(tree: &ConfigTree) -> RemoteSchemaConfig {
    let marker = |locked: bool| {
        locked.then(|| PatchSettings {
            allowed: Some(false),
            ..Default::default()
        })
    };
    RemoteSchemaConfig {
        schema_change_handling: tree.policy.to_string(),
        schemas: tree
            .schemas
            .iter()
            .map(|(name, s)| {
                let tables = s
                    .tables
                    .iter()
                    .map(|(name, t)| {
                        let columns = t
                            .columns
                            .iter()
                            .map(|(name, c)| {
                                let column = RemoteColumn {
                                    enabled: c.enabled,
                                    hashed: c.hashed,
                                    enabled_patch_settings: marker(c.locked),
                                    ..Default::default()
                                };
                                (name.clone(), column)
                            })
                            .collect();
                        let table = RemoteTable {
                            enabled: t.enabled,
                            enabled_patch_settings: marker(t.locked),
                            columns,
                            ..Default::default()
                        };
                        (name.clone(), table)
                    })
                    .collect();
                let schema = RemoteSchema {
                    enabled: s.enabled,
                    tables,
                    ..Default::default()
                };
                (name.clone(), schema)
            })
            .collect(),
    }
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    /// Pruning a desired tree twice changes nothing: the patch is a fixpoint.
    #[test]
    fn prune_is_idempotent(tree in tree_strategy()) {
        let once = prune(tree);
        let twice = prune(once.clone());
        prop_assert_eq!(once, twice);
    }

    /// Declaring the observed state back (locked values included) asks for
    /// exactly what the remote side already holds.
    #[test]
    fn redeclaring_observed_state_is_a_fixpoint(upstream in tree_strategy()) {
        let observed = observed_tree(upstream.clone());
        let desired = desired_tree(upstream, &observed);
        prop_assert_eq!(flatten(&desired), flatten(&observed));
    }

    /// With nothing declared, the inverted tree is fully aligned: empty patch.
    #[test]
    fn empty_declaration_yields_empty_patch(upstream in tree_strategy()) {
        let declared = ConfigTree::new(upstream.policy);
        prop_assert!(plan_patch(upstream, &declared).is_empty());
    }

    /// Merge and inversion never change enabled/hashed of locked nodes.
    #[test]
    fn locked_nodes_are_invariant(
        upstream in tree_strategy(),
        declared in declaration_strategy(),
    ) {
        let result = invert(merge(align(upstream.clone()), &declared));
        for (sname, schema) in &upstream.schemas {
            for (tname, table) in &schema.tables {
                let after = result.table(sname, tname).unwrap();
                if table.locked {
                    prop_assert_eq!(after.enabled, table.enabled);
                    prop_assert!(after.locked);
                }
                for (cname, column) in &table.columns {
                    let after = after.column(cname).unwrap();
                    if column.locked {
                        prop_assert_eq!(after.enabled, column.enabled);
                        prop_assert_eq!(after.hashed, column.hashed);
                    }
                }
            }
        }
    }

    /// Handled nodes keep the declared value after inversion.
    #[test]
    fn handled_values_survive_inversion(
        upstream in tree_strategy(),
        declared in declaration_strategy(),
    ) {
        let result = invert(merge(align(upstream), &declared));
        for (sname, schema) in &declared.schemas {
            for (tname, table) in &schema.tables {
                for (cname, column) in &table.columns {
                    let after = result.column(sname, tname, cname).unwrap();
                    prop_assert!(after.handled);
                    if let (false, Some(enabled)) = (after.locked, column.enabled) {
                        prop_assert_eq!(after.enabled, Some(enabled));
                    }
                }
            }
        }
    }

    /// A patchable column marked hashed is never excluded.
    #[test]
    fn hashed_columns_always_travel(tree in tree_strategy()) {
        let aligned = align(tree);
        for schema in aligned.schemas.values() {
            for table in schema.tables.values() {
                for column in table.columns.values() {
                    if !column.locked && column.hashed == Some(true) {
                        prop_assert!(!column.excluded);
                    }
                }
            }
        }
    }

    /// Parents are excluded only when aligned (or locked) with no pending children.
    #[test]
    fn parent_exclusion_law(tree in tree_strategy()) {
        let aligned = align(tree);
        let policy = aligned.policy;
        for schema in aligned.schemas.values() {
            let tables_excluded = schema.tables.values().all(|t| t.excluded);
            prop_assert_eq!(
                schema.excluded,
                tables_excluded && policy.table_aligned(schema.enabled)
            );
            for table in schema.tables.values() {
                let columns_excluded = table.columns.values().all(|c| c.excluded);
                prop_assert_eq!(
                    table.excluded,
                    columns_excluded && (table.locked || policy.table_aligned(table.enabled))
                );
            }
        }
    }

    /// Every node left in a pruned tree is non-excluded.
    #[test]
    fn pruned_tree_has_no_excluded_nodes(tree in tree_strategy()) {
        let pruned = prune(tree);
        for schema in pruned.schemas.values() {
            prop_assert!(!schema.excluded);
            for table in schema.tables.values() {
                prop_assert!(!table.excluded);
                for column in table.columns.values() {
                    prop_assert!(!column.excluded);
                }
            }
        }
    }

    /// Reading a remote tree and flattening it keeps name/enabled/hashed/locked.
    #[test]
    fn read_then_flatten_round_trips(tree in tree_strategy()) {
        let read = read_upstream(&to_remote(&tree)).unwrap();
        prop_assert_eq!(&read, &tree);
        prop_assert_eq!(flatten(&read), flatten(&tree));
    }
}
