//! Schema policy reconciliation engine.
//!
//! Four pure stages, each taking a tree by value and returning a new one:
//!
//! 1. [`align`] — mark nodes that already sit at the policy default as excluded
//! 2. [`merge`] — overlay the sparse local declaration, marking nodes handled
//! 3. [`invert`] — reset every unresolved node to the policy default
//! 4. [`prune`] — re-derive exclusion and drop excluded nodes
//!
//! No I/O happens here; fetching and submitting belong to the
//! [`Reconciler`](crate::Reconciler).

mod align;
mod invert;
mod merge;
mod prune;

pub use align::align;
pub use invert::invert;
pub use merge::merge;
pub use prune::prune;

use crate::remote::SchemaPatch;
use schemacfg_model::ConfigTree;

/// Runs the full desired-state pipeline: the upstream tree is aligned under
/// the declared policy, merged, inverted and pruned.
pub fn desired_tree(upstream: ConfigTree, declared: &ConfigTree) -> ConfigTree {
    let aligned = align(upstream.with_policy(declared.policy));
    prune(invert(merge(aligned, declared)))
}

/// Projects a freshly read tree onto the entries that diverge from its own
/// policy. This is what gets flattened into persisted state.
pub fn observed_tree(upstream: ConfigTree) -> ConfigTree {
    prune(align(upstream))
}

/// Builds the outbound patch for `declared` against `upstream`.
pub fn plan_patch(upstream: ConfigTree, declared: &ConfigTree) -> SchemaPatch {
    let policy_change = (upstream.policy != declared.policy).then_some(declared.policy);
    SchemaPatch::from_tree(&desired_tree(upstream, declared), policy_change)
}
