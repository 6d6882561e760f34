//! Schema configuration reconciliation for connectors.
//!
//! The remote side owns the schema → table → column tree of a connector. A
//! local declaration is sparse: it only states exceptions, and a
//! connector-wide [`PolicyMode`] decides what every unmentioned entity should
//! look like.
//!
//! # Components
//!
//! - **Reader**: remote fetch result → [`ConfigTree`]
//! - **Engine**: align, merge, invert and prune (pure tree transforms)
//! - **Flattener**: tree → name-ordered records for persisted state
//! - **Client**: the [`SchemaClient`] seam and its HTTP implementation
//! - **Reconciler**: runs fetch → engine → submit → read-back
//!
//! # Example
//!
//! ```
//! use schemacfg_model::{ColumnNode, ConfigTree, PolicyMode, SchemaNode, TableNode};
//! use schemacfg_sync::engine::plan_patch;
//!
//! let upstream = ConfigTree::new(PolicyMode::AllowColumns).with_schema(
//!     SchemaNode::new("public")
//!         .enabled(false)
//!         .with_table(TableNode::new("users").enabled(false).with_column(ColumnNode::new("id"))),
//! );
//! let declared = ConfigTree::new(PolicyMode::AllowColumns)
//!     .with_schema(SchemaNode::new("public").with_table(TableNode::new("users").enabled(true)));
//!
//! let patch = plan_patch(upstream, &declared);
//! assert_eq!(patch.schemas["public"].tables["users"].enabled, Some(true));
//! ```

pub mod client;
pub mod engine;
mod error;
pub mod flatten;
pub mod http;
pub mod reader;
mod reconciler;
pub mod remote;

pub use client::SchemaClient;
pub use engine::{align, desired_tree, invert, merge, observed_tree, plan_patch, prune};
pub use error::{SyncError, SyncResult};
pub use flatten::{flatten, unflatten};
pub use http::{HttpClientConfig, HttpSchemaClient};
pub use reader::read_upstream;
pub use reconciler::{ReconcileOutcome, Reconciler, ReconcilerConfig, SchemaConfigState};
pub use remote::{
    ApiResponse, ColumnPatchEntry, PatchSettings, ReloadExcludeMode, RemoteColumn, RemoteSchema,
    RemoteSchemaConfig, RemoteTable, SchemaPatch, SchemaPatchEntry, TablePatchEntry,
};

pub use schemacfg_model::{
    ColumnNode, ColumnRecord, ConfigTree, PolicyMode, SchemaNode, SchemaRecord, TableNode,
    TableRecord,
};
