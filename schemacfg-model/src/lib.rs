//! Schema configuration model for connectors.
//!
//! Defines the strongly-typed tree every reconciliation step operates on:
//! - [`PolicyMode`] — connector-wide schema change handling policy
//! - [`ConfigTree`] → [`SchemaNode`] → [`TableNode`] → [`ColumnNode`]
//! - [`SchemaRecord`], [`TableRecord`], [`ColumnRecord`] — the flat projection
//!   handed back to callers for persistence and display
//!
//! Node fields use `Option<bool>` for "enabled" and "hashed" so that a sparse
//! local declaration can say "no opinion" without sentinel values.

mod node;
mod policy;
mod record;

pub use node::{ColumnNode, ConfigTree, SchemaNode, TableNode};
pub use policy::PolicyMode;
pub use record::{ColumnRecord, SchemaRecord, TableRecord};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in model operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown schema change handling policy: {0}")]
    UnknownPolicy(String),
}
