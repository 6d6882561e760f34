use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Connector-wide schema change handling policy.
///
/// Decides the default enabled state of every schema, table and column that
/// the local declaration does not mention. Serialized as the remote tokens
/// `ALLOW_ALL`, `ALLOW_COLUMNS` and `BLOCK_ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyMode {
    /// Everything new is enabled.
    AllowAll,
    /// New schemas and tables are blocked; columns of allowed tables are enabled.
    AllowColumns,
    /// Everything new is disabled.
    BlockAll,
}

impl PolicyMode {
    /// All policy values, in token order.
    pub const ALL: [PolicyMode; 3] = [Self::AllowAll, Self::AllowColumns, Self::BlockAll];

    /// Remote token for this policy.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AllowAll => "ALLOW_ALL",
            Self::AllowColumns => "ALLOW_COLUMNS",
            Self::BlockAll => "BLOCK_ALL",
        }
    }

    /// Default enabled state of a schema or table under this policy.
    pub const fn table_default(&self) -> bool {
        match self {
            Self::AllowAll => true,
            Self::AllowColumns | Self::BlockAll => false,
        }
    }

    /// Default enabled state of a column under this policy.
    pub const fn column_default(&self) -> bool {
        match self {
            Self::AllowAll | Self::AllowColumns => true,
            Self::BlockAll => false,
        }
    }

    /// Whether a schema or table with the given enabled state already matches
    /// the policy default. Unset counts as aligned.
    pub fn table_aligned(&self, enabled: Option<bool>) -> bool {
        enabled.is_none_or(|e| e == self.table_default())
    }

    /// Whether a column with the given enabled state already matches the
    /// policy default. Unset counts as aligned.
    pub fn column_aligned(&self, enabled: Option<bool>) -> bool {
        enabled.is_none_or(|e| e == self.column_default())
    }
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ALLOW_ALL" => Ok(Self::AllowAll),
            "ALLOW_COLUMNS" => Ok(Self::AllowColumns),
            "BLOCK_ALL" => Ok(Self::BlockAll),
            other => Err(Error::UnknownPolicy(other.to_string())),
        }
    }
}
