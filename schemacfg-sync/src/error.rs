//! Error types for schema reconciliation.

use thiserror::Error;

/// Result type for reconciliation operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while reconciling a connector's schema configuration.
///
/// Remote failures always keep the remote code and message so callers can
/// tell retryable conditions from permanent ones.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote side has no schema configuration for the connector yet.
    /// Recovered once by reloading; fatal on the second occurrence.
    #[error("schema config not initialized ({code}): {message}")]
    SchemaConfigNotInitialized { code: String, message: String },

    /// The remote API answered with a non-success response.
    #[error("remote error {status} ({code}): {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
    },

    /// The remote API refused the outbound patch.
    #[error("patch rejected ({code}): {message}")]
    PatchRejected { code: String, message: String },

    /// Transport failure before a response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The response could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The remote reported a policy token outside the known set.
    #[error("unknown schema change handling policy: {0}")]
    UnknownPolicy(String),
}

impl SyncError {
    /// Remote error code, for the variants that carry one.
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            Self::SchemaConfigNotInitialized { code, .. }
            | Self::Remote { code, .. }
            | Self::PatchRejected { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Remote error message, for the variants that carry one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::SchemaConfigNotInitialized { message, .. }
            | Self::Remote { message, .. }
            | Self::PatchRejected { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Converts a submit failure into the verbatim patch rejection surfaced to
    /// callers. Errors without a remote code pass through unchanged.
    pub(crate) fn into_patch_rejection(self) -> Self {
        match self {
            Self::Remote { code, message, .. }
            | Self::SchemaConfigNotInitialized { code, message } => {
                Self::PatchRejected { code, message }
            }
            other => other,
        }
    }
}

impl From<schemacfg_model::Error> for SyncError {
    fn from(err: schemacfg_model::Error) -> Self {
        match err {
            schemacfg_model::Error::UnknownPolicy(token) => Self::UnknownPolicy(token),
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
