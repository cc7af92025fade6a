//! Error taxonomy for the workflow core
//!
//! Per-email failures (generate/send) are scoped to that email's overlay;
//! only refresh failures escalate to the controller's global status. The
//! controller itself never propagates these as `Err` - every failure path
//! ends in an observable status field.

use thiserror::Error;

/// Failures surfaced by a remote mail gateway
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Transport-level failure. Retrying the same operation is safe.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The server rejected the request. The message is shown verbatim.
    #[error("{message}")]
    Server { message: String },

    /// The referenced email no longer exists server-side. Not retryable;
    /// the id must be dropped from local state.
    #[error("Email {id} no longer exists")]
    NotFound { id: String },

    /// The request is malformed (e.g. empty reply text). Caught locally
    /// before any network call where possible.
    #[error("Invalid request: {message}")]
    Validation { message: String },
}

impl GatewayError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }
}

/// Failures surfaced by an auth provider
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Sign-out failed: {message}")]
    SignOut { message: String },

    #[error("Auth provider error: {message}")]
    Provider { message: String },
}
