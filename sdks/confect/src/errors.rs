//! Error taxonomy for SDK operations.
//!
//! Every failure surfaced by the SDK is an [`SdkError`]. Transport and server
//! failures keep their underlying [`tonic::Status`] as the error source so
//! callers can still inspect gRPC codes when they need to.

use std::time::Duration;

use tonic::Status;

/// Domain errors raised by the storefront username check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameCheckError {
    /// The account has not been activated yet, which is a prerequisite for
    /// picking a username.
    #[error("USERNAME_INELIGIBLE")]
    Ineligible,

    /// The username is not taken, but is rejected for policy reasons (banned
    /// terms or invalid username options).
    #[error("USERNAME_INVALID")]
    Invalid,
}

/// Errors produced by SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// The client-side deadline elapsed before the server answered.
    #[error("rpc '{method}' timed out after {timeout:?}")]
    RpcTimeout {
        method: &'static str,
        timeout: Duration,
    },

    /// The call reached the transport but failed with a gRPC status.
    #[error("rpc '{method}' failed: {status}")]
    RpcExecution {
        method: &'static str,
        #[source]
        status: Status,
    },

    /// Service or transport construction failed.
    #[error("service setup failed: {0}")]
    Setup(#[source] anyhow::Error),

    /// An operation was attempted against a closed SDK manager.
    #[error("sdk manager is closed")]
    Closed,

    /// Username validation failed on the server side.
    #[error(transparent)]
    UsernameCheck(#[from] UsernameCheckError),
}

impl SdkError {
    /// The underlying gRPC status, when the error carries one.
    #[must_use]
    pub fn status(&self) -> Option<&Status> {
        match self {
            Self::RpcExecution { status, .. } => Some(status),
            _ => None,
        }
    }

    /// True when the failure was a client-side timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RpcTimeout { .. })
    }

    pub(crate) fn setup(err: impl Into<anyhow::Error>) -> Self {
        Self::Setup(err.into())
    }
}
