//! Authenticator error types

use thiserror::Error;

/// Failures an authenticator can signal during a ceremony
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticatorError {
    /// The authenticator rejected the request (unknown credential, RP ID mismatch,
    /// user verification unavailable, ...)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The authenticator cannot satisfy the requested parameters
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Any other authenticator-side failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthenticatorError {
    /// Whether this is a validation failure, the kind the client aggregates
    /// during an assertion ceremony
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, AuthenticatorError::Validation(_))
    }
}
