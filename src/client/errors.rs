//! Ceremony error types
//!
//! Callers need to tell apart an unbound client, an authenticator that refused the
//! ceremony and a conveyance preference this client does not support: each calls
//! for a different fix. None of them is retryable.

use std::fmt;

use thiserror::Error;

use crate::authenticator::AuthenticatorError;
use crate::webauthn::EncodingError;

/// Failure of a whole ceremony, carrying every underlying cause in report order
///
/// `source()` yields the first cause.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregatedFailure {
    causes: Vec<AuthenticatorError>,
}

impl AggregatedFailure {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cause(&mut self, cause: AuthenticatorError) {
        self.causes.push(cause);
    }

    #[must_use]
    pub fn causes(&self) -> &[AuthenticatorError] {
        &self.causes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }
}

impl fmt::Display for AggregatedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No authenticator completed the ceremony")?;
        match self.causes.as_slice() {
            [] => Ok(()),
            [cause] => write!(f, ": {cause}"),
            [first, rest @ ..] => write!(f, ": {first} (and {} more)", rest.len()),
        }
    }
}

impl std::error::Error for AggregatedFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes
            .first()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Errors returned by [`ClientPlatform`](super::ClientPlatform) ceremonies
#[derive(Debug, Error)]
pub enum CeremonyError {
    /// A ceremony was attempted with no authenticator bound
    #[error("No authenticator is bound to the client")]
    UnboundAuthenticator,

    /// The authenticator reported validation failures during an assertion
    #[error(transparent)]
    NoAuthenticatorSuccess(AggregatedFailure),

    /// The requested behavior is deliberately unsupported
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// The ceremony options carry an empty challenge
    #[error("Challenge must not be empty")]
    EmptyChallenge,

    /// Encoding a response failed
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The authenticator failed outside of assertion validation
    #[error("Authenticator error: {0}")]
    Authenticator(#[from] AuthenticatorError),
}

impl CeremonyError {
    #[must_use]
    pub fn is_unbound_authenticator(&self) -> bool {
        matches!(self, CeremonyError::UnboundAuthenticator)
    }

    #[must_use]
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, CeremonyError::NotImplemented(_))
    }

    /// Whether the authenticator itself caused the failure
    #[must_use]
    pub fn is_authenticator_failure(&self) -> bool {
        matches!(
            self,
            CeremonyError::NoAuthenticatorSuccess(_) | CeremonyError::Authenticator(_)
        )
    }

    /// Underlying authenticator failures, empty for other kinds
    #[must_use]
    pub fn causes(&self) -> &[AuthenticatorError] {
        match self {
            CeremonyError::NoAuthenticatorSuccess(failure) => failure.causes(),
            CeremonyError::Authenticator(err) => std::slice::from_ref(err),
            _ => &[],
        }
    }

    /// Ceremonies are never retried; every failure is final for the call
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}
