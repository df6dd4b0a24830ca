//! Emulation overrides
//!
//! Test harnesses use these to force specific, possibly invalid, values into a
//! ceremony. The client only consumes `collected_client_data`; everything else is
//! forwarded to the authenticator untouched.

use crate::webauthn::{AttestationStatement, CollectedClientData};

/// Overrides applied to a registration ceremony
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationEmulationOptions {
    /// Client data to use instead of the one the client would build
    pub collected_client_data: Option<CollectedClientData>,
    /// Statement the authenticator should return instead of its own
    pub attestation_statement: Option<AttestationStatement>,
    /// Signature bytes the authenticator should place in its statement
    pub signature: Option<Vec<u8>>,
}

impl RegistrationEmulationOptions {
    #[must_use]
    pub fn with_collected_client_data(mut self, client_data: CollectedClientData) -> Self {
        self.collected_client_data = Some(client_data);
        self
    }

    #[must_use]
    pub fn with_attestation_statement(mut self, statement: AttestationStatement) -> Self {
        self.attestation_statement = Some(statement);
        self
    }

    #[must_use]
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = Some(signature);
        self
    }
}

/// Overrides applied to an authentication ceremony
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthenticationEmulationOptions {
    /// Signature bytes the authenticator should return instead of its own
    pub signature: Option<Vec<u8>>,
    /// User handle the authenticator should return instead of the stored one
    pub user_handle: Option<Vec<u8>>,
}

impl AuthenticationEmulationOptions {
    #[must_use]
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = Some(signature);
        self
    }

    #[must_use]
    pub fn with_user_handle(mut self, user_handle: Vec<u8>) -> Self {
        self.user_handle = Some(user_handle);
        self
    }
}
