//! Raw authenticator output
//!
//! These are transient values: the client consumes them within a single
//! ceremony call to assemble the returned credential.

use crate::webauthn::AttestationObject;

/// Result of `authenticatorMakeCredential`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialCreationResponse {
    pub attestation_object: AttestationObject,
}

/// Result of `authenticatorGetAssertion`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialRequestResponse {
    pub credential_id: Vec<u8>,
    pub collected_client_data: Vec<u8>, // Client data JSON the signature covers
    pub authenticator_data: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
}
