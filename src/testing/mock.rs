//! Stub authenticator for testing
//!
//! Produces structurally valid attestation objects and assertions without any
//! cryptography. Signatures are fixed byte strings.

use std::cell::Cell;
use std::rc::Rc;

use crate::authenticator::{
    AuthenticationEmulationOptions, Authenticator, AuthenticatorError,
    CredentialCreationResponse, CredentialRequestResponse, RegistrationEmulationOptions,
};
use crate::webauthn::authenticator_data::{FLAG_UP, FLAG_UV};
use crate::webauthn::{
    Aaguid, AttestationObject, AttestationStatement, AttestedCredentialData, AuthenticatorData,
    CollectedClientData, CollectedClientDataCodec, PublicKeyCredentialCreationOptions,
    PublicKeyCredentialRequestOptions,
};

use super::constants::{ALG_ES256, TEST_CREDENTIAL_ID, TEST_SIGNATURE, TEST_USER_HANDLE};
use super::fixtures::TestFixtures;

/// Shared view of how often an authenticator was invoked
///
/// Clones observe the same counts, so a test can keep one after handing the
/// authenticator to a client.
#[derive(Clone, Debug, Default)]
pub struct CallCounter {
    registrations: Rc<Cell<usize>>,
    authentications: Rc<Cell<usize>>,
}

impl CallCounter {
    #[must_use]
    pub fn registrations(&self) -> usize {
        self.registrations.get()
    }

    #[must_use]
    pub fn authentications(&self) -> usize {
        self.authentications.get()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.registrations() + self.authentications()
    }

    fn record_registration(&self) {
        self.registrations.set(self.registrations.get() + 1);
    }

    fn record_authentication(&self) {
        self.authentications.set(self.authentications.get() + 1);
    }
}

/// Deterministic in-memory authenticator holding a single credential
#[derive(Clone, Debug)]
pub struct StubAuthenticator {
    aaguid: Aaguid,
    credential_id: Vec<u8>,
    credential_public_key: Vec<u8>,
    attestation_statement: AttestationStatement,
    signature: Vec<u8>,
    user_handle: Option<Vec<u8>>,
    sign_count: u32,
    failure: Option<AuthenticatorError>,
    calls: CallCounter,
}

impl StubAuthenticator {
    /// Authenticator with the zero AAGUID returning packed attestation
    #[must_use]
    pub fn new() -> Self {
        Self {
            aaguid: Aaguid::ZERO,
            credential_id: TEST_CREDENTIAL_ID.to_vec(),
            credential_public_key: TestFixtures::cose_public_key(),
            attestation_statement: TestFixtures::packed_statement(),
            signature: TEST_SIGNATURE.to_vec(),
            user_handle: Some(TEST_USER_HANDLE.to_vec()),
            sign_count: 0,
            failure: None,
            calls: CallCounter::default(),
        }
    }

    #[must_use]
    pub fn with_aaguid(mut self, aaguid: Aaguid) -> Self {
        self.aaguid = aaguid;
        self
    }

    #[must_use]
    pub fn with_credential_id(mut self, credential_id: impl Into<Vec<u8>>) -> Self {
        self.credential_id = credential_id.into();
        self
    }

    /// COSE key bytes placed in the attested credential data, unvalidated
    #[must_use]
    pub fn with_credential_public_key(mut self, credential_public_key: impl Into<Vec<u8>>) -> Self {
        self.credential_public_key = credential_public_key.into();
        self
    }

    /// Statement returned from registration unless the emulation options carry one
    #[must_use]
    pub fn with_attestation_statement(mut self, statement: AttestationStatement) -> Self {
        self.attestation_statement = statement;
        self
    }

    #[must_use]
    pub fn with_user_handle(mut self, user_handle: Option<Vec<u8>>) -> Self {
        self.user_handle = user_handle;
        self
    }

    /// Fail every ceremony with `error`
    #[must_use]
    pub fn failing_with(mut self, error: AuthenticatorError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Counter that keeps observing this authenticator after it is moved
    #[must_use]
    pub fn call_counter(&self) -> CallCounter {
        self.calls.clone()
    }

    #[must_use]
    pub fn sign_count(&self) -> u32 {
        self.sign_count
    }

    fn check_failure(&self) -> Result<(), AuthenticatorError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn next_sign_count(&mut self) -> u32 {
        self.sign_count = self.sign_count.wrapping_add(1);
        self.sign_count
    }
}

impl Default for StubAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

impl Authenticator for StubAuthenticator {
    fn register(
        &mut self,
        options: &PublicKeyCredentialCreationOptions,
        _client_data: &CollectedClientData,
        emulation: &RegistrationEmulationOptions,
    ) -> Result<CredentialCreationResponse, AuthenticatorError> {
        self.calls.record_registration();
        self.check_failure()?;

        if options
            .exclude_credentials
            .iter()
            .any(|descriptor| descriptor.id == self.credential_id)
        {
            return Err(AuthenticatorError::Validation(
                "credential already registered".to_string(),
            ));
        }
        if !options.pub_key_cred_params.is_empty()
            && !options
                .pub_key_cred_params
                .iter()
                .any(|params| params.alg == ALG_ES256)
        {
            return Err(AuthenticatorError::NotSupported(
                "no supported public key algorithm".to_string(),
            ));
        }

        let mut statement = emulation
            .attestation_statement
            .clone()
            .unwrap_or_else(|| self.attestation_statement.clone());
        if let Some(signature) = &emulation.signature {
            replace_signature(&mut statement, signature);
        }

        let sign_count = self.next_sign_count();
        let authenticator_data = AuthenticatorData::new(
            &options.rp.id,
            FLAG_UP | FLAG_UV,
            sign_count,
            Some(AttestedCredentialData {
                aaguid: self.aaguid,
                credential_id: self.credential_id.clone(),
                credential_public_key: self.credential_public_key.clone(),
            }),
            None,
        );

        Ok(CredentialCreationResponse {
            attestation_object: AttestationObject::new(authenticator_data, statement),
        })
    }

    fn authenticate(
        &mut self,
        options: &PublicKeyCredentialRequestOptions,
        client_data: &CollectedClientData,
        emulation: &AuthenticationEmulationOptions,
    ) -> Result<CredentialRequestResponse, AuthenticatorError> {
        self.calls.record_authentication();
        self.check_failure()?;

        if !options.allow_credentials.is_empty()
            && !options
                .allow_credentials
                .iter()
                .any(|descriptor| descriptor.id == self.credential_id)
        {
            return Err(AuthenticatorError::Validation(
                "no matching credential".to_string(),
            ));
        }

        let rp_id = options
            .rp_id
            .clone()
            .unwrap_or_else(|| client_data.origin.host().to_string());
        let sign_count = self.next_sign_count();
        let authenticator_data =
            AuthenticatorData::new(&rp_id, FLAG_UP | FLAG_UV, sign_count, None, None)
                .to_bytes()
                .map_err(|e| AuthenticatorError::Internal(e.to_string()))?;
        let collected_client_data = CollectedClientDataCodec::encode(client_data)
            .map_err(|e| AuthenticatorError::Internal(e.to_string()))?;

        Ok(CredentialRequestResponse {
            credential_id: self.credential_id.clone(),
            collected_client_data,
            authenticator_data,
            signature: emulation
                .signature
                .clone()
                .unwrap_or_else(|| self.signature.clone()),
            user_handle: emulation
                .user_handle
                .clone()
                .or_else(|| self.user_handle.clone()),
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn replace_signature(statement: &mut AttestationStatement, signature: &[u8]) {
    match statement {
        AttestationStatement::Packed(s) => s.sig = signature.to_vec(),
        AttestationStatement::Tpm(s) => s.sig = signature.to_vec(),
        AttestationStatement::AndroidKey(s) => s.sig = signature.to_vec(),
        AttestationStatement::FidoU2f(s) => s.sig = signature.to_vec(),
        AttestationStatement::None | AttestationStatement::AndroidSafetynet(_) => {}
    }
}
