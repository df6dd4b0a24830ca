//! Client platform
//!
//! Drives registration and authentication ceremonies between relying-party
//! options and a single bound authenticator, the way a browser would.

use std::fmt;

use crate::authenticator::{
    AuthenticationEmulationOptions, Authenticator, RegistrationEmulationOptions,
};
use crate::settings::ClientSettings;
use crate::utils::logging::CeremonyLogger;
use crate::webauthn::{
    AttestationObjectCodec, AuthenticatorAssertionResponse, AuthenticatorAttestationResponse,
    Challenge, ClientDataType, CollectedClientData, CollectedClientDataCodec, EncodingError,
    Origin, OriginError, PublicKeyCredential, PublicKeyCredentialCreationOptions,
    PublicKeyCredentialRequestOptions, TokenBinding,
};

use super::conveyance;
use super::errors::{AggregatedFailure, CeremonyError};
use super::extensions::ExtensionProcessor;

/// Simulated `WebAuthn` client
///
/// Holds the origin it speaks for and at most one authenticator. Multiple
/// authenticators are not supported; binding a new one replaces the old one.
/// Both are only replaced through `&mut self` or consuming builders, so one
/// instance never has two ceremonies in flight.
pub struct ClientPlatform {
    origin: Origin,
    authenticator: Option<Box<dyn Authenticator>>,
    registration_extensions: ExtensionProcessor,
    authentication_extensions: ExtensionProcessor,
}

impl ClientPlatform {
    /// Create a client for `origin` bound to `authenticator`
    #[must_use]
    pub fn new(origin: Origin, authenticator: impl Authenticator + 'static) -> Self {
        Self::unbound(origin).with_authenticator(authenticator)
    }

    /// Create a client for `origin` with no authenticator bound
    #[must_use]
    pub fn unbound(origin: Origin) -> Self {
        Self {
            origin,
            authenticator: None,
            registration_extensions: ExtensionProcessor::registration(),
            authentication_extensions: ExtensionProcessor::authentication(),
        }
    }

    /// Create an unbound client for the configured origin
    ///
    /// # Errors
    /// Returns `OriginError` if the configured origin cannot be parsed.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, OriginError> {
        Ok(Self::unbound(Origin::parse(&settings.origin)?))
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Some(Box::new(authenticator));
        self
    }

    /// Replace the registration extension table
    #[must_use]
    pub fn with_registration_extensions(mut self, processor: ExtensionProcessor) -> Self {
        self.registration_extensions = processor;
        self
    }

    /// Replace the authentication extension table
    #[must_use]
    pub fn with_authentication_extensions(mut self, processor: ExtensionProcessor) -> Self {
        self.authentication_extensions = processor;
        self
    }

    #[must_use]
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn set_origin(&mut self, origin: Origin) {
        self.origin = origin;
    }

    #[must_use]
    pub fn authenticator(&self) -> Option<&dyn Authenticator> {
        self.authenticator.as_deref()
    }

    pub fn set_authenticator(&mut self, authenticator: Box<dyn Authenticator>) {
        self.authenticator = Some(authenticator);
    }

    /// Remove and return the bound authenticator
    pub fn unbind_authenticator(&mut self) -> Option<Box<dyn Authenticator>> {
        self.authenticator.take()
    }

    /// Run a registration ceremony (`navigator.credentials.create`)
    ///
    /// # Arguments
    /// * `options` - Creation options from the relying party
    /// * `emulation` - Overrides; `collected_client_data` replaces the client data
    ///   this client would build, the rest is forwarded to the authenticator
    ///
    /// # Returns
    /// * `Ok(PublicKeyCredential)` - Credential carrying the attestation response
    /// * `Err(CeremonyError)` - If any step fails; nothing is retried
    ///
    /// # Errors
    /// Returns an error if:
    /// - The challenge is empty
    /// - No authenticator is bound
    /// - The authenticator fails to register
    /// - The attestation conveyance preference is not supported
    /// - The authenticator returned no attested credential data
    /// - Encoding the response fails
    pub fn create(
        &mut self,
        options: &PublicKeyCredentialCreationOptions,
        emulation: &RegistrationEmulationOptions,
    ) -> Result<PublicKeyCredential<AuthenticatorAttestationResponse>, CeremonyError> {
        if options.challenge.is_empty() {
            return Err(CeremonyError::EmptyChallenge);
        }

        let client_data = if let Some(client_data) = &emulation.collected_client_data {
            CeremonyLogger::log_client_data_override();
            client_data.clone()
        } else {
            self.create_collected_client_data(ClientDataType::Create, options.challenge.clone())
        };

        let Some(authenticator) = self.authenticator.as_mut() else {
            CeremonyLogger::log_unbound_authenticator("registration");
            return Err(CeremonyError::UnboundAuthenticator);
        };
        CeremonyLogger::log_ceremony_start("registration", authenticator.name(), &self.origin);

        let registered = authenticator
            .register(options, &client_data, emulation)
            .inspect_err(|e| CeremonyLogger::log_authenticator_failure("registration", e))?
            .attestation_object;

        let credential_id = registered
            .authenticator_data
            .attested_credential_data
            .as_ref()
            .map(|attested| attested.credential_id.clone())
            .ok_or_else(|| {
                EncodingError::malformed("authenticator returned no attested credential data")
            })?;

        let statement = conveyance::decide(
            options.attestation.as_ref(),
            registered.attestation_statement.clone(),
        )?;
        let attestation_object = registered.with_statement(statement);

        let response = AuthenticatorAttestationResponse {
            client_data_json: CollectedClientDataCodec::encode(&client_data)?,
            attestation_object: AttestationObjectCodec::encode(&attestation_object)?,
        };
        let client_extension_results = self
            .registration_extensions
            .process(options.extensions.as_ref());

        CeremonyLogger::log_registration_complete(&credential_id, attestation_object.format());
        Ok(PublicKeyCredential::new(
            credential_id,
            response,
            client_extension_results,
        ))
    }

    /// [`create`](Self::create) without emulation overrides
    ///
    /// # Errors
    /// See [`create`](Self::create).
    pub fn create_with_defaults(
        &mut self,
        options: &PublicKeyCredentialCreationOptions,
    ) -> Result<PublicKeyCredential<AuthenticatorAttestationResponse>, CeremonyError> {
        self.create(options, &RegistrationEmulationOptions::default())
    }

    /// Run an authentication ceremony (`navigator.credentials.get`) with the
    /// given client data
    ///
    /// # Arguments
    /// * `options` - Request options from the relying party
    /// * `client_data` - Client data the assertion signature covers
    /// * `emulation` - Overrides forwarded to the authenticator
    ///
    /// # Returns
    /// * `Ok(PublicKeyCredential)` - Credential carrying the assertion response
    /// * `Err(CeremonyError)` - If the ceremony fails
    ///
    /// # Errors
    /// Returns `CeremonyError::UnboundAuthenticator` if no authenticator is bound,
    /// `CeremonyError::NoAuthenticatorSuccess` carrying the authenticator's
    /// validation failure as a cause, or `CeremonyError::Authenticator` for any
    /// other authenticator failure.
    pub fn get(
        &mut self,
        options: &PublicKeyCredentialRequestOptions,
        client_data: &CollectedClientData,
        emulation: &AuthenticationEmulationOptions,
    ) -> Result<PublicKeyCredential<AuthenticatorAssertionResponse>, CeremonyError> {
        let Some(authenticator) = self.authenticator.as_mut() else {
            CeremonyLogger::log_unbound_authenticator("authentication");
            return Err(CeremonyError::UnboundAuthenticator);
        };
        CeremonyLogger::log_ceremony_start("authentication", authenticator.name(), &self.origin);

        let mut failure = AggregatedFailure::new();
        match authenticator.authenticate(options, client_data, emulation) {
            Ok(assertion) => {
                let client_extension_results = self
                    .authentication_extensions
                    .process(options.extensions.as_ref());

                CeremonyLogger::log_assertion_complete(&assertion.credential_id);
                return Ok(PublicKeyCredential::new(
                    assertion.credential_id,
                    AuthenticatorAssertionResponse {
                        client_data_json: assertion.collected_client_data,
                        authenticator_data: assertion.authenticator_data,
                        signature: assertion.signature,
                        user_handle: assertion.user_handle,
                    },
                    client_extension_results,
                ));
            }
            Err(e) if e.is_validation() => {
                CeremonyLogger::log_authenticator_failure("authentication", &e);
                failure.add_cause(e);
            }
            Err(e) => {
                CeremonyLogger::log_authenticator_failure("authentication", &e);
                return Err(CeremonyError::Authenticator(e));
            }
        }
        Err(CeremonyError::NoAuthenticatorSuccess(failure))
    }

    /// [`get`](Self::get) without emulation overrides
    ///
    /// # Errors
    /// See [`get`](Self::get).
    pub fn get_with_client_data(
        &mut self,
        options: &PublicKeyCredentialRequestOptions,
        client_data: &CollectedClientData,
    ) -> Result<PublicKeyCredential<AuthenticatorAssertionResponse>, CeremonyError> {
        self.get(options, client_data, &AuthenticationEmulationOptions::default())
    }

    /// Run an authentication ceremony with client data built from the options'
    /// challenge and this client's origin, without token binding
    ///
    /// # Errors
    /// Returns `CeremonyError::EmptyChallenge` for an empty challenge, otherwise
    /// see [`get`](Self::get).
    pub fn get_assertion(
        &mut self,
        options: &PublicKeyCredentialRequestOptions,
    ) -> Result<PublicKeyCredential<AuthenticatorAssertionResponse>, CeremonyError> {
        if options.challenge.is_empty() {
            return Err(CeremonyError::EmptyChallenge);
        }
        let client_data =
            self.create_collected_client_data(ClientDataType::Get, options.challenge.clone());
        self.get_with_client_data(options, &client_data)
    }

    /// Client data for this client's origin, without token binding
    #[must_use]
    pub fn create_collected_client_data(
        &self,
        r#type: ClientDataType,
        challenge: Challenge,
    ) -> CollectedClientData {
        let client_data = CollectedClientData::new(r#type, challenge, self.origin.clone(), None);
        CeremonyLogger::log_client_data_built(&client_data);
        client_data
    }

    /// Client data for this client's origin with a present token binding
    #[must_use]
    pub fn create_collected_client_data_with_token_binding(
        &self,
        r#type: ClientDataType,
        challenge: Challenge,
        token_binding_id: Vec<u8>,
    ) -> CollectedClientData {
        let client_data = CollectedClientData::new(
            r#type,
            challenge,
            self.origin.clone(),
            Some(TokenBinding::present(token_binding_id)),
        );
        CeremonyLogger::log_client_data_built(&client_data);
        client_data
    }
}

impl Default for ClientPlatform {
    fn default() -> Self {
        Self::unbound(Origin::default())
    }
}

impl fmt::Debug for ClientPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientPlatform")
            .field("origin", &self.origin)
            .field("authenticator", &self.authenticator.as_ref().map(|a| a.name()))
            .field("registration_extensions", &self.registration_extensions)
            .field("authentication_extensions", &self.authentication_extensions)
            .finish()
    }
}
