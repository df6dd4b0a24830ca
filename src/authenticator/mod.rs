//! Authenticator abstraction
//!
//! The client never talks to hardware. Anything that can produce attestation
//! objects and assertions implements [`Authenticator`] and is bound to a
//! [`ClientPlatform`](crate::client::ClientPlatform).

mod emulation;
mod errors;
mod types;

pub use emulation::{AuthenticationEmulationOptions, RegistrationEmulationOptions};
pub use errors::AuthenticatorError;
pub use types::{CredentialCreationResponse, CredentialRequestResponse};

use crate::webauthn::{
    CollectedClientData, PublicKeyCredentialCreationOptions, PublicKeyCredentialRequestOptions,
};

/// Authenticator contract
///
/// Calls are synchronous and blocking from the client's perspective. Whatever
/// interaction an implementation simulates internally is opaque to the client.
pub trait Authenticator {
    /// Create a new credential
    ///
    /// # Arguments
    /// * `options` - The relying party's creation options
    /// * `client_data` - The client data the attestation signature must cover
    /// * `emulation` - Test overrides forwarded by the client
    ///
    /// # Returns
    /// * `Ok(CredentialCreationResponse)` - The attestation object for the new credential
    /// * `Err(AuthenticatorError)` - The authenticator refused or failed
    ///
    /// # Errors
    /// Returns `AuthenticatorError::Validation` if the request is not acceptable,
    /// for example when a credential in `exclude_credentials` is already present.
    fn register(
        &mut self,
        options: &PublicKeyCredentialCreationOptions,
        client_data: &CollectedClientData,
        emulation: &RegistrationEmulationOptions,
    ) -> Result<CredentialCreationResponse, AuthenticatorError>;

    /// Produce an assertion with an existing credential
    ///
    /// # Arguments
    /// * `options` - The relying party's request options
    /// * `client_data` - The client data the assertion signature must cover
    /// * `emulation` - Test overrides forwarded by the client
    ///
    /// # Returns
    /// * `Ok(CredentialRequestResponse)` - The assertion
    /// * `Err(AuthenticatorError)` - The authenticator refused or failed
    ///
    /// # Errors
    /// Returns `AuthenticatorError::Validation` if no usable credential exists
    /// for the request.
    fn authenticate(
        &mut self,
        options: &PublicKeyCredentialRequestOptions,
        client_data: &CollectedClientData,
        emulation: &AuthenticationEmulationOptions,
    ) -> Result<CredentialRequestResponse, AuthenticatorError>;

    /// Short name used in log output
    fn name(&self) -> &str {
        "authenticator"
    }
}
