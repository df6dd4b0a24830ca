//! `WebAuthn` core types
//!
//! This module defines the ceremony options a relying party hands to the client
//! and the credentials the client hands back.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::attestation::AttestationObject;
use super::base64url;
use super::cbor::AttestationObjectCodec;
use super::client_data::{Challenge, CollectedClientData, CollectedClientDataCodec};
use super::errors::EncodingError;
use super::extensions::{ClientExtensionInputs, ClientExtensionOutputs};

/// `WebAuthn` relying party information
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RelyingParty {
    pub id: String,   // Domain name (e.g., "example.com")
    pub name: String, // Display name
}

/// `WebAuthn` user entity
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    #[serde(with = "base64url")]
    pub id: Vec<u8>,          // User handle
    pub name: String,         // Username (e.g., email)
    pub display_name: String, // Display name
}

/// Public key credential parameters
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyCredentialParameters {
    #[serde(rename = "type")]
    pub r#type: String, // Always "public-key"
    pub alg: i64,       // Algorithm identifier (-7 for ES256, -257 for RS256)
}

impl PublicKeyCredentialParameters {
    #[must_use]
    pub fn public_key(alg: i64) -> Self {
        Self {
            r#type: PUBLIC_KEY_TYPE.to_string(),
            alg,
        }
    }
}

/// Authenticator selection criteria
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelectionCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<String>, // "platform", "cross-platform"
    #[serde(default)]
    pub require_resident_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<String>, // "required", "preferred", "discouraged"
}

/// Public key credential descriptor
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyCredentialDescriptor {
    #[serde(rename = "type")]
    pub r#type: String, // Always "public-key"
    #[serde(with = "base64url")]
    pub id: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>, // "usb", "nfc", "ble", "internal"
}

/// How much attestation detail the relying party wants returned
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum AttestationConveyancePreference {
    None,
    Indirect,
    Direct,
    Enterprise,
    /// A value this client does not recognize
    Other(String),
}

impl AttestationConveyancePreference {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            AttestationConveyancePreference::None => "none",
            AttestationConveyancePreference::Indirect => "indirect",
            AttestationConveyancePreference::Direct => "direct",
            AttestationConveyancePreference::Enterprise => "enterprise",
            AttestationConveyancePreference::Other(value) => value,
        }
    }
}

impl From<&str> for AttestationConveyancePreference {
    fn from(value: &str) -> Self {
        match value {
            "none" => AttestationConveyancePreference::None,
            "indirect" => AttestationConveyancePreference::Indirect,
            "direct" => AttestationConveyancePreference::Direct,
            "enterprise" => AttestationConveyancePreference::Enterprise,
            other => AttestationConveyancePreference::Other(other.to_string()),
        }
    }
}

impl From<String> for AttestationConveyancePreference {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<AttestationConveyancePreference> for String {
    fn from(value: AttestationConveyancePreference) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AttestationConveyancePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a registration ceremony (`navigator.credentials.create`)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialCreationOptions {
    pub rp: RelyingParty,
    pub user: UserEntity,
    pub challenge: Challenge,
    pub pub_key_cred_params: Vec<PublicKeyCredentialParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>, // Timeout in milliseconds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_credentials: Vec<PublicKeyCredentialDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_selection: Option<AuthenticatorSelectionCriteria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation: Option<AttestationConveyancePreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ClientExtensionInputs>,
}

/// Options for an authentication ceremony (`navigator.credentials.get`)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialRequestOptions {
    pub challenge: Challenge,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>, // Timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow_credentials: Vec<PublicKeyCredentialDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<String>, // "required", "preferred", "discouraged"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ClientExtensionInputs>,
}

/// Authenticator attestation response produced by a registration ceremony
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorAttestationResponse {
    #[serde(rename = "clientDataJSON", with = "base64url")]
    pub client_data_json: Vec<u8>,
    #[serde(with = "base64url")]
    pub attestation_object: Vec<u8>,
}

impl AuthenticatorAttestationResponse {
    /// Decode the attestation object bytes
    ///
    /// # Errors
    /// Returns an `EncodingError` if the bytes are not a valid attestation object.
    pub fn decode_attestation_object(&self) -> Result<AttestationObject, EncodingError> {
        AttestationObjectCodec::decode(&self.attestation_object)
    }

    /// Decode the client data JSON
    ///
    /// # Errors
    /// Returns an `EncodingError` if the bytes are not valid client data JSON.
    pub fn decode_client_data(&self) -> Result<CollectedClientData, EncodingError> {
        CollectedClientDataCodec::decode(&self.client_data_json)
    }
}

/// Authenticator assertion response produced by an authentication ceremony
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorAssertionResponse {
    #[serde(rename = "clientDataJSON", with = "base64url")]
    pub client_data_json: Vec<u8>,
    #[serde(with = "base64url")]
    pub authenticator_data: Vec<u8>,
    #[serde(with = "base64url")]
    pub signature: Vec<u8>,
    #[serde(default, with = "base64url::option")]
    pub user_handle: Option<Vec<u8>>,
}

impl AuthenticatorAssertionResponse {
    /// Decode the client data JSON
    ///
    /// # Errors
    /// Returns an `EncodingError` if the bytes are not valid client data JSON.
    pub fn decode_client_data(&self) -> Result<CollectedClientData, EncodingError> {
        CollectedClientDataCodec::decode(&self.client_data_json)
    }
}

const PUBLIC_KEY_TYPE: &str = "public-key";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PublicKeyCredentialType {
    #[default]
    #[serde(rename = "public-key")]
    PublicKey,
}

/// Credential returned by the client, serialized the way browsers render it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredential<R> {
    id: String, // Base64URL-encoded credential ID
    #[serde(with = "base64url")]
    raw_id: Vec<u8>,
    #[serde(rename = "type")]
    r#type: PublicKeyCredentialType,
    response: R,
    client_extension_results: ClientExtensionOutputs,
}

impl<R> PublicKeyCredential<R> {
    #[must_use]
    pub fn new(
        raw_id: Vec<u8>,
        response: R,
        client_extension_results: ClientExtensionOutputs,
    ) -> Self {
        Self {
            id: base64url::encode(&raw_id),
            raw_id,
            r#type: PublicKeyCredentialType::PublicKey,
            response,
            client_extension_results,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn raw_id(&self) -> &[u8] {
        &self.raw_id
    }

    #[must_use]
    pub fn response(&self) -> &R {
        &self.response
    }

    #[must_use]
    pub fn client_extension_results(&self) -> &ClientExtensionOutputs {
        &self.client_extension_results
    }
}
