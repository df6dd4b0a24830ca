//! Collected client data
//!
//! The client-built record that binds a ceremony to its challenge, origin and
//! optional token binding, and its JSON encoding (`clientDataJSON`).

use serde::{Deserialize, Serialize};

use super::errors::EncodingError;
use super::origin::Origin;

/// Ceremony kind recorded in the client data
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientDataType {
    #[serde(rename = "webauthn.create")]
    Create,
    #[serde(rename = "webauthn.get")]
    Get,
}

impl ClientDataType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ClientDataType::Create => "webauthn.create",
            ClientDataType::Get => "webauthn.get",
        }
    }
}

/// Relying-party supplied challenge bytes
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Challenge(#[serde(with = "super::base64url")] Vec<u8>);

impl Challenge {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Challenge {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Challenge {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TokenBindingStatus {
    Present,
    Supported,
    NotSupported,
}

/// TLS token binding reported by the client
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenBinding {
    pub status: TokenBindingStatus,
    #[serde(
        default,
        with = "super::base64url::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Vec<u8>>,
}

impl TokenBinding {
    /// A `present` binding carrying the given token binding id
    #[must_use]
    pub fn present(id: impl Into<Vec<u8>>) -> Self {
        Self {
            status: TokenBindingStatus::Present,
            id: Some(id.into()),
        }
    }
}

/// Client data collected for one ceremony
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectedClientData {
    #[serde(rename = "type")]
    pub r#type: ClientDataType,
    pub challenge: Challenge,
    pub origin: Origin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_binding: Option<TokenBinding>,
}

impl CollectedClientData {
    #[must_use]
    pub fn new(
        r#type: ClientDataType,
        challenge: Challenge,
        origin: Origin,
        token_binding: Option<TokenBinding>,
    ) -> Self {
        Self {
            r#type,
            challenge,
            origin,
            token_binding,
        }
    }
}

/// JSON codec for [`CollectedClientData`]
pub struct CollectedClientDataCodec;

impl CollectedClientDataCodec {
    /// Serialize to the UTF-8 JSON bytes sent as `clientDataJSON`
    ///
    /// # Errors
    /// Returns `EncodingError::Json` if serialization fails.
    pub fn encode(client_data: &CollectedClientData) -> Result<Vec<u8>, EncodingError> {
        Ok(serde_json::to_vec(client_data)?)
    }

    /// Parse `clientDataJSON` bytes
    ///
    /// # Errors
    /// Returns `EncodingError::Json` if the bytes are not valid client data JSON.
    pub fn decode(bytes: &[u8]) -> Result<CollectedClientData, EncodingError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
