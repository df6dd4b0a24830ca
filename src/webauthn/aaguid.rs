//! Authenticator Attestation GUID
//!
//! Identifies the make and model of an authenticator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::errors::AaguidError;

/// 128-bit authenticator model identifier
///
/// Values built from a `Uuid`, from 16 raw bytes or from canonical text compare
/// and hash equal whenever they carry the same 128 bits. [`Aaguid::NULL`] carries
/// no value and stands for "model unknown"; it is never equal to [`Aaguid::ZERO`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Aaguid(Option<Uuid>);

impl Aaguid {
    /// The all-zero AAGUID, used by authenticators that do not disclose their model
    pub const ZERO: Aaguid = Aaguid(Some(Uuid::nil()));

    /// Sentinel for an authenticator model that is not known at all
    pub const NULL: Aaguid = Aaguid(None);

    #[must_use]
    pub const fn from_uuid(value: Uuid) -> Self {
        Aaguid(Some(value))
    }

    /// Build from exactly 16 raw bytes
    ///
    /// # Errors
    /// Returns `AaguidError::InvalidLength` for any other length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AaguidError> {
        let raw: [u8; 16] = bytes
            .try_into()
            .map_err(|_| AaguidError::InvalidLength(bytes.len()))?;
        Ok(Aaguid(Some(Uuid::from_bytes(raw))))
    }

    /// The underlying UUID, `None` for [`Aaguid::NULL`]
    #[must_use]
    pub const fn value(&self) -> Option<Uuid> {
        self.0
    }

    /// Raw big-endian bytes, `None` for [`Aaguid::NULL`]
    #[must_use]
    pub fn as_bytes(&self) -> Option<[u8; 16]> {
        self.0.map(Uuid::into_bytes)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Uuid> for Aaguid {
    fn from(value: Uuid) -> Self {
        Aaguid::from_uuid(value)
    }
}

impl FromStr for Aaguid {
    type Err = AaguidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Aaguid(Some(Uuid::parse_str(s)?)))
    }
}

impl fmt::Display for Aaguid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value.hyphenated()),
            None => f.write_str("null"),
        }
    }
}

impl Serialize for Aaguid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(value) => serializer.collect_str(&value.hyphenated()),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Aaguid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        match text {
            Some(text) => text.parse().map_err(serde::de::Error::custom),
            None => Ok(Aaguid::NULL),
        }
    }
}
