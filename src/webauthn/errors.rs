//! `WebAuthn` data errors
//!
//! This module defines the error types raised while building, encoding and
//! decoding `WebAuthn` data structures.

use thiserror::Error;

/// Errors raised while converting `WebAuthn` structures to or from bytes
#[derive(Debug, Error)]
pub enum EncodingError {
    /// A length-prefixed field does not fit in an unsigned 16-bit length
    #[error("field of {len} bytes exceeds the {max} byte limit", max = u16::MAX)]
    FieldTooLarge { len: usize },

    /// The sink rejected a write; the output may be partially written
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    /// CBOR serialization or parsing failed
    #[error("CBOR error: {0}")]
    Cbor(String),

    /// JSON serialization or parsing failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structurally invalid input
    #[error("malformed data: {0}")]
    Malformed(String),

    /// Attestation statement format this crate does not model
    #[error("unknown attestation statement format: {0}")]
    UnknownFormat(String),

    /// The AAGUID is the "model unknown" sentinel and has no byte form
    #[error("AAGUID is unknown and cannot be encoded")]
    UnknownAaguid,
}

impl EncodingError {
    pub(crate) fn cbor(err: impl std::fmt::Display) -> Self {
        EncodingError::Cbor(err.to_string())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        EncodingError::Malformed(msg.into())
    }
}

/// Errors raised while parsing an origin
#[derive(Debug, Error)]
pub enum OriginError {
    #[error("invalid origin URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("origin has no host: {0}")]
    Opaque(String),
}

/// Errors raised while constructing an AAGUID
#[derive(Debug, Error)]
pub enum AaguidError {
    #[error("AAGUID must be 16 bytes, got {0}")]
    InvalidLength(usize),

    #[error("invalid AAGUID text: {0}")]
    InvalidText(#[from] uuid::Error),
}
