//! `WebAuthn` data model
//!
//! This module provides the `WebAuthn` structures exchanged during a ceremony,
//! independent of any client or authenticator behavior, together with their
//! byte encodings: client data JSON, authenticator data, CBOR attestation objects
//! and TPM-style length-prefixed fields.

mod aaguid;
mod attestation;
pub mod authenticator_data;
pub mod base64url;
mod cbor;
mod client_data;
mod errors;
mod extensions;
mod origin;
pub mod tpm;
mod types;

// Re-exports for public use
pub use aaguid::Aaguid;
pub use attestation::*;
pub use authenticator_data::{AttestedCredentialData, AuthenticatorData};
pub use cbor::AttestationObjectCodec;
pub use client_data::{
    Challenge, ClientDataType, CollectedClientData, CollectedClientDataCodec, TokenBinding,
    TokenBindingStatus,
};
pub use errors::{AaguidError, EncodingError, OriginError};
pub use extensions::*;
pub use origin::Origin;
pub use tpm::write_sized_field;
pub use types::*;
