//! Client ceremony engine
//!
//! This module provides the client half of `WebAuthn`: building collected client
//! data, applying the attestation conveyance policy, negotiating client extensions
//! and assembling the credentials returned to the relying party.

pub mod conveyance;
mod errors;
mod extensions;
mod platform;

pub use errors::{AggregatedFailure, CeremonyError};
pub use extensions::{ExtensionHandler, ExtensionProcessor};
pub use platform::ClientPlatform;
