#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the vouchrs-ceremony library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod authenticator;
pub mod client;
pub mod settings;
pub mod utils;
pub mod webauthn;

// Stub authenticator and fixtures for unit and integration tests
#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use authenticator::{
    AuthenticationEmulationOptions, Authenticator, AuthenticatorError,
    RegistrationEmulationOptions,
};
pub use client::{AggregatedFailure, CeremonyError, ClientPlatform};
pub use settings::CeremonySettings;
pub use webauthn::{Aaguid, AttestationConveyancePreference, AttestationStatement, Origin};
