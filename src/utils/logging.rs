// Centralized logging for ceremony milestones
use log::{debug, info, warn};

use crate::webauthn::{base64url, CollectedClientData, Origin};

pub struct CeremonyLogger;

impl CeremonyLogger {
    /// Log client data construction
    pub fn log_client_data_built(client_data: &CollectedClientData) {
        debug!(
            "Built {} client data for origin {} (token binding: {})",
            client_data.r#type.as_str(),
            client_data.origin,
            if client_data.token_binding.is_some() { "present" } else { "absent" }
        );
    }

    /// Log that a caller-supplied client data replaced the built one
    pub fn log_client_data_override() {
        debug!("Using overridden collected client data for registration");
    }

    /// Log the start of a ceremony against the bound authenticator
    pub fn log_ceremony_start(ceremony: &str, authenticator: &str, origin: &Origin) {
        debug!("Starting {ceremony} ceremony with {authenticator} for {origin}");
    }

    /// Log an attempt to run a ceremony without an authenticator
    pub fn log_unbound_authenticator(ceremony: &str) {
        warn!("Cannot run {ceremony} ceremony: no authenticator is bound");
    }

    /// Log a statement replaced by the none statement
    pub fn log_attestation_downgrade(format: &str, preference: &str) {
        warn!("Replacing {format} attestation statement with none (conveyance: {preference})");
    }

    /// Log a conveyance preference the client declines to honor
    pub fn log_unsupported_conveyance(preference: &str) {
        warn!("Attestation conveyance preference {preference} is not implemented");
    }

    /// Log an authenticator failure
    pub fn log_authenticator_failure(ceremony: &str, error: &dyn std::fmt::Display) {
        warn!("Authenticator failed during {ceremony} ceremony: {error}");
    }

    /// Log negotiated extensions
    pub fn log_extensions_negotiated(phase: &str, requested: usize, honored: usize) {
        debug!("Negotiated {phase} extensions: {requested} requested, {honored} honored");
    }

    /// Log a completed registration
    pub fn log_registration_complete(credential_id: &[u8], format: &str) {
        info!(
            "Registration ceremony completed: credential {} ({format} attestation)",
            base64url::encode(credential_id)
        );
    }

    /// Log a completed assertion
    pub fn log_assertion_complete(credential_id: &[u8]) {
        info!(
            "Authentication ceremony completed: credential {}",
            base64url::encode(credential_id)
        );
    }
}
