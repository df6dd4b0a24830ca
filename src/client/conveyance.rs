//! Attestation conveyance policy
//!
//! A conformant client strips attestation unless the relying party asked for it.
//! This is enforced here rather than trusted to the authenticator.

use crate::utils::logging::CeremonyLogger;
use crate::webauthn::{AttestationConveyancePreference, AttestationStatement};

use super::errors::CeremonyError;

/// Decide which attestation statement is returned to the relying party
///
/// * `Direct` - the statement passes through unchanged
/// * `None` or unset - the statement is replaced with the empty none statement
/// * `Indirect`, `Enterprise` or anything unrecognized - not implemented, since
///   these require an anonymization service or enterprise policy
///
/// # Errors
/// Returns `CeremonyError::NotImplemented` for preferences other than direct and none.
pub fn decide(
    preference: Option<&AttestationConveyancePreference>,
    statement: AttestationStatement,
) -> Result<AttestationStatement, CeremonyError> {
    match preference.unwrap_or(&AttestationConveyancePreference::None) {
        AttestationConveyancePreference::Direct => Ok(statement),
        AttestationConveyancePreference::None => {
            if !statement.is_none() {
                CeremonyLogger::log_attestation_downgrade(
                    statement.format(),
                    preference.map_or("unset", AttestationConveyancePreference::as_str),
                );
            }
            Ok(AttestationStatement::None)
        }
        unsupported @ (AttestationConveyancePreference::Indirect
        | AttestationConveyancePreference::Enterprise
        | AttestationConveyancePreference::Other(_)) => {
            CeremonyLogger::log_unsupported_conveyance(unsupported.as_str());
            Err(CeremonyError::NotImplemented(format!(
                "attestation conveyance preference {unsupported}"
            )))
        }
    }
}
