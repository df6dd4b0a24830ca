//! Attestation objects and statements
//!
//! An attestation object pairs authenticator data with a format-specific
//! attestation statement. Statements are carried opaquely; the client only ever
//! replaces one wholesale with [`AttestationStatement::None`].

use super::authenticator_data::AuthenticatorData;

/// COSE algorithm identifier (-7 for ES256, -257 for RS256)
pub type CoseAlgorithm = i64;

/// DER certificate chain, leaf first
pub type CertificateChain = Vec<Vec<u8>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedAttestationStatement {
    pub alg: CoseAlgorithm,
    pub sig: Vec<u8>,
    /// Absent for self attestation
    pub x5c: Option<CertificateChain>,
    pub ecdaa_key_id: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TpmAttestationStatement {
    /// TPM specification version, always "2.0" in practice
    pub ver: String,
    pub alg: CoseAlgorithm,
    pub x5c: CertificateChain,
    pub sig: Vec<u8>,
    /// Marshaled `TPMS_ATTEST`
    pub cert_info: Vec<u8>,
    /// Marshaled `TPMT_PUBLIC`
    pub pub_area: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AndroidKeyAttestationStatement {
    pub alg: CoseAlgorithm,
    pub sig: Vec<u8>,
    pub x5c: CertificateChain,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AndroidSafetynetAttestationStatement {
    /// Google Play Services version
    pub ver: String,
    /// JWS compact serialization, UTF-8 bytes
    pub response: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FidoU2fAttestationStatement {
    pub sig: Vec<u8>,
    pub x5c: CertificateChain,
}

/// Closed set of attestation statement formats
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttestationStatement {
    None,
    Packed(PackedAttestationStatement),
    Tpm(TpmAttestationStatement),
    AndroidKey(AndroidKeyAttestationStatement),
    AndroidSafetynet(AndroidSafetynetAttestationStatement),
    FidoU2f(FidoU2fAttestationStatement),
}

impl AttestationStatement {
    /// Attestation statement format identifier (`fmt`)
    #[must_use]
    pub fn format(&self) -> &'static str {
        match self {
            AttestationStatement::None => "none",
            AttestationStatement::Packed(_) => "packed",
            AttestationStatement::Tpm(_) => "tpm",
            AttestationStatement::AndroidKey(_) => "android-key",
            AttestationStatement::AndroidSafetynet(_) => "android-safetynet",
            AttestationStatement::FidoU2f(_) => "fido-u2f",
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, AttestationStatement::None)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttestationObject {
    pub authenticator_data: AuthenticatorData,
    pub attestation_statement: AttestationStatement,
}

impl AttestationObject {
    #[must_use]
    pub fn new(
        authenticator_data: AuthenticatorData,
        attestation_statement: AttestationStatement,
    ) -> Self {
        Self {
            authenticator_data,
            attestation_statement,
        }
    }

    /// Format identifier of the carried statement
    #[must_use]
    pub fn format(&self) -> &'static str {
        self.attestation_statement.format()
    }

    /// Same authenticator data with a different statement
    #[must_use]
    pub fn with_statement(self, attestation_statement: AttestationStatement) -> Self {
        Self {
            authenticator_data: self.authenticator_data,
            attestation_statement,
        }
    }
}
