//! Test fixtures providing pre-built test objects
//!
//! Ceremony options and one attestation statement per supported format, so test
//! files do not rebuild the same values.

use ciborium::Value;

use crate::webauthn::tpm::{TpmsAttest, TpmsClockInfo};
use crate::webauthn::{
    AndroidKeyAttestationStatement, AndroidSafetynetAttestationStatement,
    AttestationConveyancePreference, AttestationStatement, Challenge, ClientExtensionInputs,
    FidoU2fAttestationStatement, Origin, PackedAttestationStatement,
    PublicKeyCredentialCreationOptions, PublicKeyCredentialDescriptor,
    PublicKeyCredentialParameters, PublicKeyCredentialRequestOptions, RelyingParty,
    TpmAttestationStatement, UserEntity,
};

use super::constants::{
    ALG_ES256, ALG_RS256, TEST_CERTIFICATE, TEST_CHALLENGE, TEST_CREDENTIAL_ID, TEST_RP_ID,
    TEST_RP_NAME, TEST_SIGNATURE, TEST_USER_DISPLAY_NAME, TEST_USER_HANDLE, TEST_USER_NAME,
};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// `https://example.com`
    #[must_use]
    pub fn origin() -> Origin {
        Origin::default()
    }

    #[must_use]
    pub fn challenge() -> Challenge {
        Challenge::new(TEST_CHALLENGE)
    }

    #[must_use]
    pub fn relying_party() -> RelyingParty {
        RelyingParty {
            id: TEST_RP_ID.to_string(),
            name: TEST_RP_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn user() -> UserEntity {
        UserEntity {
            id: TEST_USER_HANDLE.to_vec(),
            name: TEST_USER_NAME.to_string(),
            display_name: TEST_USER_DISPLAY_NAME.to_string(),
        }
    }

    /// Creation options with no conveyance preference and no extensions
    #[must_use]
    pub fn creation_options() -> PublicKeyCredentialCreationOptions {
        PublicKeyCredentialCreationOptions {
            rp: Self::relying_party(),
            user: Self::user(),
            challenge: Self::challenge(),
            pub_key_cred_params: vec![
                PublicKeyCredentialParameters::public_key(ALG_ES256),
                PublicKeyCredentialParameters::public_key(ALG_RS256),
            ],
            timeout: Some(60_000),
            exclude_credentials: Vec::new(),
            authenticator_selection: None,
            attestation: None,
            extensions: None,
        }
    }

    /// Creation options requesting the given conveyance
    #[must_use]
    pub fn creation_options_with_conveyance(
        preference: AttestationConveyancePreference,
    ) -> PublicKeyCredentialCreationOptions {
        let mut options = Self::creation_options();
        options.attestation = Some(preference);
        options
    }

    /// Creation options requesting the supported-extensions extension
    #[must_use]
    pub fn creation_options_with_extensions() -> PublicKeyCredentialCreationOptions {
        let mut options = Self::creation_options();
        options.extensions = Some(ClientExtensionInputs::new().with_supported_extensions(true));
        options
    }

    /// Request options allowing the stub authenticator's credential
    #[must_use]
    pub fn request_options() -> PublicKeyCredentialRequestOptions {
        PublicKeyCredentialRequestOptions {
            challenge: Self::challenge(),
            timeout: Some(60_000),
            rp_id: Some(TEST_RP_ID.to_string()),
            allow_credentials: vec![Self::credential_descriptor(TEST_CREDENTIAL_ID)],
            user_verification: Some("preferred".to_string()),
            extensions: None,
        }
    }

    #[must_use]
    pub fn credential_descriptor(id: &[u8]) -> PublicKeyCredentialDescriptor {
        PublicKeyCredentialDescriptor {
            r#type: "public-key".to_string(),
            id: id.to_vec(),
            transports: Some(vec!["internal".to_string()]),
        }
    }

    /// COSE EC2 P-256 public key with placeholder coordinates
    ///
    /// # Panics
    ///
    /// Panics if CBOR serialization into memory fails.
    #[must_use]
    pub fn cose_public_key() -> Vec<u8> {
        let key = Value::Map(vec![
            (Value::Integer(1i64.into()), Value::Integer(2i64.into())),
            (Value::Integer(3i64.into()), Value::Integer(ALG_ES256.into())),
            (Value::Integer((-1i64).into()), Value::Integer(1i64.into())),
            (Value::Integer((-2i64).into()), Value::Bytes(vec![0x11; 32])),
            (Value::Integer((-3i64).into()), Value::Bytes(vec![0x22; 32])),
        ]);
        let mut out = Vec::new();
        ciborium::into_writer(&key, &mut out).expect("in-memory CBOR write cannot fail");
        out
    }

    #[must_use]
    pub fn packed_statement() -> AttestationStatement {
        AttestationStatement::Packed(PackedAttestationStatement {
            alg: ALG_ES256,
            sig: TEST_SIGNATURE.to_vec(),
            x5c: Some(vec![TEST_CERTIFICATE.to_vec()]),
            ecdaa_key_id: None,
        })
    }

    /// Packed statement without a certificate chain
    #[must_use]
    pub fn self_attestation_statement() -> AttestationStatement {
        AttestationStatement::Packed(PackedAttestationStatement {
            alg: ALG_ES256,
            sig: TEST_SIGNATURE.to_vec(),
            x5c: None,
            ecdaa_key_id: None,
        })
    }

    /// TPM statement whose `certInfo` is a marshaled `TPMS_ATTEST`
    ///
    /// # Panics
    ///
    /// Panics if the fixed `TPMS_ATTEST` fields exceed their size bound.
    #[must_use]
    pub fn tpm_statement() -> AttestationStatement {
        // nameAlg SHA-256 followed by the digest of pubArea
        let mut certified_name = vec![0x00, 0x0b];
        certified_name.extend_from_slice(&[0x33; 32]);

        let cert_info = TpmsAttest {
            qualified_signer: vec![0x00, 0x0b, 0xaa, 0xbb],
            extra_data: vec![0x5a; 32],
            clock_info: TpmsClockInfo {
                clock: 1_000,
                reset_count: 1,
                restart_count: 0,
                safe: true,
            },
            firmware_version: 0x0001_0002_0003_0004,
            certified_name,
            certified_qualified_name: vec![0x00, 0x0b, 0xcc],
        }
        .to_bytes()
        .expect("fixture fields are small");

        AttestationStatement::Tpm(TpmAttestationStatement {
            ver: "2.0".to_string(),
            alg: ALG_RS256,
            x5c: vec![TEST_CERTIFICATE.to_vec()],
            sig: TEST_SIGNATURE.to_vec(),
            cert_info,
            pub_area: vec![0x00, 0x23, 0x00, 0x0b],
        })
    }

    #[must_use]
    pub fn android_key_statement() -> AttestationStatement {
        AttestationStatement::AndroidKey(AndroidKeyAttestationStatement {
            alg: ALG_ES256,
            sig: TEST_SIGNATURE.to_vec(),
            x5c: vec![TEST_CERTIFICATE.to_vec(), TEST_CERTIFICATE.to_vec()],
        })
    }

    #[must_use]
    pub fn android_safetynet_statement() -> AttestationStatement {
        AttestationStatement::AndroidSafetynet(AndroidSafetynetAttestationStatement {
            ver: "12345".to_string(),
            response: b"eyJhbGciOiJSUzI1NiJ9.eyJub25jZSI6IiJ9.c2ln".to_vec(),
        })
    }

    #[must_use]
    pub fn fido_u2f_statement() -> AttestationStatement {
        AttestationStatement::FidoU2f(FidoU2fAttestationStatement {
            sig: TEST_SIGNATURE.to_vec(),
            x5c: vec![TEST_CERTIFICATE.to_vec()],
        })
    }

    /// One statement per supported format, `none` first
    #[must_use]
    pub fn all_statements() -> Vec<AttestationStatement> {
        vec![
            AttestationStatement::None,
            Self::packed_statement(),
            Self::self_attestation_statement(),
            Self::tpm_statement(),
            Self::android_key_statement(),
            Self::android_safetynet_statement(),
            Self::fido_u2f_statement(),
        ]
    }
}
