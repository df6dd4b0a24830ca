//! Authenticator data
//!
//! Binary layout:
//! - 32 bytes: RP ID hash
//! - 1 byte: flags
//! - 4 bytes: signature counter (big-endian)
//! - attested credential data (if flag AT is set)
//!   - 16 bytes: AAGUID
//!   - 2 bytes: credential ID length (L), then L bytes credential ID
//!   - one CBOR item: COSE public key
//! - one CBOR item: extensions map (if flag ED is set)

use sha2::{Digest, Sha256};

use super::aaguid::Aaguid;
use super::errors::EncodingError;
use super::tpm::{read_sized_field, write_sized_field};

/// User present
pub const FLAG_UP: u8 = 0x01;
/// User verified
pub const FLAG_UV: u8 = 0x04;
/// Attested credential data included
pub const FLAG_AT: u8 = 0x40;
/// Extension data included
pub const FLAG_ED: u8 = 0x80;

const HEADER_LEN: usize = 37;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttestedCredentialData {
    pub aaguid: Aaguid,
    pub credential_id: Vec<u8>,
    /// COSE-encoded public key, kept as raw CBOR
    pub credential_public_key: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatorData {
    pub rp_id_hash: [u8; 32],
    pub flags: u8,
    pub sign_count: u32,
    pub attested_credential_data: Option<AttestedCredentialData>,
    /// Authenticator extension outputs, kept as raw CBOR
    pub extensions: Option<Vec<u8>>,
}

impl AuthenticatorData {
    /// Build authenticator data, setting the AT and ED flags from the parts present
    #[must_use]
    pub fn new(
        rp_id: &str,
        flags: u8,
        sign_count: u32,
        attested_credential_data: Option<AttestedCredentialData>,
        extensions: Option<Vec<u8>>,
    ) -> Self {
        let mut data = Self {
            rp_id_hash: rp_id_hash(rp_id),
            flags,
            sign_count,
            attested_credential_data,
            extensions,
        };
        data.flags = data.effective_flags();
        data
    }

    #[must_use]
    pub fn is_user_present(&self) -> bool {
        self.flags & FLAG_UP != 0
    }

    #[must_use]
    pub fn is_user_verified(&self) -> bool {
        self.flags & FLAG_UV != 0
    }

    fn effective_flags(&self) -> u8 {
        let mut flags = self.flags & !(FLAG_AT | FLAG_ED);
        if self.attested_credential_data.is_some() {
            flags |= FLAG_AT;
        }
        if self.extensions.is_some() {
            flags |= FLAG_ED;
        }
        flags
    }

    /// Serialize to the binary authenticator data layout
    ///
    /// The AT and ED flags always reflect which optional parts are present.
    ///
    /// # Errors
    /// Fails if the credential ID exceeds the 16-bit length limit, the AAGUID is
    /// [`Aaguid::NULL`], or the public key or extensions are not exactly one CBOR item.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        let mut out = Vec::with_capacity(HEADER_LEN);
        out.extend_from_slice(&self.rp_id_hash);
        out.push(self.effective_flags());
        out.extend_from_slice(&self.sign_count.to_be_bytes());

        if let Some(attested) = &self.attested_credential_data {
            let aaguid = attested.aaguid.as_bytes().ok_or(EncodingError::UnknownAaguid)?;
            out.extend_from_slice(&aaguid);
            write_sized_field(&mut out, &attested.credential_id)?;
            require_single_cbor_item(&attested.credential_public_key, "credential public key")?;
            out.extend_from_slice(&attested.credential_public_key);
        }
        if let Some(extensions) = &self.extensions {
            require_single_cbor_item(extensions, "extensions")?;
            out.extend_from_slice(extensions);
        }
        Ok(out)
    }

    /// Parse the binary authenticator data layout
    ///
    /// # Errors
    /// Returns `EncodingError::Malformed` for truncated input or trailing bytes and
    /// `EncodingError::Cbor` if an embedded CBOR item is invalid.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        if bytes.len() < HEADER_LEN {
            return Err(EncodingError::malformed("authenticator data too short"));
        }
        let (header, mut rest) = bytes.split_at(HEADER_LEN);

        let mut rp_id_hash = [0u8; 32];
        rp_id_hash.copy_from_slice(&header[..32]);
        let flags = header[32];
        let sign_count = u32::from_be_bytes([header[33], header[34], header[35], header[36]]);

        let attested_credential_data = if flags & FLAG_AT == 0 {
            None
        } else {
            if rest.len() < 16 {
                return Err(EncodingError::malformed("authenticator data too short for AAGUID"));
            }
            let (aaguid, tail) = rest.split_at(16);
            rest = tail;
            let aaguid = Aaguid::from_bytes(aaguid)
                .map_err(|e| EncodingError::malformed(e.to_string()))?;
            let credential_id = read_sized_field(&mut rest)?.to_vec();
            let credential_public_key = take_cbor_item(&mut rest)?.to_vec();
            Some(AttestedCredentialData {
                aaguid,
                credential_id,
                credential_public_key,
            })
        };

        let extensions = if flags & FLAG_ED == 0 {
            None
        } else {
            Some(take_cbor_item(&mut rest)?.to_vec())
        };

        if !rest.is_empty() {
            return Err(EncodingError::malformed(format!(
                "{} trailing bytes after authenticator data",
                rest.len()
            )));
        }

        Ok(Self {
            rp_id_hash,
            flags,
            sign_count,
            attested_credential_data,
            extensions,
        })
    }
}

/// SHA-256 of the relying party ID
#[must_use]
pub fn rp_id_hash(rp_id: &str) -> [u8; 32] {
    Sha256::digest(rp_id.as_bytes()).into()
}

/// Split one complete CBOR data item off the front of `input`
fn take_cbor_item<'a>(input: &mut &'a [u8]) -> Result<&'a [u8], EncodingError> {
    let start = *input;
    if start.is_empty() {
        return Err(EncodingError::malformed("expected a CBOR item"));
    }
    let _: ciborium::value::Value =
        ciborium::de::from_reader(&mut *input).map_err(EncodingError::cbor)?;
    let consumed = start.len() - input.len();
    Ok(&start[..consumed])
}

/// Reject `bytes` unless it holds exactly one CBOR data item
fn require_single_cbor_item(bytes: &[u8], what: &str) -> Result<(), EncodingError> {
    let mut rest = bytes;
    take_cbor_item(&mut rest)
        .map_err(|e| EncodingError::malformed(format!("{what} is not a CBOR item: {e}")))?;
    if !rest.is_empty() {
        return Err(EncodingError::malformed(format!(
            "{what} has {} bytes after its CBOR item",
            rest.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ciborium::value::Value;

    fn cose_key() -> Vec<u8> {
        let key = Value::Map(vec![
            (Value::Integer(1i64.into()), Value::Integer(2i64.into())),
            (Value::Integer(3i64.into()), Value::Integer((-7i64).into())),
            (Value::Integer((-2i64).into()), Value::Bytes(vec![0x11; 32])),
            (Value::Integer((-3i64).into()), Value::Bytes(vec![0x22; 32])),
        ]);
        let mut out = Vec::new();
        ciborium::ser::into_writer(&key, &mut out).unwrap();
        out
    }

    fn attested() -> AttestedCredentialData {
        AttestedCredentialData {
            aaguid: Aaguid::ZERO,
            credential_id: vec![0xC0; 20],
            credential_public_key: cose_key(),
        }
    }

    #[test]
    fn test_layout_with_attested_credential() {
        let data = AuthenticatorData::new("example.com", FLAG_UP, 7, Some(attested()), None);
        let bytes = data.to_bytes().unwrap();

        assert_eq!(&bytes[..32], &rp_id_hash("example.com"));
        assert_eq!(bytes[32], FLAG_UP | FLAG_AT);
        assert_eq!(&bytes[33..37], &[0, 0, 0, 7]);
        assert_eq!(&bytes[37..53], &[0u8; 16]);
        assert_eq!(&bytes[53..55], &[0, 20]);

        let parsed = AuthenticatorData::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_extensions_follow_public_key() {
        let mut extensions = Vec::new();
        ciborium::ser::into_writer(
            &Value::Map(vec![(Value::Text("credProtect".into()), Value::Integer(1i64.into()))]),
            &mut extensions,
        )
        .unwrap();
        let data = AuthenticatorData::new(
            "example.com",
            FLAG_UP | FLAG_UV,
            0,
            Some(attested()),
            Some(extensions.clone()),
        );
        assert!(data.is_user_verified());

        let parsed = AuthenticatorData::from_bytes(&data.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed.extensions, Some(extensions));
        assert_eq!(parsed.attested_credential_data.unwrap().credential_public_key, cose_key());
    }

    #[test]
    fn test_empty_public_key_is_rejected() {
        let mut credential = attested();
        credential.credential_public_key = Vec::new();
        let data = AuthenticatorData::new("example.com", FLAG_UP, 1, Some(credential), None);

        assert!(matches!(data.to_bytes(), Err(EncodingError::Malformed(_))));
    }

    #[test]
    fn test_public_key_with_trailing_bytes_is_rejected() {
        let mut credential = attested();
        credential.credential_public_key.push(0x00);
        let data = AuthenticatorData::new("example.com", FLAG_UP, 1, Some(credential), None);

        let err = data.to_bytes().unwrap_err();
        assert!(err.to_string().contains("after its CBOR item"));
    }

    #[test]
    fn test_empty_extensions_are_rejected() {
        let data = AuthenticatorData::new("example.com", FLAG_UP, 1, None, Some(Vec::new()));
        assert!(matches!(data.to_bytes(), Err(EncodingError::Malformed(_))));
    }

    #[test]
    fn test_assertion_data_has_no_attested_credential() {
        let data = AuthenticatorData::new("example.com", FLAG_UP | FLAG_AT, 1, None, None);
        assert_eq!(data.flags, FLAG_UP);
        assert_eq!(data.to_bytes().unwrap().len(), 37);
    }

    #[test]
    fn test_null_aaguid_cannot_be_encoded() {
        let mut credential = attested();
        credential.aaguid = Aaguid::NULL;
        let data = AuthenticatorData::new("example.com", FLAG_UP, 0, Some(credential), None);
        assert!(matches!(data.to_bytes(), Err(EncodingError::UnknownAaguid)));
    }

    #[test]
    fn test_rejects_truncated_and_trailing_input() {
        assert!(AuthenticatorData::from_bytes(&[0u8; 36]).is_err());

        let data = AuthenticatorData::new("example.com", FLAG_UP, 0, Some(attested()), None);
        let bytes = data.to_bytes().unwrap();
        assert!(AuthenticatorData::from_bytes(&bytes[..bytes.len() - 1]).is_err());

        let mut trailing = bytes;
        trailing.push(0);
        assert!(AuthenticatorData::from_bytes(&trailing).is_err());
    }
}
