//! CBOR processing for `WebAuthn`
//!
//! This module encodes and decodes attestation objects: a CBOR map with the
//! text keys `fmt`, `attStmt` and `authData`.

use ciborium::value::Value;

use super::attestation::{
    AndroidKeyAttestationStatement, AndroidSafetynetAttestationStatement, AttestationObject,
    AttestationStatement, CertificateChain, FidoU2fAttestationStatement,
    PackedAttestationStatement, TpmAttestationStatement,
};
use super::authenticator_data::AuthenticatorData;
use super::errors::EncodingError;

/// Byte codec for [`AttestationObject`]
pub struct AttestationObjectCodec;

impl AttestationObjectCodec {
    /// Encode an attestation object
    ///
    /// # Errors
    /// Returns an `EncodingError` if the authenticator data cannot be serialized
    /// or CBOR output fails.
    pub fn encode(attestation_object: &AttestationObject) -> Result<Vec<u8>, EncodingError> {
        let statement = &attestation_object.attestation_statement;
        let value = Value::Map(vec![
            (text("fmt"), text(statement.format())),
            (text("attStmt"), statement_to_value(statement)),
            (
                text("authData"),
                Value::Bytes(attestation_object.authenticator_data.to_bytes()?),
            ),
        ]);

        let mut out = Vec::new();
        ciborium::ser::into_writer(&value, &mut out).map_err(EncodingError::cbor)?;
        Ok(out)
    }

    /// Decode an attestation object
    ///
    /// # Errors
    /// Returns an `EncodingError` if the bytes are not a well-formed attestation
    /// object or name a statement format this crate does not model.
    pub fn decode(bytes: &[u8]) -> Result<AttestationObject, EncodingError> {
        let value: Value = ciborium::de::from_reader(bytes).map_err(EncodingError::cbor)?;
        let Some(map) = value.as_map() else {
            return Err(EncodingError::malformed("attestation object is not a map"));
        };

        let fmt = require_text(map, "fmt")?;
        let Some(att_stmt) = lookup(map, "attStmt").and_then(Value::as_map) else {
            return Err(EncodingError::malformed("missing attStmt in attestation object"));
        };
        let auth_data = require_bytes(map, "authData")?;

        Ok(AttestationObject {
            authenticator_data: AuthenticatorData::from_bytes(&auth_data)?,
            attestation_statement: statement_from_map(&fmt, att_stmt)?,
        })
    }
}

fn statement_to_value(statement: &AttestationStatement) -> Value {
    let mut entries = Vec::new();
    match statement {
        AttestationStatement::None => {}
        AttestationStatement::Packed(packed) => {
            entries.push((text("alg"), Value::Integer(packed.alg.into())));
            entries.push((text("sig"), Value::Bytes(packed.sig.clone())));
            if let Some(x5c) = &packed.x5c {
                entries.push((text("x5c"), chain_to_value(x5c)));
            }
            if let Some(key_id) = &packed.ecdaa_key_id {
                entries.push((text("ecdaaKeyId"), Value::Bytes(key_id.clone())));
            }
        }
        AttestationStatement::Tpm(tpm) => {
            entries.push((text("ver"), text(&tpm.ver)));
            entries.push((text("alg"), Value::Integer(tpm.alg.into())));
            entries.push((text("x5c"), chain_to_value(&tpm.x5c)));
            entries.push((text("sig"), Value::Bytes(tpm.sig.clone())));
            entries.push((text("certInfo"), Value::Bytes(tpm.cert_info.clone())));
            entries.push((text("pubArea"), Value::Bytes(tpm.pub_area.clone())));
        }
        AttestationStatement::AndroidKey(android_key) => {
            entries.push((text("alg"), Value::Integer(android_key.alg.into())));
            entries.push((text("sig"), Value::Bytes(android_key.sig.clone())));
            entries.push((text("x5c"), chain_to_value(&android_key.x5c)));
        }
        AttestationStatement::AndroidSafetynet(safetynet) => {
            entries.push((text("ver"), text(&safetynet.ver)));
            entries.push((text("response"), Value::Bytes(safetynet.response.clone())));
        }
        AttestationStatement::FidoU2f(u2f) => {
            entries.push((text("sig"), Value::Bytes(u2f.sig.clone())));
            entries.push((text("x5c"), chain_to_value(&u2f.x5c)));
        }
    }
    Value::Map(entries)
}

fn statement_from_map(
    fmt: &str,
    map: &[(Value, Value)],
) -> Result<AttestationStatement, EncodingError> {
    let statement = match fmt {
        "none" => {
            if !map.is_empty() {
                return Err(EncodingError::malformed("none attestation must be empty"));
            }
            AttestationStatement::None
        }
        "packed" => AttestationStatement::Packed(PackedAttestationStatement {
            alg: require_int(map, "alg")?,
            sig: require_bytes(map, "sig")?,
            x5c: optional_chain(map, "x5c")?,
            ecdaa_key_id: lookup(map, "ecdaaKeyId")
                .map(|v| as_bytes(v, "ecdaaKeyId"))
                .transpose()?,
        }),
        "tpm" => AttestationStatement::Tpm(TpmAttestationStatement {
            ver: require_text(map, "ver")?,
            alg: require_int(map, "alg")?,
            x5c: require_chain(map, "x5c")?,
            sig: require_bytes(map, "sig")?,
            cert_info: require_bytes(map, "certInfo")?,
            pub_area: require_bytes(map, "pubArea")?,
        }),
        "android-key" => AttestationStatement::AndroidKey(AndroidKeyAttestationStatement {
            alg: require_int(map, "alg")?,
            sig: require_bytes(map, "sig")?,
            x5c: require_chain(map, "x5c")?,
        }),
        "android-safetynet" => {
            AttestationStatement::AndroidSafetynet(AndroidSafetynetAttestationStatement {
                ver: require_text(map, "ver")?,
                response: require_bytes(map, "response")?,
            })
        }
        "fido-u2f" => AttestationStatement::FidoU2f(FidoU2fAttestationStatement {
            sig: require_bytes(map, "sig")?,
            x5c: require_chain(map, "x5c")?,
        }),
        other => return Err(EncodingError::UnknownFormat(other.to_string())),
    };
    Ok(statement)
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn chain_to_value(chain: &CertificateChain) -> Value {
    Value::Array(chain.iter().map(|cert| Value::Bytes(cert.clone())).collect())
}

fn lookup<'a>(map: &'a [(Value, Value)], key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.as_text() == Some(key))
        .map(|(_, v)| v)
}

fn require<'a>(map: &'a [(Value, Value)], key: &str) -> Result<&'a Value, EncodingError> {
    lookup(map, key).ok_or_else(|| EncodingError::malformed(format!("missing {key}")))
}

fn as_bytes(value: &Value, key: &str) -> Result<Vec<u8>, EncodingError> {
    value
        .as_bytes()
        .cloned()
        .ok_or_else(|| EncodingError::malformed(format!("{key} must be a byte string")))
}

fn require_bytes(map: &[(Value, Value)], key: &str) -> Result<Vec<u8>, EncodingError> {
    as_bytes(require(map, key)?, key)
}

fn require_text(map: &[(Value, Value)], key: &str) -> Result<String, EncodingError> {
    require(map, key)?
        .as_text()
        .map(ToString::to_string)
        .ok_or_else(|| EncodingError::malformed(format!("{key} must be a text string")))
}

fn require_int(map: &[(Value, Value)], key: &str) -> Result<i64, EncodingError> {
    let Some(integer) = require(map, key)?.as_integer() else {
        return Err(EncodingError::malformed(format!("{key} must be an integer")));
    };
    i64::try_from(integer).map_err(|_| EncodingError::malformed(format!("{key} out of range")))
}

fn require_chain(map: &[(Value, Value)], key: &str) -> Result<CertificateChain, EncodingError> {
    optional_chain(map, key)?.ok_or_else(|| EncodingError::malformed(format!("missing {key}")))
}

fn optional_chain(
    map: &[(Value, Value)],
    key: &str,
) -> Result<Option<CertificateChain>, EncodingError> {
    let Some(value) = lookup(map, key) else {
        return Ok(None);
    };
    let Some(items) = value.as_array() else {
        return Err(EncodingError::malformed(format!("{key} must be an array")));
    };
    items
        .iter()
        .map(|item| as_bytes(item, key))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webauthn::aaguid::Aaguid;
    use crate::webauthn::authenticator_data::{AttestedCredentialData, FLAG_UP};

    fn authenticator_data() -> AuthenticatorData {
        AuthenticatorData::new(
            "example.com",
            FLAG_UP,
            0,
            Some(AttestedCredentialData {
                aaguid: Aaguid::ZERO,
                credential_id: vec![1, 2, 3],
                credential_public_key: vec![0xa0], // empty CBOR map
            }),
            None,
        )
    }

    #[test]
    fn test_none_statement_encodes_empty_map() {
        let object = AttestationObject::new(authenticator_data(), AttestationStatement::None);
        let bytes = AttestationObjectCodec::encode(&object).unwrap();

        let value: Value = ciborium::de::from_reader(bytes.as_slice()).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(lookup(map, "fmt").and_then(Value::as_text), Some("none"));
        assert_eq!(lookup(map, "attStmt").and_then(Value::as_map).map(Vec::len), Some(0));

        assert_eq!(AttestationObjectCodec::decode(&bytes).unwrap(), object);
    }

    #[test]
    fn test_packed_self_attestation_omits_x5c() {
        let statement = AttestationStatement::Packed(PackedAttestationStatement {
            alg: -7,
            sig: vec![0x30, 0x44],
            x5c: None,
            ecdaa_key_id: None,
        });
        let value = statement_to_value(&statement);
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert!(lookup(map, "x5c").is_none());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let value = Value::Map(vec![
            (text("fmt"), text("apple")),
            (text("attStmt"), Value::Map(vec![])),
            (text("authData"), Value::Bytes(authenticator_data().to_bytes().unwrap())),
        ]);
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&value, &mut bytes).unwrap();

        assert!(matches!(
            AttestationObjectCodec::decode(&bytes),
            Err(EncodingError::UnknownFormat(fmt)) if fmt == "apple"
        ));
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let value = Value::Map(vec![
            (text("fmt"), text("fido-u2f")),
            (text("attStmt"), Value::Map(vec![(text("sig"), Value::Bytes(vec![1]))])),
            (text("authData"), Value::Bytes(authenticator_data().to_bytes().unwrap())),
        ]);
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&value, &mut bytes).unwrap();

        assert!(matches!(
            AttestationObjectCodec::decode(&bytes),
            Err(EncodingError::Malformed(_))
        ));
    }
}
