//! Length-prefixed field encoding
//!
//! TPM structures (`TPM2B_*`) and the attested credential data both carry
//! variable-length byte fields preceded by a big-endian `u16` size.

use std::io::Write;

use super::errors::EncodingError;

/// Write `value` to `sink` as a 2-byte big-endian length followed by the raw bytes.
///
/// Fails before writing anything if `value` is longer than `u16::MAX`. The sink is
/// not buffered: if it fails part way the output is left partially written and the
/// caller must discard it.
///
/// # Errors
/// Returns `EncodingError::FieldTooLarge` for oversized input and
/// `EncodingError::Io` if the sink fails.
pub fn write_sized_field<W: Write + ?Sized>(
    sink: &mut W,
    value: &[u8],
) -> Result<(), EncodingError> {
    let len = u16::try_from(value.len())
        .map_err(|_| EncodingError::FieldTooLarge { len: value.len() })?;
    sink.write_all(&len.to_be_bytes())?;
    sink.write_all(value)?;
    Ok(())
}

/// Read one field written by [`write_sized_field`], advancing `input` past it.
///
/// # Errors
/// Returns `EncodingError::Malformed` if the input is shorter than the declared size.
pub fn read_sized_field<'a>(input: &mut &'a [u8]) -> Result<&'a [u8], EncodingError> {
    let Some((prefix, rest)) = input.split_first_chunk::<2>() else {
        return Err(EncodingError::malformed("missing length prefix"));
    };
    let len = usize::from(u16::from_be_bytes(*prefix));
    if rest.len() < len {
        return Err(EncodingError::malformed(format!(
            "field declares {len} bytes but only {} remain",
            rest.len()
        )));
    }
    let (field, rest) = rest.split_at(len);
    *input = rest;
    Ok(field)
}

/// `TPM_GENERATED_VALUE`
pub const TPM_GENERATED_VALUE: u32 = 0xff54_4347;
/// `TPM_ST_ATTEST_CERTIFY`
pub const TPM_ST_ATTEST_CERTIFY: u16 = 0x8017;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TpmsClockInfo {
    pub clock: u64,
    pub reset_count: u32,
    pub restart_count: u32,
    pub safe: bool,
}

/// `TPMS_ATTEST` for a certify operation, the structure carried in a TPM
/// attestation statement's `certInfo`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TpmsAttest {
    pub qualified_signer: Vec<u8>,
    /// Hash of authenticator data and client data hash
    pub extra_data: Vec<u8>,
    pub clock_info: TpmsClockInfo,
    pub firmware_version: u64,
    /// Name of the certified key (hash algorithm id followed by the digest of `pubArea`)
    pub certified_name: Vec<u8>,
    pub certified_qualified_name: Vec<u8>,
}

impl TpmsAttest {
    /// Marshal into TPM wire format
    ///
    /// # Errors
    /// Returns `EncodingError::FieldTooLarge` if any sized field exceeds `u16::MAX` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        let mut out = Vec::new();
        out.extend_from_slice(&TPM_GENERATED_VALUE.to_be_bytes());
        out.extend_from_slice(&TPM_ST_ATTEST_CERTIFY.to_be_bytes());
        write_sized_field(&mut out, &self.qualified_signer)?;
        write_sized_field(&mut out, &self.extra_data)?;
        out.extend_from_slice(&self.clock_info.clock.to_be_bytes());
        out.extend_from_slice(&self.clock_info.reset_count.to_be_bytes());
        out.extend_from_slice(&self.clock_info.restart_count.to_be_bytes());
        out.push(u8::from(self.clock_info.safe));
        out.extend_from_slice(&self.firmware_version.to_be_bytes());
        write_sized_field(&mut out, &self.certified_name)?;
        write_sized_field(&mut out, &self.certified_qualified_name)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that accepts a fixed number of bytes and then fails
    struct LimitedSink {
        written: Vec<u8>,
        capacity: usize,
    }

    impl Write for LimitedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let room = self.capacity - self.written.len();
            if room == 0 {
                return Err(std::io::Error::other("sink full"));
            }
            let n = room.min(buf.len());
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_big_endian_prefix() {
        let mut sink = Vec::new();
        write_sized_field(&mut sink, &[0xAA; 0x0102]).unwrap();

        assert_eq!(sink.len(), 2 + 0x0102);
        assert_eq!(&sink[..2], &[0x01, 0x02]);
        assert!(sink[2..].iter().all(|b| *b == 0xAA));
    }

    #[test]
    fn test_empty_field() {
        let mut sink = Vec::new();
        write_sized_field(&mut sink, &[]).unwrap();
        assert_eq!(sink, vec![0, 0]);
    }

    #[test]
    fn test_maximum_length_is_accepted() {
        let value = vec![7u8; usize::from(u16::MAX)];
        let mut sink = Vec::new();
        write_sized_field(&mut sink, &value).unwrap();

        assert_eq!(sink.len(), 2 + value.len());
        assert_eq!(u16::from_be_bytes([sink[0], sink[1]]), u16::MAX);
    }

    #[test]
    fn test_oversized_field_writes_nothing() {
        let value = vec![0u8; usize::from(u16::MAX) + 1];
        let mut sink = Vec::new();
        let err = write_sized_field(&mut sink, &value).unwrap_err();

        assert!(matches!(err, EncodingError::FieldTooLarge { len } if len == 65536));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_failing_sink_reports_io_error() {
        let mut sink = LimitedSink {
            written: Vec::new(),
            capacity: 3,
        };
        let err = write_sized_field(&mut sink, b"hello").unwrap_err();

        assert!(matches!(err, EncodingError::Io(_)));
        assert_eq!(sink.written, vec![0, 5, b'h']);
    }

    #[test]
    fn test_read_back_advances_input() {
        let mut buf = Vec::new();
        write_sized_field(&mut buf, b"credential").unwrap();
        buf.extend_from_slice(b"tail");

        let mut input = buf.as_slice();
        assert_eq!(read_sized_field(&mut input).unwrap(), b"credential");
        assert_eq!(input, b"tail");
    }

    #[test]
    fn test_tpms_attest_layout() {
        let attest = TpmsAttest {
            qualified_signer: vec![0x00, 0x0b],
            extra_data: vec![0xEE; 32],
            clock_info: TpmsClockInfo {
                clock: 1,
                reset_count: 2,
                restart_count: 3,
                safe: true,
            },
            firmware_version: 4,
            certified_name: vec![0x00, 0x0b, 0xAB],
            certified_qualified_name: Vec::new(),
        };
        let bytes = attest.to_bytes().unwrap();

        assert_eq!(&bytes[..4], &[0xff, 0x54, 0x43, 0x47]);
        assert_eq!(&bytes[4..6], &[0x80, 0x17]);

        let mut rest = &bytes[6..];
        assert_eq!(read_sized_field(&mut rest).unwrap(), &[0x00, 0x0b]);
        assert_eq!(read_sized_field(&mut rest).unwrap(), &[0xEE; 32]);
        // clock (8) + resetCount (4) + restartCount (4) + safe (1) + firmwareVersion (8)
        assert_eq!(rest[16], 1);
        let mut rest = &rest[25..];
        assert_eq!(read_sized_field(&mut rest).unwrap(), &[0x00, 0x0b, 0xAB]);
        assert_eq!(read_sized_field(&mut rest).unwrap(), &[] as &[u8]);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_tpms_attest_rejects_oversized_extra_data() {
        let attest = TpmsAttest {
            extra_data: vec![0; 70_000],
            ..TpmsAttest::default()
        };
        assert!(matches!(
            attest.to_bytes(),
            Err(EncodingError::FieldTooLarge { len: 70_000 })
        ));
    }

    #[test]
    fn test_read_truncated_field() {
        let mut input: &[u8] = &[0x00, 0x10, 0x01];
        assert!(read_sized_field(&mut input).is_err());

        let mut input: &[u8] = &[0x00];
        assert!(read_sized_field(&mut input).is_err());
    }
}
