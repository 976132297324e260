//! AMTA header parsing and validation

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use super::{HEADER_SIZE, MAGIC, MAX_INFLATED_SIZE};
use crate::error::FormatError;

/// Validated AMTA header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmtaHeader {
    /// Size of the payload once the body is inflated.
    pub inflated_size: u32,
}

impl AmtaHeader {
    /// Create a header declaring `inflated_size` bytes.
    #[must_use]
    pub fn new(inflated_size: u32) -> Self {
        Self { inflated_size }
    }

    /// Serialize the header to its 8-byte on-disk form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..4].copy_from_slice(&MAGIC);
        LittleEndian::write_u32(&mut bytes[4..], self.inflated_size);
        bytes
    }

    /// Write the header to a stream.
    ///
    /// # Errors
    /// Returns an error if the underlying writer fails.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&MAGIC)?;
        writer.write_u32::<LittleEndian>(self.inflated_size)
    }
}

/// Parse an AMTA header using the default size ceiling.
///
/// Returns the header and the (still obfuscated) body that follows it. The
/// body is not length-checked; an empty body fails later, at decompression.
///
/// # Errors
///
/// Returns [`FormatError::Truncated`] if `raw` is shorter than 8 bytes,
/// [`FormatError::BadMagic`] if it does not start with `amta`,
/// [`FormatError::EmptyDeclaredSize`] or [`FormatError::DeclaredSizeTooLarge`]
/// if the declared inflated size is out of bounds.
pub fn parse(raw: &[u8]) -> Result<(AmtaHeader, &[u8]), FormatError> {
    parse_with_limit(raw, MAX_INFLATED_SIZE)
}

/// Parse an AMTA header, rejecting declared sizes `>= max_inflated_size`.
///
/// # Errors
/// See [`parse`].
pub fn parse_with_limit(
    raw: &[u8],
    max_inflated_size: u32,
) -> Result<(AmtaHeader, &[u8]), FormatError> {
    if raw.len() < HEADER_SIZE {
        return Err(FormatError::Truncated { len: raw.len() });
    }

    let (header, body) = raw.split_at(HEADER_SIZE);

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&header[..4]);
    if magic != MAGIC {
        return Err(FormatError::BadMagic(magic));
    }

    let inflated_size = LittleEndian::read_u32(&header[4..]);
    if inflated_size == 0 {
        return Err(FormatError::EmptyDeclaredSize);
    }
    if inflated_size >= max_inflated_size {
        return Err(FormatError::DeclaredSizeTooLarge {
            size: inflated_size,
            limit: max_inflated_size,
        });
    }

    Ok((AmtaHeader { inflated_size }, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(magic: &[u8; 4], size: u32, body: &[u8]) -> Vec<u8> {
        let mut raw = magic.to_vec();
        raw.extend_from_slice(&size.to_le_bytes());
        raw.extend_from_slice(body);
        raw
    }

    #[test]
    fn test_parse_valid() {
        let raw = container(b"amta", 1234, &[1, 2, 3]);
        let (header, body) = parse(&raw).unwrap();
        assert_eq!(header.inflated_size, 1234);
        assert_eq!(body, &[1, 2, 3]);
    }

    #[test]
    fn test_bad_magic_regardless_of_trailing_bytes() {
        for magic in [b"AMTA", b"RIFF", b"amt\0", b"\0\0\0\0"] {
            for size in [0, 1, 0xFFFF_FFFF] {
                let raw = container(magic, size, &[0xAA; 16]);
                assert_eq!(parse(&raw), Err(FormatError::BadMagic(*magic)));
            }
        }
    }

    #[test]
    fn test_truncated() {
        for len in 0..HEADER_SIZE {
            let raw = &b"amta\x10\0\0\0"[..len];
            assert_eq!(parse(raw), Err(FormatError::Truncated { len }));
        }
    }

    #[test]
    fn test_size_bounds() {
        let empty = container(b"amta", 0, &[0; 8]);
        assert_eq!(parse(&empty), Err(FormatError::EmptyDeclaredSize));

        let max = container(b"amta", 104_857_600, &[0; 8]);
        assert_eq!(parse(&max).unwrap().0.inflated_size, 104_857_600);

        for size in [104_857_601, 104_857_602, 0xFFFF_FFFF] {
            let raw = container(b"amta", size, &[0; 8]);
            assert_eq!(
                parse(&raw),
                Err(FormatError::DeclaredSizeTooLarge {
                    size,
                    limit: MAX_INFLATED_SIZE
                })
            );
        }
    }

    #[test]
    fn test_custom_limit() {
        let raw = container(b"amta", 4096, &[]);
        assert!(parse_with_limit(&raw, 4097).is_ok());
        assert_eq!(
            parse_with_limit(&raw, 4096),
            Err(FormatError::DeclaredSizeTooLarge {
                size: 4096,
                limit: 4096
            })
        );
    }

    #[test]
    fn test_empty_body_passes_through() {
        let raw = container(b"amta", 1, &[]);
        let (_, body) = parse(&raw).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = container(b"amta", 77, &[9, 8, 7, 6]);
        let first = parse(&raw);
        let second = parse(&raw);
        assert_eq!(first, second);
        assert_eq!(raw, container(b"amta", 77, &[9, 8, 7, 6]));
    }

    #[test]
    fn test_header_bytes() {
        let header = AmtaHeader::new(0x0102_0304);
        assert_eq!(header.to_bytes(), *b"amta\x04\x03\x02\x01");

        let mut written = Vec::new();
        header.write(&mut written).unwrap();
        assert_eq!(written, header.to_bytes());
    }
}
