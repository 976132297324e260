//! AMTA decode pipeline: header, diffusion, decompression

use serde::Serialize;

use super::header::{AmtaHeader, parse_with_limit};
use super::{HEADER_SIZE, MAX_INFLATED_SIZE, diffusion};
use crate::compression::{Decompressor, LzoDecompressor, lzo};
use crate::error::{DecodeError, FormatError, Result};

/// Decodes AMTA containers into their inflated payload.
///
/// Holds no per-container state, so a single decoder can be shared across
/// threads and reused for any number of inputs.
///
/// # Example
///
/// ```
/// use amta::formats::amta::{AmtaDecoder, encode_container};
///
/// let container = encode_container(b"hello hello hello hello")?;
/// let payload = AmtaDecoder::new().decode(&container)?;
/// assert_eq!(payload, b"hello hello hello hello");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct AmtaDecoder<D = LzoDecompressor> {
    decompressor: D,
    max_inflated_size: u32,
}

impl AmtaDecoder<LzoDecompressor> {
    /// Create a decoder backed by [`LzoDecompressor`] with the default size ceiling.
    #[must_use]
    pub fn new() -> Self {
        Self::with_decompressor(LzoDecompressor)
    }
}

impl Default for AmtaDecoder<LzoDecompressor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Decompressor> AmtaDecoder<D> {
    /// Create a decoder that inflates through `decompressor`.
    #[must_use]
    pub fn with_decompressor(decompressor: D) -> Self {
        Self {
            decompressor,
            max_inflated_size: MAX_INFLATED_SIZE,
        }
    }

    /// Set the exclusive ceiling for declared inflated sizes.
    #[must_use]
    pub fn with_max_inflated_size(mut self, max_inflated_size: u32) -> Self {
        self.max_inflated_size = max_inflated_size;
        self
    }

    /// The exclusive ceiling for declared inflated sizes.
    pub fn max_inflated_size(&self) -> u32 {
        self.max_inflated_size
    }

    /// Decode a container into its payload.
    ///
    /// # Errors
    /// Returns [`DecodeError::Format`] if the header is rejected (the
    /// decompressor is never called in that case) and
    /// [`DecodeError::Decompress`] if the recovered stream does not inflate.
    pub fn decode(&self, raw: &[u8]) -> std::result::Result<Vec<u8>, DecodeError> {
        self.decode_inspecting(raw, |_| {})
    }

    /// Decode a container, handing the de-obfuscated LZO stream to `inspect`
    /// before it is decompressed.
    ///
    /// `inspect` only runs once the header has been accepted. The stream it
    /// sees is a standalone LZO1X stream, useful for checking the diffusion
    /// step against a reference decompressor.
    ///
    /// # Errors
    /// See [`AmtaDecoder::decode`].
    pub fn decode_inspecting<F>(
        &self,
        raw: &[u8],
        inspect: F,
    ) -> std::result::Result<Vec<u8>, DecodeError>
    where
        F: FnOnce(&[u8]),
    {
        let (header, body) = parse_with_limit(raw, self.max_inflated_size)?;
        let mut stream = body.to_vec();
        diffusion::decode_in_place(&mut stream);
        self.inflate(header, &stream, inspect)
    }

    /// Decode a container, reusing its buffer for the de-obfuscated stream.
    ///
    /// # Errors
    /// See [`AmtaDecoder::decode`].
    pub fn decode_owned(&self, mut raw: Vec<u8>) -> std::result::Result<Vec<u8>, DecodeError> {
        let (header, _) = parse_with_limit(&raw, self.max_inflated_size)?;
        raw.drain(..HEADER_SIZE);
        diffusion::decode_in_place(&mut raw);
        self.inflate(header, &raw, |_| {})
    }

    /// Parse the header and summarize the container without decompressing it.
    ///
    /// # Errors
    /// Returns the header's [`FormatError`] if it is rejected.
    pub fn inspect(&self, raw: &[u8]) -> std::result::Result<ContainerInfo, FormatError> {
        let (header, body) = parse_with_limit(raw, self.max_inflated_size)?;
        Ok(ContainerInfo {
            inflated_size: header.inflated_size,
            body_size: body.len(),
            first_stream_byte: body.first().map(|b| b ^ super::DIFFUSION_SEED),
        })
    }

    fn inflate<F>(
        &self,
        header: AmtaHeader,
        stream: &[u8],
        inspect: F,
    ) -> std::result::Result<Vec<u8>, DecodeError>
    where
        F: FnOnce(&[u8]),
    {
        tracing::debug!(
            "Decoded {} byte stream, inflating to {} bytes",
            stream.len(),
            header.inflated_size
        );
        inspect(stream);

        Ok(self
            .decompressor
            .decompress(stream, header.inflated_size as usize)?)
    }
}

/// Header summary of an AMTA container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    /// Declared size of the inflated payload.
    pub inflated_size: u32,
    /// Bytes following the header.
    pub body_size: usize,
    /// First byte of the de-obfuscated LZO stream, if the body is not empty.
    pub first_stream_byte: Option<u8>,
}

/// Decode a container with the default LZO decoder.
///
/// # Errors
/// See [`AmtaDecoder::decode`].
pub fn decode_container(raw: &[u8]) -> std::result::Result<Vec<u8>, DecodeError> {
    AmtaDecoder::new().decode(raw)
}

/// Summarize a container's header with the default size ceiling.
///
/// # Errors
/// Returns the header's [`FormatError`] if it is rejected.
pub fn inspect(raw: &[u8]) -> std::result::Result<ContainerInfo, FormatError> {
    AmtaDecoder::new().inspect(raw)
}

/// Build an AMTA container around `payload` with the default size ceiling.
///
/// # Errors
/// See [`encode_container_with_limit`].
pub fn encode_container(payload: &[u8]) -> Result<Vec<u8>> {
    encode_container_with_limit(payload, MAX_INFLATED_SIZE)
}

/// Build an AMTA container: LZO1X-compress, diffuse, prepend the header.
///
/// # Errors
/// Returns [`FormatError::EmptyDeclaredSize`] for an empty payload,
/// [`FormatError::DeclaredSizeTooLarge`] if the payload would not pass the
/// parser's ceiling, or an error if compression fails.
pub fn encode_container_with_limit(payload: &[u8], max_inflated_size: u32) -> Result<Vec<u8>> {
    if payload.is_empty() {
        return Err(FormatError::EmptyDeclaredSize.into());
    }
    let inflated_size = u32::try_from(payload.len()).unwrap_or(u32::MAX);
    if inflated_size >= max_inflated_size {
        return Err(FormatError::DeclaredSizeTooLarge {
            size: inflated_size,
            limit: max_inflated_size,
        }
        .into());
    }

    let mut stream = lzo::compress(payload)?;
    diffusion::encode_in_place(&mut stream);

    let mut container = Vec::with_capacity(HEADER_SIZE + stream.len());
    container.extend_from_slice(&AmtaHeader::new(inflated_size).to_bytes());
    container.extend_from_slice(&stream);
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecompressError;
    use std::cell::RefCell;

    fn raw_container(size: u32, body: &[u8]) -> Vec<u8> {
        let mut raw = AmtaHeader::new(size).to_bytes().to_vec();
        raw.extend_from_slice(body);
        raw
    }

    fn echo(stream: &[u8], _expected: usize) -> std::result::Result<Vec<u8>, DecompressError> {
        Ok(stream.to_vec())
    }

    fn never_called(_: &[u8], _: usize) -> std::result::Result<Vec<u8>, DecompressError> {
        panic!("decompressor must not run for a rejected header");
    }

    #[test]
    fn test_stream_passed_verbatim_with_declared_size() {
        let decoder = AmtaDecoder::with_decompressor(
            |stream: &[u8], expected: usize| -> std::result::Result<Vec<u8>, DecompressError> {
                assert_eq!(expected, 42);
                Ok(stream.to_vec())
            },
        );
        let payload = decoder.decode(&raw_container(42, &[0x10, 0x20, 0x30])).unwrap();
        assert_eq!(payload, vec![0x46, 0x30, 0x10]);
    }

    #[test]
    fn test_oversized_header_never_reaches_decompressor() {
        let decoder = AmtaDecoder::with_decompressor(never_called);
        let raw = raw_container(0xFFFF_FFFF, &[0xAB; 32]);
        assert_eq!(
            decoder.decode(&raw),
            Err(DecodeError::Format(FormatError::DeclaredSizeTooLarge {
                size: 0xFFFF_FFFF,
                limit: MAX_INFLATED_SIZE,
            }))
        );
        assert!(decoder.decode_owned(raw).is_err());
    }

    #[test]
    fn test_rejected_header_skips_inspector() {
        let decoder = AmtaDecoder::with_decompressor(never_called);
        let seen = RefCell::new(false);
        let result =
            decoder.decode_inspecting(b"RIFF\x01\0\0\0body", |_| *seen.borrow_mut() = true);
        assert!(matches!(result, Err(ref e) if e.is_skippable()));
        assert!(!*seen.borrow());
    }

    #[test]
    fn test_decompress_failure_propagates() {
        let decoder = AmtaDecoder::with_decompressor(
            |_: &[u8], _: usize| -> std::result::Result<Vec<u8>, DecompressError> {
                Err(DecompressError::Lzo {
                    message: "OutputOverrun".into(),
                })
            },
        );
        let err = decoder.decode(&raw_container(8, &[1, 2, 3])).unwrap_err();
        assert!(matches!(err, DecodeError::Decompress(DecompressError::Lzo { .. })));
    }

    #[test]
    fn test_custom_ceiling() {
        let decoder = AmtaDecoder::with_decompressor(echo).with_max_inflated_size(16);
        assert_eq!(decoder.max_inflated_size(), 16);
        assert!(decoder.decode(&raw_container(15, &[0])).is_ok());
        assert!(decoder.decode(&raw_container(16, &[0])).is_err());
    }

    #[test]
    fn test_owned_matches_borrowed() {
        let decoder = AmtaDecoder::with_decompressor(echo);
        let raw = raw_container(3, &[0x10, 0x20, 0x30, 0x40]);
        assert_eq!(decoder.decode_owned(raw.clone()), decoder.decode(&raw));
    }

    #[test]
    fn test_end_to_end_lzo() {
        let payload: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
        let container = encode_container(&payload).unwrap();

        let captured = RefCell::new(Vec::new());
        let decoded = AmtaDecoder::new()
            .decode_inspecting(&container, |stream| captured.borrow_mut().extend_from_slice(stream))
            .unwrap();
        assert_eq!(decoded, payload);

        // The inspected stream is a plain LZO1X stream
        let stream = captured.into_inner();
        assert_eq!(lzo::decompress(&stream, payload.len()).unwrap(), payload);
    }

    #[test]
    fn test_empty_body_fails_at_decompression() {
        let err = decode_container(&raw_container(10, &[])).unwrap_err();
        assert!(matches!(err, DecodeError::Decompress(_)));
    }

    #[test]
    fn test_wrong_declared_size_fails() {
        let mut container = encode_container(&[5u8; 300]).unwrap();
        container[4..8].copy_from_slice(&299u32.to_le_bytes());
        assert!(matches!(
            decode_container(&container),
            Err(DecodeError::Decompress(_))
        ));
    }

    #[test]
    fn test_inspect() {
        let info = inspect(&raw_container(1000, &[0x47, 0x00, 0x01])).unwrap();
        assert_eq!(
            info,
            ContainerInfo {
                inflated_size: 1000,
                body_size: 3,
                first_stream_byte: Some(0x11),
            }
        );
        assert_eq!(inspect(&raw_container(1, &[])).unwrap().first_stream_byte, None);
        assert_eq!(inspect(b"amta"), Err(FormatError::Truncated { len: 4 }));
    }

    #[test]
    fn test_encode_rejects_bad_sizes() {
        assert!(matches!(
            encode_container(&[]),
            Err(crate::Error::Format(FormatError::EmptyDeclaredSize))
        ));
        assert!(matches!(
            encode_container_with_limit(&[0; 64], 64),
            Err(crate::Error::Format(FormatError::DeclaredSizeTooLarge { size: 64, limit: 64 }))
        ));
    }
}
