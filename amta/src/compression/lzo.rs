//! LZO1X block compression (headerless streams)

use crate::error::{DecompressError, Error, Result};

/// Instruction that terminates every LZO1X stream.
pub const END_OF_STREAM: [u8; 3] = [0x11, 0x00, 0x00];

/// Decompress a raw LZO1X stream and check it inflates to exactly `expected_size` bytes.
///
/// The stream must be consumed completely: bytes after its end-of-stream
/// marker are rejected.
///
/// # Errors
/// Returns [`DecompressError::Lzo`] for a malformed stream,
/// [`DecompressError::SizeMismatch`] if the output length differs and
/// [`DecompressError::TrailingInput`] if input remains after the stream ends.
pub fn decompress(
    stream: &[u8],
    expected_size: usize,
) -> std::result::Result<Vec<u8>, DecompressError> {
    let out = lzokay_native::decompress_all(stream, Some(expected_size))
        .map_err(|e| DecompressError::Lzo {
            message: format!("{e:?}"),
        })?;

    if out.len() != expected_size {
        return Err(DecompressError::SizeMismatch {
            expected: expected_size,
            actual: out.len(),
        });
    }

    if has_trailing_input(stream) {
        return Err(DecompressError::TrailingInput);
    }

    Ok(out)
}

/// Whether a stream that decompressed cleanly stops before its last byte.
///
/// A fully consumed stream ends in [`END_OF_STREAM`] and no longer decodes
/// once its final byte is dropped.
fn has_trailing_input(stream: &[u8]) -> bool {
    if !stream.ends_with(&END_OF_STREAM) {
        return true;
    }
    lzokay_native::decompress_all(&stream[..stream.len() - 1], None).is_ok()
}

/// Compress data into a raw LZO1X stream.
///
/// # Errors
/// Returns an error if compression fails.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    lzokay_native::compress(data).map_err(|e| Error::LzoCompressionFailed {
        message: format!("{e:?}"),
    })
}
