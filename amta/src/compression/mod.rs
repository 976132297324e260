//! Compression utilities
//!
//! The decoder never inflates data itself; it hands the recovered stream to a
//! [`Decompressor`]. [`LzoDecompressor`] is the implementation AMTA files need.

use crate::error::DecompressError;

pub mod lzo;

/// Inflates a compressed stream to a known size.
pub trait Decompressor: Send + Sync {
    /// Decompress `stream`, which is expected to inflate to `expected_size` bytes.
    ///
    /// # Errors
    /// Returns an error if the stream is corrupt or inflates to a different size.
    fn decompress(&self, stream: &[u8], expected_size: usize) -> Result<Vec<u8>, DecompressError>;
}

impl<F> Decompressor for F
where
    F: Fn(&[u8], usize) -> Result<Vec<u8>, DecompressError> + Send + Sync,
{
    fn decompress(&self, stream: &[u8], expected_size: usize) -> Result<Vec<u8>, DecompressError> {
        self(stream, expected_size)
    }
}

/// LZO1X decompressor (the stream family AMTA bodies carry).
#[derive(Debug, Clone, Copy, Default)]
pub struct LzoDecompressor;

impl Decompressor for LzoDecompressor {
    fn decompress(&self, stream: &[u8], expected_size: usize) -> Result<Vec<u8>, DecompressError> {
        lzo::decompress(stream, expected_size)
    }
}
