//! Error types for AMTA decoding

use std::path::PathBuf;

use thiserror::Error;

/// Header-level rejection of a candidate container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Input is shorter than the fixed 8-byte header.
    #[error("truncated container: {len} bytes, header needs 8")]
    Truncated {
        /// Length of the rejected input.
        len: usize,
    },

    /// The first four bytes are not `amta`. Not this format, rather than corruption.
    #[error("invalid AMTA magic: expected \"amta\", found {0:02x?}")]
    BadMagic([u8; 4]),

    /// The header declares an inflated size of zero.
    #[error("bad header: declared inflated size is 0")]
    EmptyDeclaredSize,

    /// The header declares an inflated size at or above the configured ceiling.
    #[error("bad header: declared inflated size {size} >= 0x{limit:08x}")]
    DeclaredSizeTooLarge {
        /// The size found in the header.
        size: u32,
        /// The exclusive ceiling it was checked against.
        limit: u32,
    },
}

/// Failure reported by a [`Decompressor`](crate::compression::Decompressor).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecompressError {
    /// The LZO stream is malformed.
    #[error("LZO decompression failed: {message}")]
    Lzo {
        /// The error message.
        message: String,
    },

    /// The stream inflated to a different size than the header declared.
    #[error("inflated size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Declared inflated size.
        expected: usize,
        /// Bytes actually produced.
        actual: usize,
    },

    /// Bytes follow the stream's end-of-stream marker.
    #[error("LZO stream has input left after the end-of-stream marker")]
    TrailingInput,
}

/// Terminal failure while decoding a single container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The header was rejected before any decoding work ran.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The decompressor rejected the de-obfuscated stream.
    #[error(transparent)]
    Decompress(#[from] DecompressError),
}

impl DecodeError {
    /// Whether a batch should count this input as skipped rather than failed.
    ///
    /// Only a magic mismatch qualifies: the input simply is not an AMTA container.
    pub fn is_skippable(&self) -> bool {
        matches!(self, DecodeError::Format(FormatError::BadMagic(_)))
    }
}

/// The error type for driver-level AMTA operations (file I/O, batches, config).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input path given to a batch does not exist.
    #[error("unable to read '{}'", .path.display())]
    InputNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    // ==================== Container Errors ====================
    /// A header was rejected, or a payload cannot be described by one.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A container could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    // ==================== Compression Errors ====================
    /// LZO compression failed while building a container.
    #[error("LZO compression failed: {message}")]
    LzoCompressionFailed {
        /// The error message.
        message: String,
    },

    // ==================== Parsing Errors ====================
    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for driver-level AMTA operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_bad_magic_is_skippable() {
        assert!(DecodeError::from(FormatError::BadMagic(*b"RIFF")).is_skippable());
        assert!(!DecodeError::from(FormatError::EmptyDeclaredSize).is_skippable());
        assert!(!DecodeError::from(FormatError::Truncated { len: 3 }).is_skippable());
        assert!(
            !DecodeError::from(DecompressError::Lzo {
                message: "InputOverrun".into()
            })
            .is_skippable()
        );
        assert!(!DecodeError::from(DecompressError::TrailingInput).is_skippable());
    }

    #[test]
    fn test_walk_error_conversion() {
        let dir = std::env::temp_dir().join("amta-walk-error-conversion-missing");
        let err = walkdir::WalkDir::new(&dir)
            .into_iter()
            .find_map(std::result::Result::err)
            .unwrap();
        let converted = Error::from(err);
        assert!(
            matches!(converted, Error::WalkDirError(ref msg) if msg.contains("amta-walk-error"))
        );
    }

    #[test]
    fn test_messages() {
        let err = FormatError::DeclaredSizeTooLarge {
            size: 0xFFFF_FFFF,
            limit: 104_857_601,
        };
        assert_eq!(
            err.to_string(),
            "bad header: declared inflated size 4294967295 >= 0x06400001"
        );
        assert_eq!(
            FormatError::BadMagic([0x52, 0x49, 0x46, 0x46]).to_string(),
            "invalid AMTA magic: expected \"amta\", found [52, 49, 46, 46]"
        );
    }
}
