//! # amta
//!
//! A pure-Rust decoder for AMTA containers: an 8-byte header in front of an
//! LZO1X stream hidden behind a byte-diffusion layer.
//!
//! ## Quick Start
//!
//! ### Decoding a container
//!
//! ```no_run
//! use amta::formats::amta::decode_container;
//!
//! let raw = std::fs::read("sound.amt")?;
//! let payload = decode_container(&raw)?;
//! println!("Inflated {} bytes", payload.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Decoding a directory tree
//!
//! ```no_run
//! use amta::batch::{BatchOptions, batch_decode};
//!
//! let options = BatchOptions::new().with_output_dir("inflated_files");
//! let result = batch_decode("assets/", &options, |_| {})?;
//! println!("{} decoded, {} skipped, {} failed", result.decoded, result.skipped, result.failed);
//! # Ok::<(), amta::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `amta` command-line binary

pub mod batch;
pub mod compression;
pub mod config;
pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{DecodeError, DecompressError, Error, FormatError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::batch::{BatchDecodeResult, BatchProgress, FileOutcome, batch_decode};
    pub use crate::compression::{Decompressor, LzoDecompressor};
    pub use crate::config::BatchOptions;
    pub use crate::error::{DecodeError, DecompressError, Error, FormatError, Result};
    pub use crate::formats::amta::{
        AmtaDecoder, AmtaHeader, ContainerInfo, decode_container, diffusion, encode_container,
        inspect, parse,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
