//! AMTA container format
//!
//! An AMTA file is an 8-byte header followed by an obfuscated LZO1X stream:
//!
//! ```text
//! offset  size  field
//! 0       4     magic, the raw bytes "amta"
//! 4       4     declared inflated size (u32, little-endian)
//! 8       ..    body: LZO1X stream after diffusion encoding
//! ```
//!
//! Decoding is linear: [`parse`] the header, undo the diffusion with
//! [`diffusion::decode_in_place`], then inflate the recovered stream with a
//! [`Decompressor`](crate::compression::Decompressor).

mod decoder;
pub mod diffusion;
mod header;

pub use decoder::{
    AmtaDecoder, ContainerInfo, decode_container, encode_container, encode_container_with_limit,
    inspect,
};
pub use header::{AmtaHeader, parse, parse_with_limit};

/// AMTA magic bytes
pub const MAGIC: [u8; 4] = [0x61, 0x6D, 0x74, 0x61];

/// Size of the fixed header (magic + declared inflated size)
pub const HEADER_SIZE: usize = 8;

/// Default exclusive ceiling for the declared inflated size (100 MiB + 1)
pub const MAX_INFLATED_SIZE: u32 = 104_857_601;

/// Byte XOR-ed into the first body byte by the diffusion layer
pub const DIFFUSION_SEED: u8 = 0x56;
