//! Byte-diffusion layer wrapping the LZO stream
//!
//! The encoder chains every byte with its already-encoded predecessor and
//! seeds the first byte with [`DIFFUSION_SEED`]. Decoding XORs each byte with
//! its *encoded* predecessor:
//!
//! ```text
//! out[0] = body[0] ^ 0x56
//! out[i] = body[i] ^ body[i - 1]      (1 <= i < len, original values)
//! ```

use super::DIFFUSION_SEED;

/// Undo the diffusion layer in place.
///
/// Walks from the end towards the start so `body[i - 1]` still holds its
/// encoded value when `body[i]` is computed.
pub fn decode_in_place(body: &mut [u8]) {
    let Some(&first) = body.first() else {
        return;
    };

    for i in (1..body.len()).rev() {
        body[i] ^= body[i - 1];
    }
    body[0] = first ^ DIFFUSION_SEED;
}

/// Undo the diffusion layer, returning a new buffer of the same length.
#[must_use]
pub fn decode(body: &[u8]) -> Vec<u8> {
    let mut out = body.to_vec();
    decode_in_place(&mut out);
    out
}

/// Apply the diffusion layer in place (inverse of [`decode_in_place`]).
///
/// Walks forward so `stream[i - 1]` already holds its encoded value.
pub fn encode_in_place(stream: &mut [u8]) {
    let Some(first) = stream.first_mut() else {
        return;
    };
    *first ^= DIFFUSION_SEED;

    for i in 1..stream.len() {
        stream[i] ^= stream[i - 1];
    }
}

/// Apply the diffusion layer, returning a new buffer of the same length.
#[must_use]
pub fn encode(stream: &[u8]) -> Vec<u8> {
    let mut out = stream.to_vec();
    encode_in_place(&mut out);
    out
}
