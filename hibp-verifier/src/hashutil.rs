//! Hex/SHA-1 helpers shared by the engine and its callers.
//!
//! These mirror the conversion helpers the downloader side of this
//! workspace uses (`hex_to_nibble`, `prefix_to_hex`), but in a checked form:
//! request-facing callers need `Option`/`Result`, not a panic, when a caller
//! hands us garbage.

use sha1::{Digest, Sha1};

use crate::{HASH_LEN, PREFIX_LEN};

/// Hex lookup table for uppercase rendering.
const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Computes the SHA-1 digest of an arbitrary byte string.
#[inline]
pub fn sha1(bytes: &[u8]) -> [u8; HASH_LEN] {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Converts an ASCII hex digit to its nibble value, or `None` if it isn't one.
#[inline]
fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

/// Decodes exactly 40 hex characters into a 20-byte hash.
///
/// Returns `None` if the input isn't exactly 40 bytes of hex.
pub fn hex_decode_hash(value: &[u8]) -> Option<[u8; HASH_LEN]> {
    if value.len() != HASH_LEN * 2 {
        return None;
    }
    let mut out = [0u8; HASH_LEN];
    for (i, byte) in out.iter_mut().enumerate() {
        let hi = hex_nibble(value[i * 2])?;
        let lo = hex_nibble(value[i * 2 + 1])?;
        *byte = (hi << 4) | lo;
    }
    Some(out)
}

/// Decodes exactly 5 hex characters into a 3-byte prefix and the high nibble
/// of the byte that straddles the prefix/suffix boundary.
///
/// The 5th hex character is only a nibble of `hash[2]`; the caller supplies
/// the low nibble (e.g. `'0'` and `'F'` for the two ends of a `/range/`
/// scan) to complete the byte.
pub fn hex_decode_prefix5(value: &[u8], low_nibble_char: u8) -> Option<[u8; PREFIX_LEN]> {
    if value.len() != 5 {
        return None;
    }
    let mut full = [0u8; 6];
    full[..5].copy_from_slice(value);
    full[5] = low_nibble_char;

    let mut out = [0u8; PREFIX_LEN];
    for (i, byte) in out.iter_mut().enumerate() {
        let hi = hex_nibble(full[i * 2])?;
        let lo = hex_nibble(full[i * 2 + 1])?;
        *byte = (hi << 4) | lo;
    }
    Some(out)
}

/// Returns `true` if every byte is an ASCII hex digit.
pub fn is_hex(value: &[u8]) -> bool {
    value.iter().all(|&b| hex_nibble(b).is_some())
}

/// Renders bytes as uppercase hex into a freshly-allocated `String`.
pub fn hex_encode_upper(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_CHARS[(b >> 4) as usize] as char);
        out.push(HEX_CHARS[(b & 0x0f) as usize] as char);
    }
    out
}
