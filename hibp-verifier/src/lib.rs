//! Offline lookup engine for the Have I Been Pwned "Pwned Passwords" corpus.
//!
//! The corpus is a single flat file: a 128 MiB direct-addressed index over
//! 24-bit SHA-1 prefixes, followed by a data segment of sorted, fixed-size
//! records. The engine memory-maps that file and answers two kinds of
//! queries against it without any further I/O beyond page faults:
//!
//! - [`Engine::pwned`] — does this exact 20-byte hash appear, and how many
//!   times?
//! - [`Engine::scan`] — walk every record whose prefix falls in a range,
//!   in ascending order, with early-stop.
//!
//! A background worker can swap the backing file for an updated one without
//! ever handing a concurrent reader a closed mapping; see [`Engine`].

pub mod engine;
pub mod error;
pub mod hashutil;
pub mod index;
pub mod lookup;
pub mod pool;
pub mod record;
pub mod scan;
pub mod view;

pub use engine::{Engine, EngineConfig};
pub use error::Error;
pub use hashutil::{hex_decode_hash, hex_decode_prefix5, hex_encode_upper, sha1};
pub use record::RECORD_SIZE;
pub use scan::ScanControl;
pub use view::{ByteView, HeapView, MmapView};

/// Length in bytes of a full SHA-1 hash.
pub const HASH_LEN: usize = 20;
/// Length in bytes of the bucket-selecting prefix (24 bits).
pub const PREFIX_LEN: usize = 3;
/// Length in bytes of the in-bucket discriminator.
pub const SUFFIX_LEN: usize = 17;
/// Number of index entries: one per possible 24-bit prefix.
pub const INDEX_ENTRY_COUNT: usize = 1 << 24;
/// Size in bytes of one index entry (a big-endian u64 byte offset).
pub const INDEX_ENTRY_SIZE: usize = 8;
/// Total size of the index segment: `2^24 * 8` bytes (128 MiB).
pub const INDEX_SEGMENT_SIZE: u64 = (INDEX_ENTRY_COUNT * INDEX_ENTRY_SIZE) as u64;
/// Absolute byte offset where the data segment begins.
pub const DATA_SEGMENT_OFFSET: u64 = INDEX_SEGMENT_SIZE;
/// Largest frequency representable on disk; counts saturate here.
pub const FREQUENCY_MAX: u32 = u16::MAX as u32;

/// Splits a 20-byte hash into its 3-byte prefix and 17-byte suffix.
#[inline]
pub fn split_hash(hash: &[u8; HASH_LEN]) -> ([u8; PREFIX_LEN], [u8; SUFFIX_LEN]) {
    let mut prefix = [0u8; PREFIX_LEN];
    let mut suffix = [0u8; SUFFIX_LEN];
    prefix.copy_from_slice(&hash[..PREFIX_LEN]);
    suffix.copy_from_slice(&hash[PREFIX_LEN..]);
    (prefix, suffix)
}

/// Interprets a 3-byte big-endian prefix as a `u32` in `0..=0xFFFFFF`.
#[inline]
pub fn prefix_to_u32(prefix: [u8; PREFIX_LEN]) -> u32 {
    u32::from_be_bytes([0, prefix[0], prefix[1], prefix[2]])
}

/// Renders a `u32` in `0..=0xFFFFFF` as a 3-byte big-endian prefix.
#[inline]
pub fn u32_to_prefix(value: u32) -> [u8; PREFIX_LEN] {
    let bytes = value.to_be_bytes();
    [bytes[1], bytes[2], bytes[3]]
}

/// Environment variable naming the database file for benches and manual
/// testing.
pub const HIBP_DATABASE_ENV: &str = "HIBP_DATABASE";

/// Returns the database path from [`HIBP_DATABASE_ENV`], or a sibling
/// `pwned-passwords.bin` next to the crate if unset.
pub fn dataset_path_from_env() -> std::path::PathBuf {
    std::env::var(HIBP_DATABASE_ENV).map(std::path::PathBuf::from).unwrap_or_else(|_| {
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("pwned-passwords.bin")
    })
}
