//! Maps a 24-bit hash prefix to `(offset, length)` inside the data segment.

use crate::error::Error;
use crate::view::ByteView;
use crate::{DATA_SEGMENT_OFFSET, INDEX_ENTRY_SIZE};

/// Largest representable 24-bit prefix.
pub const MAX_PREFIX: u32 = 0x00FF_FFFF;

/// Looks up the bucket for `prefix`, returning its `(offset, length)` within
/// the data segment (both relative to the start of the data segment, not
/// the file).
///
/// `length == 0` is a valid, non-error result for an empty bucket.
pub fn lookup(view: &dyn ByteView, prefix: u32) -> Result<(u64, u64), Error> {
    debug_assert!(prefix <= MAX_PREFIX);

    let entry_offset = (prefix as u64) * INDEX_ENTRY_SIZE as u64;
    let mut buf = [0u8; INDEX_ENTRY_SIZE];
    view.read_at(&mut buf, entry_offset)?;
    let offset = u64::from_be_bytes(buf);

    let length = if prefix == MAX_PREFIX {
        view.len().saturating_sub(DATA_SEGMENT_OFFSET).saturating_sub(offset)
    } else {
        view.read_at(&mut buf, entry_offset + INDEX_ENTRY_SIZE as u64)?;
        let next_offset = u64::from_be_bytes(buf);
        next_offset - offset
    };

    Ok((offset, length))
}
