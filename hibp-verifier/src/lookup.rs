//! Binary search for an exact hash within its bucket.

use std::cmp::Ordering;

use crate::error::Error;
use crate::index::lookup as index_lookup;
use crate::record::{self, RECORD_SIZE};
use crate::view::ByteView;
use crate::{DATA_SEGMENT_OFFSET, HASH_LEN, prefix_to_u32, split_hash};

/// Returns the stored frequency for `hash`, or `0` if it's absent.
///
/// This never returns an error except on I/O corruption (a short read from
/// the backing view) — absence is a normal, successful `0`, not an error.
///
/// The binary search below intentionally keeps the `hi = mid` / `lo = mid`
/// update shape (not `mid ± 1`), narrowing the window `[lo, hi)` until a
/// single candidate remains. Every position visited as `mid` is directly
/// compared and ruled out, except `lo`'s starting value: when the target is
/// smaller than every probed record, `hi` walks down to `lo + 1` while `lo`
/// itself is never selected as `mid`. The final check below against `lo`
/// covers exactly that record.
pub fn pwned(view: &dyn ByteView, hash: &[u8; HASH_LEN]) -> Result<u32, Error> {
    let (prefix, suffix) = split_hash(hash);
    let (bucket_offset, bucket_len) = index_lookup(view, prefix_to_u32(prefix))?;

    let n = (bucket_len / RECORD_SIZE as u64) as usize;
    if n == 0 {
        return Ok(0);
    }

    let data_base = DATA_SEGMENT_OFFSET + bucket_offset;
    let mut lo = 0usize;
    let mut hi = n;
    let mut record = [0u8; RECORD_SIZE];

    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        view.read_at(&mut record, data_base + (RECORD_SIZE as u64) * mid as u64)?;

        match record::suffix(&record).cmp(suffix.as_slice()) {
            Ordering::Equal => return Ok(record::frequency(&record) as u32),
            Ordering::Less => lo = mid,
            Ordering::Greater => hi = mid,
        }
    }

    view.read_at(&mut record, data_base + (RECORD_SIZE as u64) * lo as u64)?;
    if record::suffix(&record) == suffix.as_slice() {
        return Ok(record::frequency(&record) as u32);
    }
    Ok(0)
}
