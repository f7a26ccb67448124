//! Iterates every record whose prefix falls in `[start, end]`, in order.

use crate::error::Error;
use crate::index::{MAX_PREFIX, lookup as index_lookup};
use crate::pool::BufferPool;
use crate::record::{self, RECORD_SIZE};
use crate::view::ByteView;
use crate::{DATA_SEGMENT_OFFSET, HASH_LEN, PREFIX_LEN, prefix_to_u32, u32_to_prefix};

/// What a scan callback returns to control iteration: keep going, or stop.
///
/// `scan` also accepts a plain `bool` (`true` meaning stop) via
/// [`ScanControl::from`], matching spec's `cb(hash, freq) -> bool` shape
/// while giving call sites that want it a more self-documenting name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanControl {
    Continue,
    Stop,
}

impl From<bool> for ScanControl {
    fn from(stop: bool) -> Self {
        if stop { ScanControl::Stop } else { ScanControl::Continue }
    }
}

/// Visits every record with prefix in `[start, end]` in ascending
/// `(prefix, suffix)` order, calling `cb(hash, freq)` for each.
///
/// Returns [`Error::InvalidRange`] if `start > end`, without performing any
/// reads. Stops as soon as `cb` returns `true` (`ScanControl::Stop`); if `cb`
/// never does, every record in range is visited and `scan` returns `Ok(())`.
///
/// Each call borrows one buffer from `pool` for the duration of the scan and
/// returns it on exit, rather than allocating per bucket.
pub fn scan<F>(
    view: &dyn ByteView,
    pool: &BufferPool,
    start: [u8; PREFIX_LEN],
    end: [u8; PREFIX_LEN],
    mut cb: F,
) -> Result<(), Error>
where
    F: FnMut(&[u8; HASH_LEN], u16) -> bool,
{
    let start_u32 = prefix_to_u32(start);
    let end_u32 = prefix_to_u32(end);
    if start_u32 > end_u32 {
        return Err(Error::InvalidRange { start: start_u32, end: end_u32 });
    }

    let mut buf = pool.acquire();
    let mut hash = [0u8; HASH_LEN];
    let mut prefix = start_u32;

    loop {
        let prefix_bytes = u32_to_prefix(prefix);
        hash[..PREFIX_LEN].copy_from_slice(&prefix_bytes);

        let (bucket_offset, bucket_len) = index_lookup(view, prefix)?;
        let bucket_len = bucket_len as usize;

        if buf.capacity() < bucket_len {
            buf.reserve(bucket_len - buf.capacity());
        }
        buf.resize(bucket_len, 0);
        if bucket_len > 0 {
            view.read_at(&mut buf[..bucket_len], DATA_SEGMENT_OFFSET + bucket_offset)?;
        }

        for record in buf[..bucket_len].chunks_exact(RECORD_SIZE) {
            hash[PREFIX_LEN..].copy_from_slice(record::suffix(record));
            let freq = record::frequency(record);
            if cb(&hash, freq) {
                return Ok(());
            }
        }

        // Guard explicitly against overflowing past the 24-bit prefix space.
        if prefix >= MAX_PREFIX || prefix == end_u32 {
            break;
        }
        prefix += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::encode;
    use crate::view::HeapView;
    use crate::{INDEX_ENTRY_SIZE, INDEX_SEGMENT_SIZE, SUFFIX_LEN};

    /// Builds a database containing one record per prefix in `prefixes`
    /// (single record, suffix = prefix repeated, freq = prefix as u16).
    fn build_db(prefixes: &[u32]) -> HeapView {
        let mut records = Vec::new();
        let mut offsets = vec![0u64; 1 << 24];
        let mut cursor = 0u64;

        let mut sorted: Vec<u32> = prefixes.to_vec();
        sorted.sort_unstable();

        for &p in &sorted {
            offsets[p as usize] = cursor;
            let mut suffix = [0u8; SUFFIX_LEN];
            suffix[0] = (p & 0xFF) as u8;
            suffix[1] = ((p >> 8) & 0xFF) as u8;
            let mut rec = [0u8; RECORD_SIZE];
            encode(&suffix, p, &mut rec);
            records.extend_from_slice(&rec);
            cursor += RECORD_SIZE as u64;
        }
        // Forward-fill: index[p] must be non-decreasing, so every prefix
        // after the highest used one inherits `cursor`, resolving to an
        // empty (zero-length) bucket.
        let mut running = 0u64;
        let mut next_used = 0usize;
        for p in 0..(1usize << 24) {
            if next_used < sorted.len() && sorted[next_used] as usize == p {
                running = offsets[p];
                next_used += 1;
            }
            offsets[p] = running;
        }

        let mut bytes = vec![0u8; INDEX_SEGMENT_SIZE as usize + records.len()];
        for (p, &offset) in offsets.iter().enumerate() {
            let start = p * INDEX_ENTRY_SIZE;
            bytes[start..start + INDEX_ENTRY_SIZE].copy_from_slice(&offset.to_be_bytes());
        }
        bytes.extend_from_slice(&records);
        HeapView::new(bytes)
    }

    #[test]
    fn scan_visits_records_in_ascending_order() {
        let view = build_db(&[0x000005, 0x000010, 0x0000FF]);
        let pool = BufferPool::new();
        let mut seen = Vec::new();
        scan(&view, &pool, [0, 0, 0], [0, 0xFF, 0xFF], |hash, freq| {
            seen.push((*hash, freq));
            false
        })
        .unwrap();

        assert_eq!(seen.len(), 3);
        for pair in seen.windows(2) {
            assert!(pair[0].0 < pair[1].0, "records must come out in strictly ascending hash order");
        }
    }

    #[test]
    fn scan_bounds_are_inclusive_and_exact() {
        let view = build_db(&[0x000004, 0x000005, 0x000006]);
        let pool = BufferPool::new();
        let mut seen = Vec::new();
        scan(&view, &pool, [0, 0, 5], [0, 0, 5], |hash, freq| {
            seen.push((*hash, freq));
            false
        })
        .unwrap();

        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, 5);
    }

    #[test]
    fn scan_stops_early_on_true() {
        let view = build_db(&[0x000001, 0x000002, 0x000003, 0x000004]);
        let pool = BufferPool::new();
        let mut count = 0;
        scan(&view, &pool, [0, 0, 1], [0, 0, 4], |_hash, _freq| {
            count += 1;
            count == 2
        })
        .unwrap();

        assert_eq!(count, 2);
    }

    #[test]
    fn scan_rejects_inverted_range() {
        let view = build_db(&[]);
        let pool = BufferPool::new();
        let result = scan(&view, &pool, [0, 0, 5], [0, 0, 1], |_, _| false);
        assert!(matches!(result, Err(Error::InvalidRange { .. })));
    }

    #[test]
    fn scan_at_max_prefix_does_not_overflow() {
        let view = build_db(&[crate::index::MAX_PREFIX]);
        let pool = BufferPool::new();
        let mut count = 0;
        scan(
            &view,
            &pool,
            u32_to_prefix(crate::index::MAX_PREFIX),
            u32_to_prefix(crate::index::MAX_PREFIX),
            |_, _| {
                count += 1;
                false
            },
        )
        .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn empty_database_scan_visits_nothing() {
        // Full 24-bit range would be correct too, but iterating all 16M
        // buckets is wasted work for a unit test; a representative slice
        // exercises the same "every bucket empty" path.
        let view = build_db(&[]);
        let pool = BufferPool::new();
        let mut count = 0;
        scan(&view, &pool, [0, 0, 0], [0, 0xFF, 0xFF], |_, _| {
            count += 1;
            false
        })
        .unwrap();
        assert_eq!(count, 0);
    }
}
