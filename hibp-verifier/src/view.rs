//! Random-access read-only views over the database file.
//!
//! [`MmapView`] is the production backing (page-cache-friendly, zero-copy
//! reads via `memmap2`). [`HeapView`] is a heap-backed stand-in used by
//! tests that synthesize small databases in memory, keeping storage
//! swappable behind a narrow trait rather than threading raw slices through
//! the lookup/scan code.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::Error;

/// A fixed-size, read-only, random-access byte region.
///
/// `read_at` is the only I/O primitive the index/lookup/scan code needs;
/// keeping it as a method (rather than exposing the backing slice directly)
/// means a `HeapView` and an `MmapView` are interchangeable in tests.
pub trait ByteView: Send + Sync {
    /// Fills `dst` from `self[offset..offset + dst.len()]`.
    ///
    /// Fails with [`Error::Io`] if the read would run past the end of the
    /// view.
    fn read_at(&self, dst: &mut [u8], offset: u64) -> Result<(), Error>;

    /// Total length of the view in bytes.
    fn len(&self) -> u64;

    /// Returns `true` if the view has zero length.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn bounds_check(view_len: u64, dst_len: usize, offset: u64) -> Result<(), Error> {
    let end = offset
        .checked_add(dst_len as u64)
        .ok_or_else(|| short_read_error(offset, dst_len))?;
    if end > view_len {
        return Err(short_read_error(offset, dst_len));
    }
    Ok(())
}

fn short_read_error(offset: u64, len: usize) -> Error {
    Error::Io(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        format!("short read: offset {offset} len {len} exceeds view bounds"),
    ))
}

/// A memory-mapped, read-only view over a file on disk.
///
/// `close()` has no separate method here: dropping the last `Arc` around a
/// `MmapView` unmaps it. Callers that need outstanding reads to finish
/// before the mapping goes away get that for free from ownership — see
/// [`crate::engine::Engine`], which only ever drops a view after publishing
/// its replacement.
pub struct MmapView {
    mmap: Mmap,
}

impl MmapView {
    /// Opens and maps `path` read-only.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        // SAFETY: the file is not expected to be truncated or modified in
        // place while mapped; updates to the corpus arrive as a whole new
        // file that gets renamed over this one, never an in-place write.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self { mmap })
    }
}

impl ByteView for MmapView {
    fn read_at(&self, dst: &mut [u8], offset: u64) -> Result<(), Error> {
        bounds_check(self.mmap.len() as u64, dst.len(), offset)?;
        let start = offset as usize;
        dst.copy_from_slice(&self.mmap[start..start + dst.len()]);
        Ok(())
    }

    fn len(&self) -> u64 {
        self.mmap.len() as u64
    }
}

/// An owned, heap-backed view, for tests that synthesize small databases.
pub struct HeapView {
    bytes: Vec<u8>,
}

impl HeapView {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl ByteView for HeapView {
    fn read_at(&self, dst: &mut [u8], offset: u64) -> Result<(), Error> {
        bounds_check(self.bytes.len() as u64, dst.len(), offset)?;
        let start = offset as usize;
        dst.copy_from_slice(&self.bytes[start..start + dst.len()]);
        Ok(())
    }

    fn len(&self) -> u64 {
        self.bytes.len() as u64
    }
}
