//! A tiny pool of reusable scan buffers.
//!
//! [`scan`](crate::scan::scan) reads a whole bucket per prefix into one of
//! these buffers rather than allocating fresh `Vec`s on the hot path. Most
//! buckets are well under 8 KiB (≈430 records); a buffer grows on demand
//! and is returned to the pool — grown — on drop, so a handful of
//! unusually large buckets don't force every later scan to pay for the
//! growth again.

use parking_lot::Mutex;

/// Default capacity for a freshly-allocated scan buffer: 8 KiB, enough for
/// roughly 430 records before a grow is needed.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// A pool of byte buffers, checked out via [`BufferPool::acquire`].
pub struct BufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self { buffers: Mutex::new(Vec::new()) }
    }

    /// Checks out a buffer, allocating a fresh one if the pool is empty.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self.buffers.lock().pop().unwrap_or_else(|| Vec::with_capacity(DEFAULT_BUFFER_CAPACITY));
        PooledBuffer { buf: Some(buf), pool: self }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// An RAII handle around a pooled `Vec<u8>`; returns the buffer to the pool
/// (keeping any capacity it grew into) when dropped.
pub struct PooledBuffer<'a> {
    buf: Option<Vec<u8>>,
    pool: &'a BufferPool,
}

impl<'a> std::ops::Deref for PooledBuffer<'a> {
    type Target = Vec<u8>;
    fn deref(&self) -> &Vec<u8> {
        self.buf.as_ref().expect("buffer taken before drop")
    }
}

impl<'a> std::ops::DerefMut for PooledBuffer<'a> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        self.buf.as_mut().expect("buffer taken before drop")
    }
}

impl<'a> Drop for PooledBuffer<'a> {
    fn drop(&mut self) {
        if let Some(mut buf) = self.buf.take() {
            buf.clear();
            self.pool.buffers.lock().push(buf);
        }
    }
}
