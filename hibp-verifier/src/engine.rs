//! The hot-swap supervisor: owns the current backing view and coordinates
//! replacing it with an updated database file without ever handing a
//! concurrent reader a closed mapping.
//!
//! The state machine is:
//!
//! ```text
//! Opening ──► Serving ──► Swapping ──► Serving'
//!                            │
//!                            └──► Serving (on error, keep old)
//! ```
//!
//! Implemented here as: build the replacement [`MmapView`] in full *before*
//! touching anything shared, then one atomic [`ArcSwap::store`]. A reader
//! that already called [`Engine::pwned`]/[`Engine::scan`] holds its own
//! `Arc` to the view it loaded and keeps reading from it regardless of how
//! many swaps happen afterward; the old view is only dropped (and unmapped)
//! once its last reader releases it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

use arc_swap::ArcSwap;

use crate::error::Error;
use crate::pool::BufferPool;
use crate::view::{ByteView, MmapView};
use crate::{HASH_LEN, PREFIX_LEN, lookup, scan};

/// Well-known sibling filenames for the three files in the database
/// directory: the live database, a freshly-built replacement, and the
/// builder's exclusive lock.
const UPDATED_FILE_NAME: &str = "updated-pwned-passwords.bin";
const LOCK_FILE_NAME: &str = "pwned-passwords.lock";

/// Paths and timing knobs for an [`Engine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// The live database file, opened read-only and mapped.
    pub primary_path: PathBuf,
    /// Presence triggers a swap; renamed over `primary_path` before reopen.
    pub updated_path: PathBuf,
    /// Presence suppresses swaps and suppresses startup wait-for-missing-db.
    pub lock_path: PathBuf,
    /// How long to sleep between polls while waiting at startup for a
    /// primary file that doesn't exist yet. A coarse interval (tens of
    /// seconds) is appropriate; this only matters before first boot.
    pub startup_poll_interval: Duration,
    /// How often the background worker checks for an updated file.
    pub reload_interval: Duration,
}

impl EngineConfig {
    /// Derives `updated_path`/`lock_path` as siblings of `primary_path`
    /// using the well-known filenames, with the default polling cadence.
    pub fn new(primary_path: impl Into<PathBuf>) -> Self {
        let primary_path = primary_path.into();
        let dir = primary_path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        Self {
            updated_path: dir.join(UPDATED_FILE_NAME),
            lock_path: dir.join(LOCK_FILE_NAME),
            primary_path,
            startup_poll_interval: Duration::from_secs(60),
            reload_interval: Duration::from_secs(3600),
        }
    }
}

/// A boxed view behind one level of indirection so it can live inside an
/// `ArcSwap` of a concrete (sized) type.
struct ViewHandle(Arc<dyn ByteView>);

impl ViewHandle {
    fn as_view(&self) -> &dyn ByteView {
        &*self.0
    }
}

/// The lookup engine: current database view plus the machinery to swap it.
pub struct Engine {
    current: ArcSwap<ViewHandle>,
    config: EngineConfig,
    pool: BufferPool,
}

impl Engine {
    /// Runs the startup sequence and opens the engine:
    ///
    /// 1. If the lock file exists and the primary doesn't, wait for the
    ///    primary to appear.
    /// 2. If an updated file is present and no lock exists, rename it over
    ///    the primary before opening.
    /// 3. Open and map the primary file, and publish it as current.
    pub fn open(config: EngineConfig) -> Result<Arc<Self>, Error> {
        Self::wait_for_primary(&config);
        Self::rename_updated_if_present(&config)?;

        let view = MmapView::open(&config.primary_path)?;
        let handle = ViewHandle(Arc::new(view));

        Ok(Arc::new(Self { current: ArcSwap::new(Arc::new(handle)), config, pool: BufferPool::new() }))
    }

    fn wait_for_primary(config: &EngineConfig) {
        while config.lock_path.exists() && !config.primary_path.exists() {
            tracing::debug!(
                lock = %config.lock_path.display(),
                primary = %config.primary_path.display(),
                "builder lock present and no database yet; waiting"
            );
            std::thread::sleep(config.startup_poll_interval);
        }
    }

    fn rename_updated_if_present(config: &EngineConfig) -> Result<(), Error> {
        if config.updated_path.exists() && !config.lock_path.exists() {
            std::fs::rename(&config.updated_path, &config.primary_path)?;
        }
        Ok(())
    }

    /// Returns the stored frequency for `hash`, or `0` if absent.
    pub fn pwned(&self, hash: &[u8; HASH_LEN]) -> Result<u32, Error> {
        let guard = self.current.load();
        lookup::pwned(guard.as_view(), hash)
    }

    /// Visits every record with prefix in `[start, end]` in ascending order.
    /// See [`crate::scan::scan`] for the full contract.
    pub fn scan<F>(&self, start: [u8; PREFIX_LEN], end: [u8; PREFIX_LEN], cb: F) -> Result<(), Error>
    where
        F: FnMut(&[u8; HASH_LEN], u16) -> bool,
    {
        let guard = self.current.load();
        scan::scan(guard.as_view(), &self.pool, start, end, cb)
    }

    /// Attempts one reload: if an updated file is present and unlocked,
    /// renames it over the primary, reopens, and publishes it. Returns
    /// `Ok(true)` if a swap happened, `Ok(false)` if there was nothing to
    /// do (no update pending, or a build lock is held).
    ///
    /// On failure the current view is left untouched — the caller never
    /// observes the engine with a closed view and no replacement.
    fn reload_once(&self) -> Result<bool, Error> {
        if !self.config.updated_path.exists() || self.config.lock_path.exists() {
            return Ok(false);
        }

        std::fs::rename(&self.config.updated_path, &self.config.primary_path).map_err(|e| {
            Error::UpdateFailure { path: self.config.primary_path.clone(), reason: e.to_string() }
        })?;

        let view = MmapView::open(&self.config.primary_path).map_err(|e| Error::UpdateFailure {
            path: self.config.primary_path.clone(),
            reason: e.to_string(),
        })?;

        self.current.store(Arc::new(ViewHandle(Arc::new(view))));
        Ok(true)
    }

    fn try_reload(&self) {
        match self.reload_once() {
            Ok(true) => {
                tracing::info!(path = %self.config.primary_path.display(), "swapped in updated database");
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!(error = %e, "reload failed; continuing to serve the current database");
            }
        }
    }

    /// Spawns a single dedicated worker that wakes on a fixed interval to
    /// check for an updated database, returning a handle that stops it
    /// cleanly on drop or on [`ReloadWorker::stop`].
    pub fn spawn_reload_worker(self: &Arc<Self>) -> ReloadWorker {
        let (stop_tx, stop_rx) = mpsc::channel();
        let engine = Arc::clone(self);
        let interval = self.config.reload_interval;

        let handle = std::thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => engine.try_reload(),
            }
        });

        ReloadWorker { stop_tx: Some(stop_tx), handle: Some(handle) }
    }

    #[cfg(feature = "tokio")]
    /// Async wrapper around [`Engine::pwned`] for callers (e.g. the HTTP
    /// adapter) that can't afford to block their executor thread on a page
    /// fault; runs the lookup on `spawn_blocking` rather than wrapping each
    /// read in its own async file op.
    pub async fn pwned_async(self: &Arc<Self>, hash: [u8; HASH_LEN]) -> Result<u32, Error> {
        let engine = Arc::clone(self);
        tokio::task::spawn_blocking(move || engine.pwned(&hash))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }
}

/// Handle to the background reload thread; stops it on drop.
pub struct ReloadWorker {
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ReloadWorker {
    /// Signals the worker to stop and waits for it to exit.
    pub fn stop(mut self) {
        self.stop_inner();
    }

    fn stop_inner(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ReloadWorker {
    fn drop(&mut self) {
        self.stop_inner();
    }
}
