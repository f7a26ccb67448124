use std::path::PathBuf;

/// Failure modes surfaced by the lookup engine.
///
/// Absence of a hash is not an error: [`crate::Engine::pwned`] returns a
/// frequency of `0` for that case. These variants cover everything else:
/// corrupt/short reads, programmer error on the scan range, and the
/// supervisor's own bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error reading database: {0}")]
    Io(#[from] std::io::Error),

    #[error("scan range start {start:06x} is greater than end {end:06x}")]
    InvalidRange { start: u32, end: u32 },

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("failed to swap in updated database {path}: {reason}")]
    UpdateFailure { path: PathBuf, reason: String },
}
