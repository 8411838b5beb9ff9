//! Error types for rgsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use rgsync_codec::CodecError;

/// All errors that can arise from sync operations.
///
/// Structural errors (missing authoritative sources) are fatal and stop the
/// run; per-entry content errors are reported by the engines and never
/// surface here.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the container/text codecs.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An authoritative directory was absent where the operation requires it.
    #[error("required {role} directory {path} is missing")]
    MissingDirectory { path: PathBuf, role: &'static str },

    /// The authoritative script container was absent on export.
    #[error("script container {path} is missing")]
    MissingContainer { path: PathBuf },

    /// JSON serialization/deserialization error (timestamp marker).
    #[error("marker JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
