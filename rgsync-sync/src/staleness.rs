//! Change detection: does a source container need re-export?
//!
//! A source is exported when its paired text artifact is missing, or when
//! its mtime is strictly newer than the reference time (the marker written
//! at session start). With no marker, the reference is "now" — nothing is
//! stale purely by time, but missing artifacts still force export.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{io_err, SyncError};

/// The core predicate, pure over its inputs.
pub fn needs_export(
    source_mtime: DateTime<Utc>,
    artifact_exists: bool,
    reference_time: DateTime<Utc>,
) -> bool {
    !artifact_exists || source_mtime > reference_time
}

/// Last-modified time of a file as a UTC timestamp.
pub fn mtime(path: &Path) -> Result<DateTime<Utc>, SyncError> {
    let meta = std::fs::metadata(path).map_err(|e| io_err(path, e))?;
    let modified = meta.modified().map_err(|e| io_err(path, e))?;
    Ok(DateTime::<Utc>::from(modified))
}

/// Whether `path` was modified strictly after `reference`.
pub fn modified_since(path: &Path, reference: DateTime<Utc>) -> Result<bool, SyncError> {
    Ok(mtime(path)? > reference)
}

/// [`needs_export`] with the mtime and existence checks performed here.
pub fn check(
    source: &Path,
    artifact: &Path,
    reference_time: DateTime<Utc>,
) -> Result<bool, SyncError> {
    Ok(needs_export(mtime(source)?, artifact.exists(), reference_time))
}
