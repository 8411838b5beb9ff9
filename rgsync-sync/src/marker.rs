//! Timestamp marker — the single point-in-time value persisted across a run.
//!
//! Written once when the editor session starts, deleted once when it ends.
//! The next run's change detection compares container mtimes against it;
//! an absent marker means "now", so a marker-less run never considers a
//! file stale purely by time (artifact-missing checks still force export).
//!
//! Writes use the same atomic `.tmp` + rename pattern as the rest of the
//! pipeline's stores.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, SyncError};

/// Name of the marker file inside the project directory.
pub const MARKER_FILE: &str = "timestamp.json";

#[derive(Debug, Serialize, Deserialize)]
struct MarkerPayload {
    started_at: DateTime<Utc>,
}

/// `<project>/timestamp.json` — pure, no I/O.
pub fn marker_path(project_dir: &Path) -> PathBuf {
    project_dir.join(MARKER_FILE)
}

/// Persist the marker atomically.
pub fn store(project_dir: &Path, started_at: DateTime<Utc>) -> Result<(), SyncError> {
    let path = marker_path(project_dir);
    let json = serde_json::to_string_pretty(&MarkerPayload { started_at })?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

/// Load the marker, or `None` when no marker exists.
pub fn load(project_dir: &Path) -> Result<Option<DateTime<Utc>>, SyncError> {
    let path = marker_path(project_dir);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let payload: MarkerPayload = serde_json::from_str(&contents)?;
    Ok(Some(payload.started_at))
}

/// Delete the marker. Absence is not an error.
pub fn clear(project_dir: &Path) -> Result<(), SyncError> {
    let path = marker_path(project_dir);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(io_err(&path, err)),
    }
}

/// The reference time for change detection: the persisted marker, or "now"
/// when no marker exists.
pub fn reference_time(project_dir: &Path) -> Result<DateTime<Utc>, SyncError> {
    Ok(load(project_dir)?.unwrap_or_else(Utc::now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn store_load_clear_roundtrip() {
        let tmp = TempDir::new().expect("tempdir");
        let stamp = Utc::now();

        store(tmp.path(), stamp).expect("store");
        assert_eq!(load(tmp.path()).expect("load"), Some(stamp));

        clear(tmp.path()).expect("clear");
        assert_eq!(load(tmp.path()).expect("load"), None);
    }

    #[test]
    fn clear_tolerates_absent_marker() {
        let tmp = TempDir::new().expect("tempdir");
        clear(tmp.path()).expect("clear on empty dir");
    }

    #[test]
    fn tmp_file_cleaned_up_after_store() {
        let tmp = TempDir::new().expect("tempdir");
        store(tmp.path(), Utc::now()).expect("store");
        let leftover = marker_path(tmp.path()).with_extension("json.tmp");
        assert!(!leftover.exists(), "tmp file should be renamed away");
    }

    #[test]
    fn absent_marker_reads_as_now() {
        let tmp = TempDir::new().expect("tempdir");
        let before = Utc::now();
        let reference = reference_time(tmp.path()).expect("reference");
        let after = Utc::now();
        assert!(reference >= before && reference <= after);
    }
}
