//! Domain types shared across the rgsync workspace.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// One of the two lifecycle points around the external editor session.
///
/// Plugin ordering constraints are scoped to a single phase; the two phases
/// keep fully independent constraint sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Before the editor launches — text artifacts are imported back into
    /// binary containers.
    Start,
    /// After the editor exits — binary containers are exported to text.
    Exit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Start => write!(f, "start"),
            Phase::Exit => write!(f, "exit"),
        }
    }
}

// ---------------------------------------------------------------------------
// Script container entries
// ---------------------------------------------------------------------------

/// One addressable unit inside the script container.
///
/// `content` holds the *decompressed* script text bytes; compression is a
/// storage detail of the container, not of the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    pub id: i64,
    pub label: String,
    pub content: Vec<u8>,
}

/// One line of the export digest: entry identity plus the filename its text
/// was written to, or the `EMPTY` sentinel for entries with no content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    pub id: i64,
    pub label: String,
    pub filename: String,
}

impl ManifestRecord {
    /// Whether this record is the `EMPTY` sentinel (no backing file).
    /// The comparison is case-insensitive, matching the digest format.
    pub fn is_empty(&self) -> bool {
        self.filename.eq_ignore_ascii_case(crate::types::EMPTY_SENTINEL)
    }
}

/// Digest filename sentinel for entries with empty content.
pub const EMPTY_SENTINEL: &str = "EMPTY";

// ---------------------------------------------------------------------------
// ProjectContext
// ---------------------------------------------------------------------------

/// Everything a sync operation needs to know about the project being
/// processed: where it lives, its settings, and the reference time for
/// change detection.
///
/// Plugins are re-instantiated per phase; any state shared between the
/// `start` and `exit` hooks travels through this context instead of plugin
/// instance fields.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Absolute path to the project root on disk.
    pub project_dir: PathBuf,
    pub settings: Settings,
    /// Marker timestamp from the previous run, or "now" when no marker
    /// exists. Sources older than this are not re-exported unless their
    /// text artifact is missing.
    pub reference_time: DateTime<Utc>,
}

impl ProjectContext {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        settings: Settings,
        reference_time: DateTime<Utc>,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            settings,
            reference_time,
        }
    }

    /// `<project>/<rxdata_dir>` — the authoritative binary container directory.
    pub fn data_dir(&self) -> PathBuf {
        self.project_dir.join(&self.settings.rxdata_dir)
    }

    /// `<project>/<yaml_dir>` — text artifacts for generic data containers.
    pub fn yaml_dir(&self) -> PathBuf {
        self.project_dir.join(&self.settings.yaml_dir)
    }

    /// `<project>/<scripts_dir>` — exported script files plus the digest.
    pub fn scripts_dir(&self) -> PathBuf {
        self.project_dir.join(&self.settings.scripts_dir)
    }

    /// `<data_dir>/Scripts.<data_ext>` — the script container file.
    pub fn script_container(&self) -> PathBuf {
        self.data_dir()
            .join(format!("Scripts.{}", self.settings.data_ext))
    }

    /// Name of the system-configuration container (`System.<data_ext>`),
    /// the one container subject to the field-override policy.
    pub fn system_container_name(&self) -> String {
        format!("System.{}", self.settings.data_ext)
    }

    /// Path of the text artifact paired with a data container file name.
    pub fn text_artifact_for(&self, container_name: &str) -> PathBuf {
        let stem = Path::new(container_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| container_name.to_string());
        self.yaml_dir().join(format!("{stem}.yaml"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
