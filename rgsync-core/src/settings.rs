//! Project settings loaded from `Game.yaml` in the project root.
//!
//! Recognized options mirror the tool's historical config file: the three
//! synchronized directories, an ignore list for data containers, a verbosity
//! flag, and the two System field overrides (sentinel `-1` = do not
//! override).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Name of the settings file inside the project directory.
pub const CONFIG_FILE: &str = "Game.yaml";

/// Sentinel for the override scalars meaning "do not override".
pub const NO_OVERRIDE: i64 = -1;

/// Scalar settings for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory of binary data containers, relative to the project root.
    pub rxdata_dir: String,
    /// Directory of text artifacts for data containers.
    pub yaml_dir: String,
    /// Directory of exported script files and the export digest.
    pub scripts_dir: String,

    /// Exact container filenames excluded from data synchronization.
    #[serde(default)]
    pub data_ignore_list: Vec<String>,

    /// Print per-entry progress lines.
    #[serde(default)]
    pub verbose: bool,

    /// Force the System container's `magic_number` field to this value on
    /// export, suppressing spurious diffs from editor-generated identifiers.
    /// `-1` disables the override.
    #[serde(default = "no_override")]
    pub magic_number: i64,

    /// Force the System container's `edit_map_id` field on export.
    /// `-1` disables the override.
    #[serde(default = "no_override")]
    pub edit_map_id: i64,

    /// Extension of the binary data containers (`rxdata`, `rvdata`, ...).
    #[serde(default = "default_data_ext")]
    pub data_ext: String,

    /// Command line used to launch the external editor from `rgsync start`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_command: Option<String>,
}

fn no_override() -> i64 {
    NO_OVERRIDE
}

fn default_data_ext() -> String {
    "rxdata".to_string()
}

impl Settings {
    /// Settings with the given directories and every optional field at its
    /// default. Convenient for tests and programmatic construction.
    pub fn with_dirs(
        rxdata_dir: impl Into<String>,
        yaml_dir: impl Into<String>,
        scripts_dir: impl Into<String>,
    ) -> Self {
        Self {
            rxdata_dir: rxdata_dir.into(),
            yaml_dir: yaml_dir.into(),
            scripts_dir: scripts_dir.into(),
            data_ignore_list: Vec::new(),
            verbose: false,
            magic_number: NO_OVERRIDE,
            edit_map_id: NO_OVERRIDE,
            data_ext: default_data_ext(),
            editor_command: None,
        }
    }
}

/// `<project>/Game.yaml` — pure, no I/O.
pub fn config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(CONFIG_FILE)
}

/// Load settings from `<project>/Game.yaml`.
///
/// Returns `SettingsError::SettingsNotFound` if absent,
/// `SettingsError::Parse` (with path + line context) if malformed YAML.
pub fn load(project_dir: &Path) -> Result<Settings, SettingsError> {
    let path = config_path(project_dir);
    if !path.exists() {
        return Err(SettingsError::SettingsNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| SettingsError::Parse { path, source: e })
}
