//! rgsync core library — domain types, the structured value tree, project
//! settings, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs shared across the workspace
//! - [`value`] — the structured value tree stored inside data containers
//! - [`settings`] — `Game.yaml` project settings
//! - [`error`] — [`SettingsError`]

pub mod error;
pub mod settings;
pub mod types;
pub mod value;

pub use error::SettingsError;
pub use settings::Settings;
pub use types::{ManifestRecord, Phase, ProjectContext, ScriptEntry};
pub use value::Value;
