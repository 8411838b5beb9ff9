//! Generic data container synchronization.
//!
//! Containers are processed at whole-file granularity: one `*.<data_ext>`
//! file pairs with one `*.yaml` artifact by base name, no manifest. Files
//! are handled in sorted order; the ignore list matches exact filenames.

use std::path::Path;

use rgsync_codec::{container, text};
use rgsync_core::settings::NO_OVERRIDE;
use rgsync_core::{ProjectContext, Settings, Value};

use crate::error::{io_err, SyncError};
use crate::staleness;
use crate::SyncOutcome;

const NAME_WIDTH: usize = 30;

/// Export changed data containers to YAML artifacts (binary → text).
pub fn export(ctx: &ProjectContext) -> Result<SyncOutcome, SyncError> {
    let data_dir = ctx.data_dir();
    if !data_dir.is_dir() {
        return Err(SyncError::MissingDirectory {
            path: data_dir,
            role: "data source",
        });
    }
    let yaml_dir = ctx.yaml_dir();
    std::fs::create_dir_all(&yaml_dir).map_err(|e| io_err(&yaml_dir, e))?;

    let mut names = Vec::new();
    for name in list_files(&data_dir, &ctx.settings.data_ext)? {
        if ctx.settings.data_ignore_list.contains(&name) {
            continue;
        }
        let source = data_dir.join(&name);
        let artifact = ctx.text_artifact_for(&name);
        if staleness::check(&source, &artifact, ctx.reference_time)? {
            names.push(name);
        }
    }

    if names.is_empty() {
        tracing::info!("no data files need to be exported");
        return Ok(SyncOutcome::Skipped {
            reason: "no data containers changed".to_string(),
        });
    }

    let system_name = ctx.system_container_name();
    for (index, name) in names.iter().enumerate() {
        let source = data_dir.join(name);
        let bytes = std::fs::read(&source).map_err(|e| io_err(&source, e))?;
        let mut root = container::read_root(&bytes)?;

        if *name == system_name {
            apply_system_overrides(&mut root, &ctx.settings);
        }

        let artifact = ctx.text_artifact_for(name);
        let yaml = text::to_string(&text::wrap_root(root))?;
        std::fs::write(&artifact, yaml).map_err(|e| io_err(&artifact, e))?;

        tracing::info!(
            "Exported {:<width$}({:03}/{:03})",
            name,
            index + 1,
            names.len(),
            width = NAME_WIDTH
        );
    }

    Ok(SyncOutcome::Completed {
        processed: names.len(),
    })
}

/// Import YAML artifacts back into data containers (text → binary).
pub fn import(ctx: &ProjectContext) -> Result<SyncOutcome, SyncError> {
    let yaml_dir = ctx.yaml_dir();
    if !yaml_dir.is_dir() {
        tracing::info!(
            "text directory {} does not exist; nothing to import",
            yaml_dir.display()
        );
        return Ok(SyncOutcome::Skipped {
            reason: "text directory missing".to_string(),
        });
    }

    let data_dir = ctx.data_dir();
    if !data_dir.is_dir() {
        return Err(SyncError::MissingDirectory {
            path: data_dir,
            role: "data output",
        });
    }

    let names = list_files(&yaml_dir, "yaml")?;
    if names.is_empty() {
        tracing::info!("no data files to import");
        return Ok(SyncOutcome::Skipped {
            reason: "no text artifacts present".to_string(),
        });
    }

    for (index, name) in names.iter().enumerate() {
        let source = yaml_dir.join(name);
        let yaml = std::fs::read_to_string(&source).map_err(|e| io_err(&source, e))?;
        let root = text::unwrap_root(text::from_str(&yaml)?)?;

        let stem = Path::new(name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        let target = data_dir.join(format!("{stem}.{}", ctx.settings.data_ext));
        std::fs::write(&target, container::write_root(&root)?)
            .map_err(|e| io_err(&target, e))?;

        tracing::info!(
            "Imported {:<width$}({:03}/{:03})",
            name,
            index + 1,
            names.len(),
            width = NAME_WIDTH
        );
    }

    Ok(SyncOutcome::Completed {
        processed: names.len(),
    })
}

/// Sorted filenames in `dir` with the given extension. Editor backup files
/// (leading `._`) are excluded.
fn list_files(dir: &Path, extension: &str) -> Result<Vec<String>, SyncError> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with("._") {
            continue;
        }
        if Path::new(&name)
            .extension()
            .map(|e| e == extension)
            .unwrap_or(false)
        {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Force-set the System container's environment-sensitive fields so
/// editor-generated identifiers stop producing spurious diffs. The
/// sentinel `-1` leaves a field untouched.
fn apply_system_overrides(root: &mut Value, settings: &Settings) {
    if settings.magic_number != NO_OVERRIDE {
        root.set_field("magic_number", Value::Int(settings.magic_number));
    }
    if settings.edit_map_id != NO_OVERRIDE {
        root.set_field("edit_map_id", Value::Int(settings.edit_map_id));
    }
}
