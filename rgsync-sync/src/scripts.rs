//! Script container synchronization.
//!
//! Import (phase `start`) rebuilds the binary container from the export
//! digest plus the individual script files; export (phase `exit`) splits
//! the container back out into the digest and one text file per non-empty
//! entry. Filenames are derived only on export — import trusts the digest.

use std::io::ErrorKind;

use rgsync_codec::{container, manifest};
use rgsync_core::{ProjectContext, ScriptEntry};

use crate::error::{io_err, SyncError};
use crate::staleness;
use crate::SyncOutcome;

/// Width of the filename column in progress lines.
const FILENAME_WIDTH: usize = 35;

/// Rebuild the script container from exported text files (text → binary).
///
/// Per-entry missing files are reported and substituted with empty content;
/// the batch never aborts on them. An absent scripts directory or digest is
/// a normal "nothing to import" state.
pub fn import(ctx: &ProjectContext) -> Result<SyncOutcome, SyncError> {
    let scripts_dir = ctx.scripts_dir();
    if !scripts_dir.is_dir() {
        tracing::info!(
            "scripts directory {} does not exist; nothing to import",
            scripts_dir.display()
        );
        return Ok(SyncOutcome::Skipped {
            reason: "scripts directory missing".to_string(),
        });
    }

    let data_dir = ctx.data_dir();
    if !data_dir.is_dir() {
        return Err(SyncError::MissingDirectory {
            path: data_dir,
            role: "data output",
        });
    }

    let digest_path = scripts_dir.join(manifest::DIGEST_FILE);
    if !digest_path.exists() {
        tracing::info!("no scripts to import");
        return Ok(SyncOutcome::Skipped {
            reason: "export digest missing".to_string(),
        });
    }

    let digest_text =
        std::fs::read_to_string(&digest_path).map_err(|e| io_err(&digest_path, e))?;
    let records = manifest::read(&digest_text)?;
    let total = records.iter().filter(|r| !r.is_empty()).count();

    let mut entries = Vec::with_capacity(records.len());
    let mut imported = 0usize;
    for record in &records {
        let mut content = Vec::new();
        if !record.is_empty() {
            let path = scripts_dir.join(&record.filename);
            match std::fs::read(&path) {
                Ok(bytes) => content = bytes,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    // A digest entry without its file usually means a new
                    // script that was never committed; keep the slot with
                    // empty content so ids and order survive.
                    tracing::error!(
                        "missing script file {}; importing empty content",
                        path.display()
                    );
                }
                Err(err) => return Err(io_err(&path, err)),
            }
            imported += 1;
            tracing::info!(
                "Imported {:<width$}({:03}/{:03})",
                record.filename,
                imported,
                total,
                width = FILENAME_WIDTH
            );
        }
        entries.push(ScriptEntry {
            id: record.id,
            label: record.label.clone(),
            content,
        });
    }

    let binary = container::join_scripts(&entries)?;
    let out_path = ctx.script_container();
    std::fs::write(&out_path, binary).map_err(|e| io_err(&out_path, e))?;

    Ok(SyncOutcome::Completed {
        processed: entries.len(),
    })
}

/// Split the script container into the digest and per-entry text files
/// (binary → text).
///
/// The container is the authoritative source: its absence is fatal. The
/// whole pass is skipped when the container has not changed since the
/// marker and a digest already exists at the destination.
pub fn export(ctx: &ProjectContext) -> Result<SyncOutcome, SyncError> {
    let data_dir = ctx.data_dir();
    if !data_dir.is_dir() {
        return Err(SyncError::MissingDirectory {
            path: data_dir,
            role: "data source",
        });
    }

    let container_path = ctx.script_container();
    if !container_path.exists() {
        return Err(SyncError::MissingContainer {
            path: container_path,
        });
    }

    let scripts_dir = ctx.scripts_dir();
    std::fs::create_dir_all(&scripts_dir).map_err(|e| io_err(&scripts_dir, e))?;
    let digest_path = scripts_dir.join(manifest::DIGEST_FILE);

    if !staleness::modified_since(&container_path, ctx.reference_time)? && digest_path.exists() {
        tracing::info!("no scripts need to be exported");
        return Ok(SyncOutcome::Skipped {
            reason: "container unchanged since marker".to_string(),
        });
    }

    let bytes = std::fs::read(&container_path).map_err(|e| io_err(&container_path, e))?;
    let entries = container::split_scripts(&bytes)?;
    let records = manifest::records_for(&entries);

    std::fs::write(&digest_path, manifest::write(&records))
        .map_err(|e| io_err(&digest_path, e))?;

    let total = records.iter().filter(|r| !r.is_empty()).count();
    let mut exported = 0usize;
    for (entry, record) in entries.iter().zip(&records) {
        if record.is_empty() {
            continue;
        }
        let path = scripts_dir.join(&record.filename);
        std::fs::write(&path, &entry.content).map_err(|e| io_err(&path, e))?;
        exported += 1;
        tracing::info!(
            "Exported {:<width$}({:03}/{:03})",
            record.filename,
            exported,
            total,
            width = FILENAME_WIDTH
        );
    }

    Ok(SyncOutcome::Completed {
        processed: entries.len(),
    })
}
