//! Subcommand implementations.

pub mod export;
pub mod import;
pub mod start;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use rgsync_core::{settings, ProjectContext};
use rgsync_sync::marker;

/// Route library log output through env_logger. The `verbose` setting maps
/// to per-entry progress at `info`; `RUST_LOG` still takes precedence.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .format_target(false)
        .try_init()
        .ok();
}

/// Load settings and assemble the context for one phase run.
pub fn load_context(
    project_dir: &Path,
    reference_time: DateTime<Utc>,
) -> Result<ProjectContext> {
    let settings = settings::load(project_dir)
        .with_context(|| format!("cannot load {}", settings::config_path(project_dir).display()))?;
    init_logging(settings.verbose);
    Ok(ProjectContext::new(project_dir, settings, reference_time))
}

/// Context whose reference time comes from the persisted marker, or "now"
/// when no marker exists.
pub fn load_context_from_marker(project_dir: &Path) -> Result<ProjectContext> {
    let reference_time = marker::reference_time(project_dir).context("cannot read marker")?;
    load_context(project_dir, reference_time)
}
