//! `rgsync export` — run the exit phase (binary → text) without a session.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use rgsync_core::Phase;
use rgsync_plugin::PluginRuntime;

/// Arguments for `rgsync export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Project directory containing Game.yaml.
    pub project_dir: PathBuf,
}

impl ExportArgs {
    pub fn run(self) -> Result<()> {
        // Change detection uses the marker if a session left one behind;
        // otherwise everything with a missing artifact is exported.
        let ctx = super::load_context_from_marker(&self.project_dir)?;
        let runtime = PluginRuntime::builtin();
        let executed = runtime
            .run_phase(Phase::Exit, &ctx)
            .context("export phase failed")?;
        println!(
            "{} exported via {}",
            "✓".green(),
            executed.join(", ")
        );
        Ok(())
    }
}
