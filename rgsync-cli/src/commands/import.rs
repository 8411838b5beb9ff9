//! `rgsync import` — run the start phase (text → binary) without a session.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use rgsync_core::Phase;
use rgsync_plugin::PluginRuntime;

/// Arguments for `rgsync import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Project directory containing Game.yaml.
    pub project_dir: PathBuf,
}

impl ImportArgs {
    pub fn run(self) -> Result<()> {
        let ctx = super::load_context(&self.project_dir, chrono::Utc::now())?;
        let runtime = PluginRuntime::builtin();
        let executed = runtime
            .run_phase(Phase::Start, &ctx)
            .context("import phase failed")?;
        println!(
            "{} imported via {}",
            "✓".green(),
            executed.join(", ")
        );
        Ok(())
    }
}
