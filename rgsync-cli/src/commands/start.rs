//! `rgsync start` — the full edit-session lifecycle.
//!
//! Import the text artifacts into binary containers, record the session
//! marker, hand off to the external editor, and once the editor exits,
//! export whatever the session touched back to text.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use rgsync_core::Phase;
use rgsync_plugin::PluginRuntime;
use rgsync_sync::marker;

/// Arguments for `rgsync start`.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Project directory containing Game.yaml.
    pub project_dir: PathBuf,

    /// Editor command to run for the session, overriding `editor_command`
    /// from Game.yaml.
    #[arg(long)]
    pub editor: Option<String>,
}

impl StartArgs {
    pub fn run(self) -> Result<()> {
        let ctx = super::load_context_from_marker(&self.project_dir)?;

        let editor = match self.editor.or_else(|| ctx.settings.editor_command.clone()) {
            Some(cmd) => cmd,
            None => bail!(
                "no editor configured: set `editor_command` in Game.yaml or pass --editor"
            ),
        };

        let runtime = PluginRuntime::builtin();
        runtime
            .run_phase(Phase::Start, &ctx)
            .context("start phase failed")?;

        // Everything the editor saves after this instant is newer than the
        // marker and will be exported on exit.
        marker::store(&self.project_dir, chrono::Utc::now()).context("cannot write marker")?;
        println!("{} session started: {}", "✓".green(), editor.bold());

        let status = shell_command(&editor)
            .current_dir(&self.project_dir)
            .status()
            .with_context(|| format!("cannot launch editor `{editor}`"))?;
        if !status.success() {
            log::warn!("editor exited with {status}; exporting anyway");
        }

        // Fresh context so the exit phase reads the marker written above.
        let ctx = super::load_context_from_marker(&self.project_dir)?;
        runtime
            .run_phase(Phase::Exit, &ctx)
            .context("exit phase failed")?;

        marker::clear(&self.project_dir).context("cannot clear marker")?;
        println!("{} session finished", "✓".green());
        Ok(())
    }
}

/// Run the configured editor line through the platform shell so users can
/// write `"editor.exe Game.rxproj"` style commands verbatim.
fn shell_command(line: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(line);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    }
}
