//! rgsync — versionable text synchronization for game project containers.
//!
//! # Usage
//!
//! ```text
//! rgsync start <project_dir> [--editor <command>]
//! rgsync import <project_dir>
//! rgsync export <project_dir>
//! ```
//!
//! `start` runs the full lifecycle: the start-phase plugins (text → binary),
//! the external editor session, then the exit-phase plugins (binary → text).
//! `import` and `export` run a single phase without a session.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{import::ImportArgs, export::ExportArgs, start::StartArgs};

#[derive(Parser, Debug)]
#[command(
    name = "rgsync",
    version,
    about = "Sync binary game data containers with versionable text artifacts",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full lifecycle around an external editor session.
    Start(StartArgs),

    /// Import text artifacts back into binary containers (start phase only).
    Import(ImportArgs),

    /// Export binary containers to text artifacts (exit phase only).
    Export(ExportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Start(args) => args.run(),
        Commands::Import(args) => args.run(),
        Commands::Export(args) => args.run(),
    }
}
