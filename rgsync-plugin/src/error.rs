//! Error types for rgsync-plugin.

use thiserror::Error;

use rgsync_core::Phase;
use rgsync_sync::SyncError;

/// All errors that can arise from plugin scheduling and execution.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The constraint set for a phase contains a cycle — no valid execution
    /// order exists, so the phase cannot run at all.
    #[error("cyclic ordering constraints in the {phase} phase involving '{name}'")]
    CyclicConstraint { phase: Phase, name: String },

    /// A fatal error raised by a plugin hook; aborts the remaining phase.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),
}
