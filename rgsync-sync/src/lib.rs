//! # rgsync-sync
//!
//! Bidirectional synchronization between binary containers and text
//! artifacts, gated by marker-based change detection.
//!
//! [`scripts`] handles the script container (ordered entries + export
//! digest); [`data`] handles generic data containers at whole-file
//! granularity. Both run synchronously and process files in sorted order —
//! concurrent runs against one project directory are undefined behavior.

pub mod data;
pub mod error;
pub mod marker;
pub mod scripts;
pub mod staleness;

pub use error::SyncError;

/// Outcome of one import or export pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The pass ran; `processed` counts the entries or files handled.
    Completed { processed: usize },
    /// Nothing to do — a normal, non-fatal state (missing text source,
    /// absent manifest, or no change since the marker).
    Skipped { reason: String },
}
