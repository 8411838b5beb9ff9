//! # rgsync-plugin
//!
//! Constraint-ordered plugin scheduling around the editor session.
//!
//! Plugins self-declare "run before X" / "run after X" constraints per
//! lifecycle phase; [`graph::ConstraintGraph`] linearizes them and
//! [`runtime::PluginRuntime`] drives the hooks in resolved order. The
//! registry is static — plugins are compiled in and enumerated explicitly,
//! never discovered by evaluating code at runtime.

pub mod error;
pub mod graph;
pub mod plugins;
pub mod runtime;

pub use error::PluginError;
pub use graph::ConstraintGraph;
pub use runtime::{ConstraintDecl, Plugin, PluginRuntime, PluginSpec, Relation};
