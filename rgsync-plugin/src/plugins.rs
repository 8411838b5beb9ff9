//! Built-in synchronizer plugins.
//!
//! Declared ordering: data runs before scripts in the start phase and
//! after scripts in the exit phase. Plugins hold no state of their own;
//! everything they need arrives through the [`ProjectContext`].

use rgsync_core::{Phase, ProjectContext};
use rgsync_sync::{data, scripts};

use crate::error::PluginError;
use crate::runtime::{ConstraintDecl, Plugin, PluginSpec, Relation};

pub const SCRIPT_SYNCHRONIZER: &str = "ScriptSynchronizer";
pub const DATA_SYNCHRONIZER: &str = "DataSynchronizer";

/// Imports and exports the script container and its digest.
pub struct ScriptSynchronizer;

impl Plugin for ScriptSynchronizer {
    fn on_start(&mut self, ctx: &ProjectContext) -> Result<(), PluginError> {
        scripts::import(ctx)?;
        Ok(())
    }

    fn on_exit(&mut self, ctx: &ProjectContext) -> Result<(), PluginError> {
        scripts::export(ctx)?;
        Ok(())
    }
}

/// Imports and exports the generic data containers.
pub struct DataSynchronizer;

impl Plugin for DataSynchronizer {
    fn on_start(&mut self, ctx: &ProjectContext) -> Result<(), PluginError> {
        data::import(ctx)?;
        Ok(())
    }

    fn on_exit(&mut self, ctx: &ProjectContext) -> Result<(), PluginError> {
        data::export(ctx)?;
        Ok(())
    }
}

/// The specs for every plugin compiled into this build.
pub fn builtin_specs() -> Vec<PluginSpec> {
    vec![
        PluginSpec {
            name: SCRIPT_SYNCHRONIZER,
            constraints: &[],
            build: || Box::new(ScriptSynchronizer),
        },
        PluginSpec {
            name: DATA_SYNCHRONIZER,
            constraints: &[
                ConstraintDecl {
                    phase: Phase::Start,
                    relation: Relation::Before,
                    other: SCRIPT_SYNCHRONIZER,
                },
                ConstraintDecl {
                    phase: Phase::Exit,
                    relation: Relation::After,
                    other: SCRIPT_SYNCHRONIZER,
                },
            ],
            build: || Box::new(DataSynchronizer),
        },
    ]
}
