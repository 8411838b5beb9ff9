//! Plugin registry and lifecycle phase driver.
//!
//! A [`PluginSpec`] pairs a plugin's name with its declared ordering
//! constraints and a factory. The runtime owns the [`ConstraintGraph`]
//! built during discovery and, per phase, instantiates plugins fresh in
//! resolved order and invokes their hooks synchronously — later plugins
//! may depend on filesystem state produced by earlier ones, so there is
//! never concurrency between hooks.

use rgsync_core::{Phase, ProjectContext};

use crate::error::PluginError;
use crate::graph::ConstraintGraph;
use crate::plugins;

/// A lifecycle plugin. Hooks default to no-ops so a plugin may participate
/// in only one phase.
pub trait Plugin {
    fn on_start(&mut self, _ctx: &ProjectContext) -> Result<(), PluginError> {
        Ok(())
    }

    fn on_exit(&mut self, _ctx: &ProjectContext) -> Result<(), PluginError> {
        Ok(())
    }
}

/// Which side of a declared constraint the declaring plugin is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// "I run before `other`."
    Before,
    /// "I run after `other`."
    After,
}

/// One ordering constraint declared by a plugin.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintDecl {
    pub phase: Phase,
    pub relation: Relation,
    pub other: &'static str,
}

/// Static registry entry: name, declared constraints, factory.
pub struct PluginSpec {
    pub name: &'static str,
    pub constraints: &'static [ConstraintDecl],
    pub build: fn() -> Box<dyn Plugin>,
}

/// Owns the registered specs and their accumulated constraint graph.
pub struct PluginRuntime {
    specs: Vec<PluginSpec>,
    graph: ConstraintGraph,
}

impl PluginRuntime {
    /// Register `specs` and fold their declared constraints into an owned
    /// graph. Both `before` and `after` declarations normalize to the same
    /// (earlier, later) edge form.
    pub fn new(specs: Vec<PluginSpec>) -> Self {
        let mut graph = ConstraintGraph::new();
        for spec in &specs {
            graph.register(spec.name);
            for decl in spec.constraints {
                match decl.relation {
                    Relation::Before => graph.add_constraint(decl.phase, spec.name, decl.other),
                    Relation::After => graph.add_constraint(decl.phase, decl.other, spec.name),
                }
            }
        }
        Self { specs, graph }
    }

    /// Runtime with the built-in synchronizer plugins.
    pub fn builtin() -> Self {
        Self::new(plugins::builtin_specs())
    }

    /// The execution order for a phase, without running anything.
    pub fn resolve_order(&self, phase: Phase) -> Result<Vec<String>, PluginError> {
        self.graph.resolve_order(phase)
    }

    /// Resolve the phase order, instantiate each plugin fresh, and invoke
    /// its hook in sequence. Returns the names actually executed.
    ///
    /// A fatal hook error aborts the remaining phase. Names that appear
    /// only in constraints (no installed plugin) are skipped.
    pub fn run_phase(
        &self,
        phase: Phase,
        ctx: &ProjectContext,
    ) -> Result<Vec<String>, PluginError> {
        let order = self.resolve_order(phase)?;
        let mut executed = Vec::with_capacity(order.len());
        for name in &order {
            let Some(spec) = self.specs.iter().find(|s| s.name == name.as_str()) else {
                tracing::debug!("no plugin installed under '{name}'; skipping");
                continue;
            };
            tracing::debug!("running {name}.on_{phase}");
            let mut plugin = (spec.build)();
            match phase {
                Phase::Start => plugin.on_start(ctx)?,
                Phase::Exit => plugin.on_exit(ctx)?,
            }
            executed.push(name.clone());
        }
        Ok(executed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use chrono::Utc;
    use rgsync_core::Settings;

    // Hook invocations are recorded thread-locally because
    // `PluginSpec.build` is a plain fn pointer; each test runs on its own
    // thread, so recordings never cross tests.
    thread_local! {
        static CALLS: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    }

    fn recorded() -> Vec<&'static str> {
        CALLS.with(|calls| calls.borrow().clone())
    }

    struct Recorder(&'static str);

    impl Plugin for Recorder {
        fn on_start(&mut self, _ctx: &ProjectContext) -> Result<(), PluginError> {
            CALLS.with(|calls| calls.borrow_mut().push(self.0));
            Ok(())
        }

        fn on_exit(&mut self, _ctx: &ProjectContext) -> Result<(), PluginError> {
            CALLS.with(|calls| calls.borrow_mut().push(self.0));
            if self.0 == "faulty" {
                return Err(PluginError::CyclicConstraint {
                    phase: Phase::Exit,
                    name: "synthetic failure".to_string(),
                });
            }
            Ok(())
        }
    }

    fn ctx() -> ProjectContext {
        ProjectContext::new("/proj", Settings::with_dirs("Data", "YAML", "Scripts"), Utc::now())
    }

    fn specs() -> Vec<PluginSpec> {
        vec![
            PluginSpec {
                name: "second",
                constraints: &[ConstraintDecl {
                    phase: Phase::Start,
                    relation: Relation::After,
                    other: "first",
                }],
                build: || Box::new(Recorder("second")),
            },
            PluginSpec {
                name: "first",
                constraints: &[],
                build: || Box::new(Recorder("first")),
            },
        ]
    }

    #[test]
    fn hooks_run_in_resolved_order() {
        let runtime = PluginRuntime::new(specs());
        let executed = runtime.run_phase(Phase::Start, &ctx()).expect("run");
        assert_eq!(executed, vec!["first", "second"]);
        assert_eq!(recorded(), vec!["first", "second"]);
    }

    #[test]
    fn constraint_only_names_are_skipped() {
        let runtime = PluginRuntime::new(vec![PluginSpec {
            name: "real",
            constraints: &[ConstraintDecl {
                phase: Phase::Start,
                relation: Relation::After,
                other: "phantom",
            }],
            build: || Box::new(Recorder("real")),
        }]);
        let executed = runtime.run_phase(Phase::Start, &ctx()).expect("run");
        assert_eq!(executed, vec!["real"]);
    }

    #[test]
    fn fatal_hook_error_aborts_the_phase() {
        let runtime = PluginRuntime::new(vec![
            PluginSpec {
                name: "faulty",
                constraints: &[ConstraintDecl {
                    phase: Phase::Exit,
                    relation: Relation::Before,
                    other: "never_runs",
                }],
                build: || Box::new(Recorder("faulty")),
            },
            PluginSpec {
                name: "never_runs",
                constraints: &[],
                build: || Box::new(Recorder("never_runs")),
            },
        ]);

        assert!(runtime.run_phase(Phase::Exit, &ctx()).is_err());
        assert_eq!(recorded(), vec!["faulty"]);
    }

    #[test]
    fn cyclic_declarations_fail_before_any_hook_runs() {
        let runtime = PluginRuntime::new(vec![
            PluginSpec {
                name: "a",
                constraints: &[ConstraintDecl {
                    phase: Phase::Start,
                    relation: Relation::Before,
                    other: "b",
                }],
                build: || Box::new(Recorder("a")),
            },
            PluginSpec {
                name: "b",
                constraints: &[ConstraintDecl {
                    phase: Phase::Start,
                    relation: Relation::Before,
                    other: "a",
                }],
                build: || Box::new(Recorder("b")),
            },
        ]);

        assert!(matches!(
            runtime.run_phase(Phase::Start, &ctx()),
            Err(PluginError::CyclicConstraint { .. })
        ));
        assert!(recorded().is_empty());
    }
}
