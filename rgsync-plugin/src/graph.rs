//! Ordering constraint accumulation and topological resolution.
//!
//! Constraints are ordered pairs (earlier, later) of plugin names, scoped
//! to one phase; the two phases keep fully independent sets. Vertices are
//! the union of registered names and every name mentioned in a constraint —
//! a constraint may reference a plugin that is never installed. The graph
//! is rebuilt from the accumulated set on every resolution; only the
//! partial order is guaranteed, not a specific tie-break.

use std::collections::{BTreeMap, BTreeSet};

use rgsync_core::Phase;

use crate::error::PluginError;

/// Accumulator for per-phase ordering constraints.
#[derive(Debug, Clone, Default)]
pub struct ConstraintGraph {
    vertices: BTreeSet<String>,
    start_edges: BTreeMap<String, BTreeSet<String>>,
    exit_edges: BTreeMap<String, BTreeSet<String>>,
}

impl ConstraintGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure `name` appears in every resolution, even with no constraints.
    pub fn register(&mut self, name: impl Into<String>) {
        self.vertices.insert(name.into());
    }

    /// Record that `earlier` must precede `later` in `phase`. Duplicate
    /// constraints collapse.
    pub fn add_constraint(
        &mut self,
        phase: Phase,
        earlier: impl Into<String>,
        later: impl Into<String>,
    ) {
        self.edges_mut(phase)
            .entry(earlier.into())
            .or_default()
            .insert(later.into());
    }

    /// Produce a linearization of the phase's constraint set: every
    /// registered or mentioned name appears exactly once, and for each
    /// constraint (earlier, later), `earlier` precedes `later`.
    pub fn resolve_order(&self, phase: Phase) -> Result<Vec<String>, PluginError> {
        let edges = self.edges(phase);

        let mut indegree: BTreeMap<&str, usize> = BTreeMap::new();
        for name in &self.vertices {
            indegree.insert(name, 0);
        }
        for (earlier, laters) in edges {
            indegree.entry(earlier).or_insert(0);
            for later in laters {
                *indegree.entry(later).or_insert(0) += 1;
            }
        }

        let mut ready: BTreeSet<&str> = indegree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(name, _)| *name)
            .collect();

        let mut order = Vec::with_capacity(indegree.len());
        while let Some(name) = ready.pop_first() {
            order.push(name.to_string());
            if let Some(laters) = edges.get(name) {
                for later in laters {
                    let degree = indegree
                        .get_mut(later.as_str())
                        .unwrap_or_else(|| unreachable!("all edge targets seeded above"));
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(later.as_str());
                    }
                }
            }
        }

        if order.len() != indegree.len() {
            // Some vertex never reached indegree zero; name one of them.
            let stuck = indegree
                .iter()
                .find(|(name, _)| !order.iter().any(|o| o == *name))
                .map(|(name, _)| name.to_string())
                .unwrap_or_default();
            return Err(PluginError::CyclicConstraint { phase, name: stuck });
        }
        Ok(order)
    }

    fn edges(&self, phase: Phase) -> &BTreeMap<String, BTreeSet<String>> {
        match phase {
            Phase::Start => &self.start_edges,
            Phase::Exit => &self.exit_edges,
        }
    }

    fn edges_mut(&mut self, phase: Phase) -> &mut BTreeMap<String, BTreeSet<String>> {
        match phase {
            Phase::Start => &mut self.start_edges,
            Phase::Exit => &mut self.exit_edges,
        }
    }
}
