//! Chaotic fixpoint iteration over the equation graph.
//!
//! Locations are recomputed in build order, full pass after full pass,
//! until a pass changes no store. Within a pass a location reads the
//! already-updated stores of dependencies that precede it and the previous
//! pass's stores of dependencies that follow it; the latter is how the
//! back edge of a loop feeds the head one round late, and widening at the
//! head turns those rounds into a finite ascending chain.

use crate::error::AnalysisResult;
use crate::graph::{EquationGraph, LocId, LocationKind};
use crate::report::WarningKind;
use crate::store::Store;
use crate::transfer;

/// Fixpoint driver.
///
/// `max_passes` is a safety net against bugs in the transfer functions;
/// widening guarantees convergence long before it. Hitting it logs a
/// warning and keeps the current (sound) state.
#[derive(Debug, Clone)]
pub struct Solver {
    pub max_passes: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Solver { max_passes: 1000 }
    }
}

impl Solver {
    pub fn new(max_passes: usize) -> Self {
        Solver { max_passes }
    }

    /// Iterates the graph to a fixpoint.
    ///
    /// Returns the number of full passes, counting the final pass that
    /// observed no change.
    pub fn solve(&self, graph: &mut EquationGraph<'_>) -> AnalysisResult<usize> {
        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;

            for id in graph.ids() {
                let mut warnings = Vec::new();
                let store = self.transfer(graph, id, &mut warnings)?;

                let location = graph.location_mut(id);
                location.warnings = warnings;
                if store != location.store {
                    location.store = store;
                    changed = true;
                }
            }

            if !changed {
                log::debug!("fixpoint reached after {} passes", passes);
                return Ok(passes);
            }
            if passes >= self.max_passes {
                log::warn!("no fixpoint after {} passes, keeping current state", passes);
                return Ok(passes);
            }
        }
    }

    /// Recomputes the store of one location from its dependencies.
    fn transfer(
        &self,
        graph: &EquationGraph<'_>,
        id: LocId,
        warnings: &mut Vec<WarningKind>,
    ) -> AnalysisResult<Store> {
        let location = graph.location(id);
        match &location.kind {
            // The entry store is fixed at build time
            LocationKind::Entry => Ok(location.store.clone()),

            LocationKind::Assign { var, expr } => {
                let input = graph.store(location.deps[0]);
                if input.is_bottom() {
                    return Ok(Store::bottom());
                }
                let value = transfer::eval(expr, input, warnings)?;
                let mut output = input.clone();
                output.set(*var, value);
                Ok(output)
            }

            LocationKind::Precondition { var, range } => {
                let input = graph.store(location.deps[0]);
                if input.is_bottom() {
                    return Ok(Store::bottom());
                }
                let mut output = input.clone();
                output.set(*var, *range);
                Ok(output)
            }

            LocationKind::IfGuardTrue { cond } => {
                transfer::filter(cond, graph.store(location.deps[0]), false, warnings)
            }

            LocationKind::IfGuardFalse { cond } => {
                transfer::filter(cond, graph.store(location.deps[0]), true, warnings)
            }

            LocationKind::IfElseJoin => {
                let joined = location
                    .deps
                    .iter()
                    .fold(Store::bottom(), |acc, dep| acc.join(graph.store(*dep)));
                Ok(joined)
            }

            LocationKind::WhileHead { cond } => {
                let joined = location
                    .deps
                    .iter()
                    .fold(Store::bottom(), |acc, dep| acc.join(graph.store(*dep)));
                let candidate = transfer::filter(cond, &joined, false, warnings)?;
                Ok(location.store.widen(&candidate))
            }

            LocationKind::WhileExit { cond } => {
                let joined = location
                    .deps
                    .iter()
                    .fold(Store::bottom(), |acc, dep| acc.join(graph.store(*dep)));
                transfer::filter(cond, &joined, true, warnings)
            }

            LocationKind::WhileBodyExit | LocationKind::Seq => {
                Ok(graph.store(location.deps[0]).clone())
            }
        }
    }
}
