//! # interval-analyzer: interval abstract interpretation for a small imperative language
//!
//! This crate statically analyzes programs over integer variables with
//! assignment, conditionals, while-loops, range preconditions, and
//! assertions. For every program point it computes a sound
//! over-approximation of the values each variable can hold, in the
//! **interval abstract domain**, and then discharges the program's
//! assertions: each one is either *proved* or reported as *may fail*
//! together with a counterexample abstract state.
//!
//! ## How it works
//!
//! Instead of executing the program with concrete values, the analyzer
//! executes it with ranges. `x := 5` binds `x ∈ [5, 5]`; joining the two
//! arms of a conditional produces the convex hull of both outcomes; a
//! guard like `x < 5` narrows the range on its branch. The analysis never
//! under-approximates, so whatever it proves holds on every execution.
//!
//! The pipeline has three stages:
//!
//! 1. **[`EquationGraph::build`]** turns the AST into one equation per
//!    program point. Each [`graph::Location`] owns its abstract
//!    [`Store`] and names its inputs by index; the only cycle runs
//!    through a loop head.
//! 2. **[`Solver::solve`]** iterates the equations in build order until
//!    nothing changes. Loop heads apply **widening**: a bound that grows
//!    between rounds jumps straight to the type extremum, which makes
//!    every ascending chain finite and guarantees termination.
//! 3. **[`checker::check`]** evaluates each assertion against the solved
//!    state: if no value allowed by the state can violate the condition,
//!    the assertion is proved.
//!
//! Possible overflow and division by zero are reported as warnings (the
//! analysis continues with a sound result); a malformed AST aborts with a
//! [`StructuralError`].
//!
//! ## Example
//!
//! ```rust
//! use interval_analyzer::{analyze, Node};
//!
//! // int x; x := 0; while (x < 10) { x := x + 1 }; assert x >= 10
//! let program = Node::program(
//!     &["x"],
//!     vec![
//!         Node::assign("x", Node::int(0)),
//!         Node::while_loop(
//!             Node::var("x").lt(Node::int(10)),
//!             vec![Node::assign("x", Node::var("x").add(Node::int(1)))],
//!         ),
//!         Node::postcondition(Node::var("x").ge(Node::int(10))),
//!     ],
//! );
//!
//! let report = analyze(&program).unwrap();
//! assert!(report.all_proved());
//! ```

pub mod ast;
pub mod checker;
pub mod error;
pub mod graph;
pub mod interval;
pub mod report;
pub mod solver;
pub mod store;
pub mod transfer;

// Re-exports for convenience
pub use ast::{ArithOp, CmpOp, Node, NodeKind};
pub use error::{AnalysisResult, StructuralError};
pub use graph::{EquationGraph, LocId, Location, LocationKind};
pub use interval::Interval;
pub use report::{AnalysisReport, AssertionOutcome, Warning, WarningKind};
pub use solver::Solver;
pub use store::Store;

/// Runs the full pipeline on one program: build the equation graph, solve
/// it to a fixpoint, and discharge the assertions.
pub fn analyze(program: &Node) -> AnalysisResult<AnalysisReport> {
    let mut graph = EquationGraph::build(program)?;
    Solver::default().solve(&mut graph)?;

    let mut report = AnalysisReport::default();
    for location in graph.locations() {
        for kind in &location.warnings {
            report
                .warnings
                .push(Warning { kind: *kind, store: location.store.clone() });
        }
    }
    checker::check(&graph, &mut report)?;
    Ok(report)
}
