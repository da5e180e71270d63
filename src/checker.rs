//! Assertion discharge against the solved equation graph.
//!
//! An assertion `assert C` is proved when no concrete state at the
//! assertion point can violate `C`. The check runs the comparison filter
//! for the *negated* condition over the state the solver computed: if the
//! set of potentially violating values is empty, the assertion holds on
//! every execution; otherwise it may fail, and the abstract state is the
//! counterexample. The check is sound but incomplete, with the same blind
//! spots as the condition filter (correlated variables, compound left
//! operands).

use crate::error::AnalysisResult;
use crate::graph::EquationGraph;
use crate::report::{AnalysisReport, AssertionOutcome, Warning};
use crate::transfer;

/// Discharges every assertion in the graph, appending outcomes (and any
/// warnings raised while evaluating assertion expressions) to the report.
pub fn check(graph: &EquationGraph<'_>, report: &mut AnalysisReport) -> AnalysisResult<()> {
    for site in graph.assert_sites() {
        let store = graph.store(site.loc);
        let (op, lhs, rhs) = transfer::condition_parts(site.cond)?;

        let mut warnings = Vec::new();
        let lhs_interval = transfer::eval(lhs, store, &mut warnings)?;
        let rhs_interval = transfer::eval(rhs, store, &mut warnings)?;

        let violating = lhs_interval.filter(op.negate(), &rhs_interval);
        let outcome = AssertionOutcome {
            condition: site.cond.to_string(),
            proved: violating.is_empty(),
            store: store.clone(),
        };
        log::debug!(
            "assert {}: {}",
            outcome.condition,
            if outcome.proved { "proved" } else { "may fail" }
        );

        for kind in warnings {
            report.warnings.push(Warning { kind, store: store.clone() });
        }
        report.outcomes.push(outcome);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::solver::Solver;

    fn run(program: &Node) -> AnalysisReport {
        let mut graph = EquationGraph::build(program).unwrap();
        Solver::default().solve(&mut graph).unwrap();
        let mut report = AnalysisReport::default();
        check(&graph, &mut report).unwrap();
        report
    }

    #[test]
    fn test_upper_bound_proved_lower_bound_not() {
        let program = Node::program(
            &["x"],
            vec![
                Node::precondition(-5, "x", 5),
                Node::postcondition(Node::var("x").le(Node::int(10))),
                Node::postcondition(Node::var("x").ge(Node::int(0))),
            ],
        );
        let report = run(&program);

        assert_eq!(report.outcomes.len(), 2);
        assert!(report.outcomes[0].proved);
        assert!(!report.outcomes[1].proved);
        // The failing outcome carries the counterexample state
        assert_eq!(report.outcomes[1].store.get("x").lo(), -5);
        assert_eq!(report.outcomes[1].store.get("x").hi(), 5);
    }

    #[test]
    fn test_exact_equality_proved() {
        let program = Node::program(
            &["x"],
            vec![
                Node::assign("x", Node::int(8)),
                Node::postcondition(Node::var("x").eq(Node::int(8))),
            ],
        );
        let report = run(&program);
        assert!(report.all_proved());
    }

    #[test]
    fn test_inequality_on_singleton_may_fail() {
        // x is exactly 3, so `assert x != 3` must not be proved
        let program = Node::program(
            &["x"],
            vec![
                Node::assign("x", Node::int(3)),
                Node::postcondition(Node::var("x").ne(Node::int(3))),
            ],
        );
        let report = run(&program);
        assert!(!report.all_proved());
    }

    #[test]
    fn test_constant_left_operand() {
        // 0 < x with x in [1, 10]
        let program = Node::program(
            &["x"],
            vec![
                Node::precondition(1, "x", 10),
                Node::postcondition(Node::int(0).lt(Node::var("x"))),
            ],
        );
        let report = run(&program);
        assert!(report.all_proved());
    }

    #[test]
    fn test_unreachable_assertion_is_vacuously_proved() {
        // The branch cannot be taken, so its assertion has no witnesses
        let program = Node::program(
            &["x"],
            vec![
                Node::assign("x", Node::int(1)),
                Node::if_else(
                    Node::var("x").eq(Node::int(0)),
                    vec![Node::postcondition(Node::var("x").ge(Node::int(100)))],
                    vec![],
                ),
            ],
        );
        let report = run(&program);
        assert!(report.all_proved());
    }
}
