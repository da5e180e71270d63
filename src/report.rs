//! Analysis results: warnings, assertion outcomes, and the textual report.
//!
//! The engine never prints. Warnings are pushed into plain buffers threaded
//! through the transfer functions, attached to program points by the
//! solver, and assembled here into an [`AnalysisReport`] that callers can
//! render or inspect.

use std::fmt;

use crate::store::Store;

/// Category of a non-fatal finding about the analyzed program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// An arithmetic bound left the representable range and was clamped.
    Overflow,
    /// A divisor interval contains zero.
    DivisionByZero,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::Overflow => write!(f, "warning: overflow"),
            WarningKind::DivisionByZero => write!(f, "warning: division-by-zero"),
        }
    }
}

/// A warning together with the abstract state at the offending point.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub kind: WarningKind,
    pub store: Store,
}

/// Result of discharging one assertion.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionOutcome {
    /// Rendering of the asserted condition, e.g. `x <= 10`.
    pub condition: String,
    pub proved: bool,
    /// The abstract state at the assertion; for a failed proof this is the
    /// counterexample state.
    pub store: Store,
}

/// Everything the analysis has to say about one program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub warnings: Vec<Warning>,
    pub outcomes: Vec<AssertionOutcome>,
}

impl AnalysisReport {
    pub fn all_proved(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.proved)
    }

    /// Process exit code: 0 when every assertion is proved.
    pub fn exit_code(&self) -> i32 {
        if self.all_proved() {
            0
        } else {
            1
        }
    }
}

fn dump_store(f: &mut fmt::Formatter<'_>, store: &Store) -> fmt::Result {
    for (name, interval) in store.iter() {
        writeln!(f, "  {} = {}", name, interval)?;
    }
    Ok(())
}

impl fmt::Display for AnalysisReport {
    /// Line-oriented report: one category line per finding, each followed
    /// by a `name = [lo, hi]` dump of the state at that point.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for warning in &self.warnings {
            writeln!(f, "{}", warning.kind)?;
            dump_store(f, &warning.store)?;
        }
        for outcome in &self.outcomes {
            if outcome.proved {
                writeln!(f, "assertion proved: {}", outcome.condition)?;
            } else {
                writeln!(f, "assertion may fail: {}", outcome.condition)?;
            }
            dump_store(f, &outcome.store)?;
        }
        Ok(())
    }
}
