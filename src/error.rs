//! Error types for the analyzer.

use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, StructuralError>;

/// Fatal errors raised by a malformed AST.
///
/// These indicate a broken input tree (or a bug in whatever produced it),
/// never a property of the analyzed program. Warnings about the analyzed
/// program (overflow, division by zero) are collected separately and do not
/// abort the analysis.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// A node has the wrong number of children.
    #[error("{kind} node expects {expected} children, found {found}")]
    WrongArity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    /// A node kind appeared where a different kind was required.
    #[error("expected {expected}, found {found}")]
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
    },

    /// A precondition does not have the `lo <= x && x <= hi` shape.
    #[error("malformed precondition: {0}")]
    MalformedPrecondition(String),
}
