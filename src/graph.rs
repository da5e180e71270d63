//! Equation graph: one location per program point.
//!
//! The builder walks the AST once and emits a [`Location`] for every
//! program point, in execution order. Every location owns its current
//! store and names its inputs as indices into the location vector, so the
//! dependency graph is self-describing and admits the one legal cycle (the
//! back edge into a loop head) without shared ownership.
//!
//! The solver later pulls dependency stores by index and replaces each
//! location's store in place; nothing here aliases.

use crate::ast::{CmpOp, Node, NodeKind};
use crate::error::{AnalysisResult, StructuralError};
use crate::interval::Interval;
use crate::report::WarningKind;
use crate::store::Store;

/// Stable index of a location in its [`EquationGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocId(usize);

impl LocId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a location computes, with its piece of the AST where needed.
#[derive(Debug, Clone)]
pub enum LocationKind<'a> {
    /// Program entry; holds every declared variable at ⊤.
    Entry,
    /// `var := expr`
    Assign { var: &'a str, expr: &'a Node },
    /// `lo <= var <= hi` assumed at program start.
    Precondition { var: &'a str, range: Interval },
    /// Then-edge of a conditional: filters by the guard.
    IfGuardTrue { cond: &'a Node },
    /// Else-edge of a conditional: filters by the negated guard.
    IfGuardFalse { cond: &'a Node },
    /// Merge point after both branches.
    IfElseJoin,
    /// Loop head: joins entry edge and back edge, filters by the guard,
    /// and widens against its previous value. Holds the state at body
    /// entry.
    WhileHead { cond: &'a Node },
    /// Last point of the loop body; source of the back edge.
    WhileBodyExit,
    /// Loop exit: joins entry edge and back edge, then filters by the
    /// negated guard. It reads the unfiltered invariant rather than the
    /// head store, so a loop whose guard never holds still flows through.
    WhileExit { cond: &'a Node },
    /// Data-flow no-op (assertion site).
    Seq,
}

impl LocationKind<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            LocationKind::Entry => "Entry",
            LocationKind::Assign { .. } => "Assign",
            LocationKind::Precondition { .. } => "Precondition",
            LocationKind::IfGuardTrue { .. } => "IfGuardTrue",
            LocationKind::IfGuardFalse { .. } => "IfGuardFalse",
            LocationKind::IfElseJoin => "IfElseJoin",
            LocationKind::WhileHead { .. } => "WhileHead",
            LocationKind::WhileBodyExit => "WhileBodyExit",
            LocationKind::WhileExit { .. } => "WhileExit",
            LocationKind::Seq => "Seq",
        }
    }
}

/// One program point: kind, input edges, current store, and the warnings
/// from the most recent recomputation.
#[derive(Debug, Clone)]
pub struct Location<'a> {
    pub kind: LocationKind<'a>,
    pub deps: Vec<LocId>,
    pub store: Store,
    pub(crate) warnings: Vec<WarningKind>,
}

/// An `assert` site: the no-op location carrying the state to check, plus
/// the asserted condition.
#[derive(Debug, Clone, Copy)]
pub struct AssertSite<'a> {
    pub loc: LocId,
    pub cond: &'a Node,
}

/// The equation system for one program.
#[derive(Debug)]
pub struct EquationGraph<'a> {
    locations: Vec<Location<'a>>,
    asserts: Vec<AssertSite<'a>>,
}

impl<'a> EquationGraph<'a> {
    /// Builds the equation system for a program.
    ///
    /// The root must be a `Sequence` of declarations followed by
    /// statements. Emission order is execution order, and it is the order
    /// the solver will iterate in.
    pub fn build(program: &'a Node) -> AnalysisResult<Self> {
        if program.kind != NodeKind::Sequence {
            return Err(StructuralError::UnexpectedNode {
                expected: "Sequence program root",
                found: program.kind_name(),
            });
        }

        let mut graph = EquationGraph { locations: Vec::new(), asserts: Vec::new() };

        let mut entry_store = Store::new();
        let mut statements = program.children.iter();
        let mut pending = None;
        for child in statements.by_ref() {
            if let NodeKind::Decl(name) = &child.kind {
                entry_store.set(name.clone(), Interval::TOP);
            } else {
                pending = Some(child);
                break;
            }
        }

        let mut prev = graph.push(LocationKind::Entry, Vec::new(), entry_store);
        if let Some(stmt) = pending {
            prev = graph.emit_stmt(stmt, prev)?;
        }
        for stmt in statements {
            prev = graph.emit_stmt(stmt, prev)?;
        }
        Ok(graph)
    }

    fn push(&mut self, kind: LocationKind<'a>, deps: Vec<LocId>, store: Store) -> LocId {
        let id = LocId(self.locations.len());
        self.locations.push(Location { kind, deps, store, warnings: Vec::new() });
        id
    }

    fn emit_stmt(&mut self, node: &'a Node, prev: LocId) -> AnalysisResult<LocId> {
        match &node.kind {
            NodeKind::Sequence => {
                let mut last = prev;
                for child in &node.children {
                    last = self.emit_stmt(child, last)?;
                }
                Ok(last)
            }

            NodeKind::Assign => {
                node.expect_arity(2)?;
                let lhs = node.child(0)?;
                let var = match &lhs.kind {
                    NodeKind::VarRef(name) => name.as_str(),
                    _ => {
                        return Err(StructuralError::UnexpectedNode {
                            expected: "VarRef assignment target",
                            found: lhs.kind_name(),
                        })
                    }
                };
                let expr = node.child(1)?;
                Ok(self.push(
                    LocationKind::Assign { var, expr },
                    vec![prev],
                    Store::bottom(),
                ))
            }

            NodeKind::Precondition => {
                let (var, range) = parse_precondition(node)?;
                Ok(self.push(
                    LocationKind::Precondition { var, range },
                    vec![prev],
                    Store::bottom(),
                ))
            }

            NodeKind::IfElse => {
                node.expect_arity(3)?;
                let cond = node.child(0)?;
                crate::transfer::condition_parts(cond)?;

                let guard_true =
                    self.push(LocationKind::IfGuardTrue { cond }, vec![prev], Store::bottom());
                let then_exit = self.emit_stmt(node.child(1)?, guard_true)?;

                let guard_false =
                    self.push(LocationKind::IfGuardFalse { cond }, vec![prev], Store::bottom());
                let else_exit = self.emit_stmt(node.child(2)?, guard_false)?;

                Ok(self.push(
                    LocationKind::IfElseJoin,
                    vec![then_exit, else_exit],
                    Store::bottom(),
                ))
            }

            NodeKind::While => {
                node.expect_arity(2)?;
                let cond = node.child(0)?;
                crate::transfer::condition_parts(cond)?;

                // The back-edge dependency is patched in once the body
                // exit exists; this is the only cycle in the graph.
                let head =
                    self.push(LocationKind::WhileHead { cond }, vec![prev], Store::bottom());
                let body_exit_src = self.emit_stmt(node.child(1)?, head)?;
                let body_exit =
                    self.push(LocationKind::WhileBodyExit, vec![body_exit_src], Store::bottom());
                self.locations[head.index()].deps.push(body_exit);

                Ok(self.push(
                    LocationKind::WhileExit { cond },
                    vec![prev, body_exit],
                    Store::bottom(),
                ))
            }

            NodeKind::Postcondition => {
                node.expect_arity(1)?;
                let cond = node.child(0)?;
                crate::transfer::condition_parts(cond)?;

                let site = self.push(LocationKind::Seq, vec![prev], Store::bottom());
                self.asserts.push(AssertSite { loc: site, cond });
                Ok(site)
            }

            _ => Err(StructuralError::UnexpectedNode {
                expected: "statement",
                found: node.kind_name(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = LocId> {
        (0..self.locations.len()).map(LocId)
    }

    pub fn location(&self, id: LocId) -> &Location<'a> {
        &self.locations[id.index()]
    }

    pub(crate) fn location_mut(&mut self, id: LocId) -> &mut Location<'a> {
        &mut self.locations[id.index()]
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location<'a>> {
        self.locations.iter()
    }

    /// Store currently held at `id`.
    pub fn store(&self, id: LocId) -> &Store {
        &self.locations[id.index()].store
    }

    pub fn assert_sites(&self) -> &[AssertSite<'a>] {
        &self.asserts
    }

    /// Locations of the given kind name, for inspection and tests.
    pub fn find_by_kind(&self, name: &str) -> Vec<LocId> {
        self.ids()
            .filter(|id| self.location(*id).kind.name() == name)
            .collect()
    }
}

/// Extracts `(variable, range)` from a `Precondition` node of the shape
/// `[lo <= x, x <= hi]`.
fn parse_precondition(node: &Node) -> AnalysisResult<(&str, Interval)> {
    node.expect_arity(2)?;
    let lower = node.child(0)?;
    let upper = node.child(1)?;

    let (lo, var_lower) = match (&lower.kind, lower.children.as_slice()) {
        (NodeKind::LogicOp(CmpOp::Le), [l, r]) => match (&l.kind, &r.kind) {
            (NodeKind::IntLiteral(lo), NodeKind::VarRef(name)) => (*lo, name.as_str()),
            _ => {
                return Err(StructuralError::MalformedPrecondition(
                    "first child must have the shape `lo <= x`".to_string(),
                ))
            }
        },
        _ => {
            return Err(StructuralError::MalformedPrecondition(
                "first child must be a `<=` comparison".to_string(),
            ))
        }
    };

    let (var_upper, hi) = match (&upper.kind, upper.children.as_slice()) {
        (NodeKind::LogicOp(CmpOp::Le), [l, r]) => match (&l.kind, &r.kind) {
            (NodeKind::VarRef(name), NodeKind::IntLiteral(hi)) => (name.as_str(), *hi),
            _ => {
                return Err(StructuralError::MalformedPrecondition(
                    "second child must have the shape `x <= hi`".to_string(),
                ))
            }
        },
        _ => {
            return Err(StructuralError::MalformedPrecondition(
                "second child must be a `<=` comparison".to_string(),
            ))
        }
    };

    if var_lower != var_upper {
        return Err(StructuralError::MalformedPrecondition(format!(
            "bounds constrain different variables: {} and {}",
            var_lower, var_upper
        )));
    }
    Ok((var_lower, Interval::new(lo, hi)))
}
