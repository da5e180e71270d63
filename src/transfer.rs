//! Abstract transfer functions: expression evaluation and condition
//! filtering over a [`Store`].

use crate::ast::{ArithOp, CmpOp, Node, NodeKind};
use crate::error::{AnalysisResult, StructuralError};
use crate::interval::Interval;
use crate::report::WarningKind;
use crate::store::Store;

/// Evaluates an arithmetic expression to an interval.
///
/// Literals become singletons, variables read the store, binary operators
/// recurse and apply the interval operation (emitting overflow and
/// division-by-zero warnings into `warnings`). Any other node kind is a
/// malformed tree.
pub fn eval(node: &Node, store: &Store, warnings: &mut Vec<WarningKind>) -> AnalysisResult<Interval> {
    match &node.kind {
        NodeKind::IntLiteral(value) => Ok(Interval::singleton(*value)),
        NodeKind::VarRef(name) => Ok(store.get(name)),
        NodeKind::BinOp(op) => {
            node.expect_arity(2)?;
            let lhs = eval(node.child(0)?, store, warnings)?;
            let rhs = eval(node.child(1)?, store, warnings)?;
            Ok(match op {
                ArithOp::Add => lhs.add(&rhs, warnings),
                ArithOp::Sub => lhs.sub(&rhs, warnings),
                ArithOp::Mul => lhs.mul(&rhs, warnings),
                ArithOp::Div => lhs.div(&rhs, warnings),
            })
        }
        _ => Err(StructuralError::UnexpectedNode {
            expected: "arithmetic expression",
            found: node.kind_name(),
        }),
    }
}

/// Splits a condition node into `(op, lhs, rhs)`, rejecting anything that
/// is not a binary comparison.
pub(crate) fn condition_parts(cond: &Node) -> AnalysisResult<(CmpOp, &Node, &Node)> {
    match cond.kind {
        NodeKind::LogicOp(op) => {
            cond.expect_arity(2)?;
            Ok((op, cond.child(0)?, cond.child(1)?))
        }
        _ => Err(StructuralError::UnexpectedNode {
            expected: "LogicOp condition",
            found: cond.kind_name(),
        }),
    }
}

/// Restricts `store` to the states that may satisfy `cond` (or its
/// negation, for else branches and loop exits).
///
/// Refinement narrows the interval of a variable standing alone on one
/// side of the comparison: `x op e` meets `x` with the filtered interval,
/// and `e op x` does the same through the flipped operator. When neither
/// side is a bare variable the filter is the identity, which is sound but
/// learns nothing. An infeasible condition collapses the result to bottom.
pub fn filter(
    cond: &Node,
    store: &Store,
    negate: bool,
    warnings: &mut Vec<WarningKind>,
) -> AnalysisResult<Store> {
    let (mut op, lhs, rhs) = condition_parts(cond)?;
    if store.is_bottom() {
        return Ok(Store::bottom());
    }
    if negate {
        op = op.negate();
    }

    let lhs_interval = eval(lhs, store, warnings)?;
    let rhs_interval = eval(rhs, store, warnings)?;

    let mut result = store.clone();
    if let NodeKind::VarRef(name) = &lhs.kind {
        let refined = store.get(name).meet(&lhs_interval.filter(op, &rhs_interval));
        result.set(name.clone(), refined);
    } else if let NodeKind::VarRef(name) = &rhs.kind {
        let refined = store
            .get(name)
            .meet(&rhs_interval.filter(op.flip(), &lhs_interval));
        result.set(name.clone(), refined);
    }
    Ok(result)
}
