//! Interval abstract domain over signed 64-bit integers.
//!
//! # Lattice Structure
//!
//! Elements are ranges `[lo, hi]` plus an explicit empty (bottom) element:
//!
//! - **Order** (`⊑`): `[l₁, h₁] ⊑ [l₂, h₂]` iff `l₂ ≤ l₁` and `h₁ ≤ h₂` (containment)
//! - **Join** (`⊔`): `[min(l₁, l₂), max(h₁, h₂)]` (convex hull)
//! - **Meet** (`⊓`): `[max(l₁, l₂), min(h₁, h₂)]` (intersection)
//! - **Bottom** (`⊥`): the empty interval
//! - **Top** (`⊤`): `[i64::MIN, i64::MAX]`
//!
//! The type is bounded rather than using `±∞` sentinels: `i64::MIN` and
//! `i64::MAX` double as the infinities, and arithmetic saturates at them.
//! A bound that had to be clamped is reported through the warning sink as a
//! possible overflow; the clamped result stays sound because the true bound
//! lies outside the representable range.
//!
//! Emptiness is a distinct flag, never the `lo > hi` encoding. Meet and the
//! comparison filters produce the empty interval when bounds cross, and all
//! empty intervals compare equal regardless of stored bounds.

use std::cmp::{max, min};
use std::fmt;

use crate::ast::CmpOp;
use crate::report::WarningKind;

/// Interval `[lo, hi]` with an explicit empty flag.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Interval {
    lo: i64,
    hi: i64,
    empty: bool,
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        if self.empty || other.empty {
            self.empty == other.empty
        } else {
            self.lo == other.lo && self.hi == other.hi
        }
    }
}

impl Interval {
    /// The full range `[i64::MIN, i64::MAX]`.
    pub const TOP: Interval = Interval { lo: i64::MIN, hi: i64::MAX, empty: false };

    /// The empty interval (bottom).
    pub const EMPTY: Interval = Interval { lo: 0, hi: 0, empty: true };

    /// Creates `[lo, hi]`; crossed bounds collapse to the empty interval.
    pub fn new(lo: i64, hi: i64) -> Self {
        if lo > hi {
            Interval::EMPTY
        } else {
            Interval { lo, hi, empty: false }
        }
    }

    /// Creates the singleton `[value, value]`.
    pub fn singleton(value: i64) -> Self {
        Interval { lo: value, hi: value, empty: false }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn is_top(&self) -> bool {
        !self.empty && self.lo == i64::MIN && self.hi == i64::MAX
    }

    /// Lower bound. Meaningless for the empty interval.
    pub fn lo(&self) -> i64 {
        self.lo
    }

    /// Upper bound. Meaningless for the empty interval.
    pub fn hi(&self) -> i64 {
        self.hi
    }

    pub fn is_singleton(&self) -> bool {
        !self.empty && self.lo == self.hi
    }

    /// Inclusive membership.
    pub fn contains(&self, value: i64) -> bool {
        !self.empty && self.lo <= value && value <= self.hi
    }

    /// Partial order `self ⊑ other` (inclusion of concretizations).
    pub fn le(&self, other: &Interval) -> bool {
        if self.empty {
            return true;
        }
        if other.empty {
            return false;
        }
        other.lo <= self.lo && self.hi <= other.hi
    }

    /// Least upper bound (convex hull).
    pub fn join(&self, other: &Interval) -> Interval {
        if self.empty {
            return *other;
        }
        if other.empty {
            return *self;
        }
        Interval::new(min(self.lo, other.lo), max(self.hi, other.hi))
    }

    /// Greatest lower bound (intersection).
    pub fn meet(&self, other: &Interval) -> Interval {
        if self.empty || other.empty {
            return Interval::EMPTY;
        }
        Interval::new(max(self.lo, other.lo), min(self.hi, other.hi))
    }

    /// Widening `self ∇ next`: an unstable bound jumps to the respective
    /// extremum, a stable bound is kept from `self`.
    pub fn widen(&self, next: &Interval) -> Interval {
        if self.empty {
            return *next;
        }
        if next.empty {
            return *self;
        }
        let lo = if next.lo < self.lo { i64::MIN } else { self.lo };
        let hi = if next.hi > self.hi { i64::MAX } else { self.hi };
        Interval { lo, hi, empty: false }
    }

    /// Negation `[-hi, -lo]`, saturating at `i64::MAX` for `-i64::MIN`.
    pub fn neg(&self) -> Interval {
        if self.empty {
            return Interval::EMPTY;
        }
        Interval::new(self.hi.saturating_neg(), self.lo.saturating_neg())
    }

    /// Addition `[lo₁+lo₂, hi₁+hi₂]`, clamped with an overflow warning.
    pub fn add(&self, other: &Interval, warnings: &mut Vec<WarningKind>) -> Interval {
        if self.empty || other.empty {
            return Interval::EMPTY;
        }
        let mut clamped = false;
        let lo = sat_add(self.lo, other.lo, &mut clamped);
        let hi = sat_add(self.hi, other.hi, &mut clamped);
        if clamped {
            warnings.push(WarningKind::Overflow);
        }
        Interval::new(lo, hi)
    }

    /// Subtraction `[lo₁-hi₂, hi₁-lo₂]`, clamped with an overflow warning.
    pub fn sub(&self, other: &Interval, warnings: &mut Vec<WarningKind>) -> Interval {
        if self.empty || other.empty {
            return Interval::EMPTY;
        }
        let mut clamped = false;
        let lo = sat_sub(self.lo, other.hi, &mut clamped);
        let hi = sat_sub(self.hi, other.lo, &mut clamped);
        if clamped {
            warnings.push(WarningKind::Overflow);
        }
        Interval::new(lo, hi)
    }

    /// Multiplication: hull of the four corner products, clamped with an
    /// overflow warning.
    pub fn mul(&self, other: &Interval, warnings: &mut Vec<WarningKind>) -> Interval {
        if self.empty || other.empty {
            return Interval::EMPTY;
        }
        let mut clamped = false;
        let corners = [
            sat_mul(self.lo, other.lo, &mut clamped),
            sat_mul(self.lo, other.hi, &mut clamped),
            sat_mul(self.hi, other.lo, &mut clamped),
            sat_mul(self.hi, other.hi, &mut clamped),
        ];
        if clamped {
            warnings.push(WarningKind::Overflow);
        }
        let lo = corners.iter().copied().min().unwrap_or(i64::MIN);
        let hi = corners.iter().copied().max().unwrap_or(i64::MAX);
        Interval::new(lo, hi)
    }

    /// Division with truncation toward zero.
    ///
    /// A divisor that may be zero yields a division-by-zero warning and ⊤
    /// (sound, and the analysis keeps going). Otherwise the result is the
    /// hull of the four corner quotients; the single overflowing corner
    /// `i64::MIN / -1` clamps with an overflow warning.
    pub fn div(&self, other: &Interval, warnings: &mut Vec<WarningKind>) -> Interval {
        if self.empty || other.empty {
            return Interval::EMPTY;
        }
        if other.contains(0) {
            warnings.push(WarningKind::DivisionByZero);
            return Interval::TOP;
        }
        let mut clamped = false;
        let corners = [
            sat_div(self.lo, other.lo, &mut clamped),
            sat_div(self.lo, other.hi, &mut clamped),
            sat_div(self.hi, other.lo, &mut clamped),
            sat_div(self.hi, other.hi, &mut clamped),
        ];
        if clamped {
            warnings.push(WarningKind::Overflow);
        }
        let lo = corners.iter().copied().min().unwrap_or(i64::MIN);
        let hi = corners.iter().copied().max().unwrap_or(i64::MAX);
        Interval::new(lo, hi)
    }

    /// Restricts this interval (the left operand) by `self op right`.
    ///
    /// Equality meets the two sides. `!=` refines only when the right side
    /// is a singleton lying on a bound of the left interval (dropping an
    /// interior value is not expressible as an interval); identical
    /// singletons are contradictory and give ⊥. The orderings trim one
    /// bound, with the strict variants adjusted by one.
    pub fn filter(&self, op: CmpOp, right: &Interval) -> Interval {
        if self.empty || right.empty {
            return Interval::EMPTY;
        }
        match op {
            CmpOp::Eq => self.meet(right),
            CmpOp::Ne => {
                if !right.is_singleton() {
                    *self
                } else if right.lo == self.lo {
                    match self.lo.checked_add(1) {
                        None => Interval::EMPTY,
                        Some(lo) => Interval::new(lo, self.hi),
                    }
                } else if right.lo == self.hi {
                    match self.hi.checked_sub(1) {
                        None => Interval::EMPTY,
                        Some(hi) => Interval::new(self.lo, hi),
                    }
                } else {
                    *self
                }
            }
            CmpOp::Lt => match right.hi.checked_sub(1) {
                // Nothing is below i64::MIN
                None => Interval::EMPTY,
                Some(bound) => Interval::new(self.lo, min(self.hi, bound)),
            },
            CmpOp::Le => Interval::new(self.lo, min(self.hi, right.hi)),
            CmpOp::Gt => match right.lo.checked_add(1) {
                None => Interval::EMPTY,
                Some(bound) => Interval::new(max(self.lo, bound), self.hi),
            },
            CmpOp::Ge => Interval::new(max(self.lo, right.lo), self.hi),
        }
    }
}

fn sat_add(a: i64, b: i64, clamped: &mut bool) -> i64 {
    match a.checked_add(b) {
        Some(v) => v,
        None => {
            *clamped = true;
            a.saturating_add(b)
        }
    }
}

fn sat_sub(a: i64, b: i64, clamped: &mut bool) -> i64 {
    match a.checked_sub(b) {
        Some(v) => v,
        None => {
            *clamped = true;
            a.saturating_sub(b)
        }
    }
}

fn sat_mul(a: i64, b: i64, clamped: &mut bool) -> i64 {
    match a.checked_mul(b) {
        Some(v) => v,
        None => {
            *clamped = true;
            a.saturating_mul(b)
        }
    }
}

fn sat_div(a: i64, b: i64, clamped: &mut bool) -> i64 {
    match a.checked_div(b) {
        Some(v) => v,
        None => {
            // i64::MIN / -1 is the only way here once b != 0
            *clamped = true;
            i64::MAX
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.empty {
            write!(f, "⊥")
        } else {
            write!(f, "[{}, {}]", self.lo, self.hi)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_warnings() -> Vec<WarningKind> {
        Vec::new()
    }

    #[test]
    fn test_join_meet() {
        let a = Interval::new(0, 10);
        let b = Interval::new(5, 15);

        assert_eq!(a.join(&b), Interval::new(0, 15));
        assert_eq!(a.meet(&b), Interval::new(5, 10));

        // Disjoint meet is empty
        let c = Interval::new(20, 30);
        assert!(a.meet(&c).is_empty());
    }

    #[test]
    fn test_empty_is_identity_of_join() {
        let a = Interval::new(-3, 7);
        assert_eq!(a.join(&Interval::EMPTY), a);
        assert_eq!(Interval::EMPTY.join(&a), a);
        assert_eq!(Interval::EMPTY.join(&Interval::EMPTY), Interval::EMPTY);
    }

    #[test]
    fn test_empty_equality_ignores_bounds() {
        let e1 = Interval::new(5, 2);
        assert!(e1.is_empty());
        assert_eq!(e1, Interval::EMPTY);
        assert_ne!(e1, Interval::new(2, 5));
    }

    #[test]
    fn test_order() {
        let small = Interval::new(2, 5);
        let big = Interval::new(0, 10);
        assert!(small.le(&big));
        assert!(!big.le(&small));
        assert!(Interval::EMPTY.le(&small));
        assert!(small.le(&Interval::TOP));
    }

    #[test]
    fn test_widen() {
        let prev = Interval::new(0, 10);

        // Stable bounds are kept
        assert_eq!(prev.widen(&Interval::new(2, 8)), prev);
        // Unstable upper bound jumps to MAX
        assert_eq!(prev.widen(&Interval::new(0, 11)), Interval::new(0, i64::MAX));
        // Unstable lower bound jumps to MIN
        assert_eq!(prev.widen(&Interval::new(-1, 10)), Interval::new(i64::MIN, 10));
        // Widening from bottom is the identity on the new value
        assert_eq!(Interval::EMPTY.widen(&prev), prev);
    }

    #[test]
    fn test_add_saturates_and_warns() {
        let mut w = no_warnings();
        let a = Interval::new(0, i64::MAX);
        let r = a.add(&Interval::singleton(1), &mut w);
        assert_eq!(r, Interval::new(1, i64::MAX));
        assert_eq!(w, vec![WarningKind::Overflow]);
    }

    #[test]
    fn test_sub() {
        let mut w = no_warnings();
        let a = Interval::new(0, 10);
        let b = Interval::new(3, 4);
        assert_eq!(a.sub(&b, &mut w), Interval::new(-4, 7));
        assert!(w.is_empty());
    }

    #[test]
    fn test_mul_corners() {
        let mut w = no_warnings();
        let a = Interval::new(-2, 3);
        let b = Interval::new(-5, 4);
        // Corners: 10, -8, -15, 12
        assert_eq!(a.mul(&b, &mut w), Interval::new(-15, 12));
        assert!(w.is_empty());
    }

    #[test]
    fn test_div_by_possible_zero_is_top() {
        let mut w = no_warnings();
        let a = Interval::singleton(100);
        let b = Interval::new(0, 10);
        assert_eq!(a.div(&b, &mut w), Interval::TOP);
        assert_eq!(w, vec![WarningKind::DivisionByZero]);
    }

    #[test]
    fn test_div_nonzero() {
        let mut w = no_warnings();
        let a = Interval::new(10, 100);
        let b = Interval::new(2, 5);
        assert_eq!(a.div(&b, &mut w), Interval::new(2, 50));
        assert!(w.is_empty());

        let neg = Interval::new(-4, -2);
        assert_eq!(a.div(&neg, &mut w), Interval::new(-50, -2));
        assert!(w.is_empty());
    }

    #[test]
    fn test_div_min_by_minus_one_clamps() {
        let mut w = no_warnings();
        let a = Interval::new(i64::MIN, 0);
        let b = Interval::singleton(-1);
        let r = a.div(&b, &mut w);
        assert_eq!(r, Interval::new(0, i64::MAX));
        assert_eq!(w, vec![WarningKind::Overflow]);
    }

    #[test]
    fn test_empty_propagates_without_warnings() {
        let mut w = no_warnings();
        let a = Interval::new(0, 10);
        assert!(a.add(&Interval::EMPTY, &mut w).is_empty());
        assert!(Interval::EMPTY.div(&Interval::new(0, 1), &mut w).is_empty());
        assert!(w.is_empty());
    }

    #[test]
    fn test_filters() {
        let x = Interval::new(0, 10);
        let five = Interval::singleton(5);

        assert_eq!(x.filter(CmpOp::Eq, &five), Interval::singleton(5));
        assert_eq!(x.filter(CmpOp::Lt, &five), Interval::new(0, 4));
        assert_eq!(x.filter(CmpOp::Le, &five), Interval::new(0, 5));
        assert_eq!(x.filter(CmpOp::Gt, &five), Interval::new(6, 10));
        assert_eq!(x.filter(CmpOp::Ge, &five), Interval::new(5, 10));

        // Infeasible restriction is empty
        assert!(x.filter(CmpOp::Gt, &Interval::singleton(20)).is_empty());
    }

    #[test]
    fn test_neq_filter() {
        let x = Interval::new(0, 10);
        let five = Interval::singleton(5);
        // Dropping an interior value is not expressible, left unchanged
        assert_eq!(x.filter(CmpOp::Ne, &five), x);
        // A singleton on a bound trims that bound
        assert_eq!(x.filter(CmpOp::Ne, &Interval::singleton(0)), Interval::new(1, 10));
        assert_eq!(x.filter(CmpOp::Ne, &Interval::singleton(10)), Interval::new(0, 9));
        // A non-singleton right side never refines
        assert_eq!(x.filter(CmpOp::Ne, &Interval::new(0, 3)), x);
        // Identical singletons are contradictory
        assert!(five.filter(CmpOp::Ne, &Interval::singleton(5)).is_empty());
        assert_eq!(five.filter(CmpOp::Ne, &Interval::singleton(6)), five);
        // No wraparound at the extremes
        let top = Interval::TOP;
        assert_eq!(
            top.filter(CmpOp::Ne, &Interval::singleton(i64::MIN)),
            Interval::new(i64::MIN + 1, i64::MAX)
        );
        assert!(Interval::singleton(i64::MAX)
            .filter(CmpOp::Ne, &Interval::singleton(i64::MAX))
            .is_empty());
    }

    #[test]
    fn test_filter_strict_bounds_at_extremes() {
        let x = Interval::TOP;
        // x < i64::MIN and x > i64::MAX are unsatisfiable, not panics
        assert_eq!(x.filter(CmpOp::Lt, &Interval::singleton(i64::MIN)), Interval::EMPTY);
        assert_eq!(
            x.filter(CmpOp::Gt, &Interval::singleton(i64::MAX)),
            Interval::EMPTY
        );
    }
}
