//! Abstract store: a finite map from variable names to intervals.
//!
//! A missing variable means ⊤, so the store only materializes what the
//! analysis has learned. The store also carries an explicit bottom flag:
//! bottom is the state of a program point the solver has not reached yet
//! (and of provably unreachable code), and it is the identity of the
//! pointwise join. Binding a variable to the empty interval collapses the
//! whole store to bottom, since no concrete state can produce an empty
//! range for a variable.
//!
//! Keys live in a `BTreeMap` so iteration, equality checks, and printed
//! dumps are deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::interval::Interval;

/// Pointwise lifting of the interval lattice to variable environments.
#[derive(Debug, Clone, Default)]
pub struct Store {
    bindings: BTreeMap<String, Interval>,
    is_bottom: bool,
}

impl Store {
    /// The store that knows nothing: every variable is ⊤.
    pub fn new() -> Self {
        Store { bindings: BTreeMap::new(), is_bottom: false }
    }

    /// The unreachable store (⊥).
    pub fn bottom() -> Self {
        Store { bindings: BTreeMap::new(), is_bottom: true }
    }

    pub fn is_bottom(&self) -> bool {
        self.is_bottom
    }

    /// Interval bound to `var`: ⊤ when absent, ⊥ when the store is bottom.
    pub fn get(&self, var: &str) -> Interval {
        if self.is_bottom {
            return Interval::EMPTY;
        }
        self.bindings.get(var).copied().unwrap_or(Interval::TOP)
    }

    /// Binds `var`. An empty interval collapses the store to bottom.
    pub fn set(&mut self, var: impl Into<String>, interval: Interval) {
        if self.is_bottom {
            return;
        }
        if interval.is_empty() {
            self.bindings.clear();
            self.is_bottom = true;
        } else {
            self.bindings.insert(var.into(), interval);
        }
    }

    fn union_keys<'a>(&'a self, other: &'a Store) -> BTreeSet<&'a str> {
        self.bindings
            .keys()
            .chain(other.bindings.keys())
            .map(String::as_str)
            .collect()
    }

    /// Pointwise join over the union of keys.
    pub fn join(&self, other: &Store) -> Store {
        if self.is_bottom {
            return other.clone();
        }
        if other.is_bottom {
            return self.clone();
        }
        let mut result = Store::new();
        for var in self.union_keys(other) {
            result.set(var, self.get(var).join(&other.get(var)));
        }
        result
    }

    /// Pointwise widening `self ∇ next`; a bottom `self` starts the chain.
    pub fn widen(&self, next: &Store) -> Store {
        if self.is_bottom {
            return next.clone();
        }
        if next.is_bottom {
            return self.clone();
        }
        let mut result = Store::new();
        for var in self.union_keys(next) {
            result.set(var, self.get(var).widen(&next.get(var)));
        }
        result
    }

    /// Pointwise order `self ⊑ other`.
    pub fn le(&self, other: &Store) -> bool {
        if self.is_bottom {
            return true;
        }
        if other.is_bottom {
            return false;
        }
        self.union_keys(other)
            .into_iter()
            .all(|var| self.get(var).le(&other.get(var)))
    }

    /// Bindings in name order (empty for a bottom store).
    pub fn iter(&self) -> impl Iterator<Item = (&str, Interval)> {
        self.bindings.iter().map(|(name, iv)| (name.as_str(), *iv))
    }
}

impl PartialEq for Store {
    /// Pointwise equality over the union of keys, absent ≡ ⊤. All bottom
    /// stores are equal.
    fn eq(&self, other: &Self) -> bool {
        if self.is_bottom || other.is_bottom {
            return self.is_bottom == other.is_bottom;
        }
        self.union_keys(other)
            .into_iter()
            .all(|var| self.get(var) == other.get(var))
    }
}

impl Eq for Store {}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bottom {
            return write!(f, "⊥");
        }
        let mut first = true;
        for (name, interval) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", name, interval)?;
            first = false;
        }
        Ok(())
    }
}
