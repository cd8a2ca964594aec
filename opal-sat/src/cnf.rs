//! Clauses, clause sets and assignment values.

use crate::literal::{Lit, Var};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Ternary assignment value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LBool {
    /// Assigned true.
    True,
    /// Assigned false.
    False,
    /// Not assigned.
    #[default]
    Undef,
}

impl LBool {
    /// The value satisfying `lit` when its variable has this value.
    #[inline]
    pub fn satisfies(self, lit: Lit) -> bool {
        match self {
            LBool::True => lit.is_pos(),
            LBool::False => !lit.is_pos(),
            LBool::Undef => false,
        }
    }

    /// The value falsifying `lit` when its variable has this value.
    #[inline]
    pub fn falsifies(self, lit: Lit) -> bool {
        match self {
            LBool::True => !lit.is_pos(),
            LBool::False => lit.is_pos(),
            LBool::Undef => false,
        }
    }

    /// Lift a concrete Boolean.
    #[inline]
    pub fn from_bool(b: bool) -> Self {
        if b {
            LBool::True
        } else {
            LBool::False
        }
    }
}

/// A duplicate-free set of literals; the empty clause denotes falsity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    lits: SmallVec<[Lit; 4]>,
}

impl Clause {
    /// Build a clause from literals, dropping duplicates.
    ///
    /// Returns `None` for tautologies (a literal and its negation), which
    /// are dropped on insertion.
    pub fn new(lits: impl IntoIterator<Item = Lit>) -> Option<Self> {
        let mut out: SmallVec<[Lit; 4]> = SmallVec::new();
        for lit in lits {
            if out.contains(&!lit) {
                return None;
            }
            if !out.contains(&lit) {
                out.push(lit);
            }
        }
        Some(Self { lits: out })
    }

    /// The literals of the clause.
    #[inline]
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Number of literals.
    #[inline]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// True for the empty clause.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }
}

/// A set of clauses in conjunctive normal form.
///
/// Duplicate and subsumed clauses are allowed; the learner may add them.
#[derive(Debug, Clone, Default)]
pub struct Cnf {
    clauses: Vec<Clause>,
    num_vars: Var,
}

impl Cnf {
    /// The empty clause set (trivially satisfiable).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one clause; tautologies are silently dropped.
    pub fn add_clause(&mut self, lits: impl IntoIterator<Item = Lit>) {
        if let Some(clause) = Clause::new(lits) {
            for lit in clause.lits() {
                if lit.var() + 1 > self.num_vars {
                    self.num_vars = lit.var() + 1;
                }
            }
            self.clauses.push(clause);
        }
    }

    /// The clauses.
    #[inline]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// One past the largest variable id occurring in any clause.
    #[inline]
    pub fn num_vars(&self) -> Var {
        self.num_vars
    }

    /// True iff every clause has a literal satisfied by `model`
    /// (variables absent from the model count as false).
    pub fn is_satisfied_by(&self, model: &FxHashMap<Var, bool>) -> bool {
        self.clauses.iter().all(|c| {
            c.lits()
                .iter()
                .any(|l| *model.get(&l.var()).unwrap_or(&false) == l.is_pos())
        })
    }
}

/// Outcome of a satisfiability call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    /// Satisfiable, with a model in which every clause holds.
    Sat(FxHashMap<Var, bool>),
    /// No satisfying assignment exists.
    Unsat,
}

impl SatResult {
    /// True for the `Sat` variant.
    pub fn is_sat(&self) -> bool {
        matches!(self, SatResult::Sat(_))
    }
}
