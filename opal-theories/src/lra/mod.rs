//! Linear real and integer arithmetic.
//!
//! The entry points are [`Simplex`] for LRA, [`solve_lia`] for LIA
//! (branch-and-bound with Gomory cuts on top of the same Simplex), and
//! [`fourier_motzkin`] as a model-free soundness oracle.

pub mod branch_bound;
pub mod cuts;
pub mod delta;
pub mod fourier_motzkin;
pub mod simplex;

pub use branch_bound::{
    solve_lia, BranchBoundConfig, BranchBoundSolver, BranchBoundStats, LiaResult,
};
pub use cuts::gomory_cut;
pub use delta::DeltaRational;
pub use fourier_motzkin::{fourier_motzkin, FmResult};
pub use simplex::{LraResult, Simplex, SimplexStats, SimplexStatus};

use crate::relation::Relation;
use num_rational::BigRational;
use num_traits::Zero;
use rustc_hash::FxHashMap;
use std::fmt;

/// Variable identifier for linear arithmetic; identifiers are dense and
/// slack variables are allocated above every input identifier.
pub type VarId = usize;

/// A linear term: variable coefficients with zero coefficients absent.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct LinearExpr {
    coeffs: FxHashMap<VarId, BigRational>,
}

impl fmt::Debug for LinearExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coeffs.is_empty() {
            return write!(f, "0");
        }
        let mut first = true;
        for v in self.sorted_vars() {
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            write!(f, "{}*x{}", self.coeffs[&v], v)?;
        }
        Ok(())
    }
}

impl LinearExpr {
    /// The zero expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (variable, coefficient) pairs; zeros are dropped and
    /// repeated variables are combined.
    pub fn from_terms(terms: impl IntoIterator<Item = (VarId, BigRational)>) -> Self {
        let mut expr = Self::new();
        for (v, c) in terms {
            expr.add_term(v, c);
        }
        expr
    }

    /// Add `c * v`, combining with an existing coefficient.
    pub fn add_term(&mut self, v: VarId, c: BigRational) {
        if c.is_zero() {
            return;
        }
        let entry = self.coeffs.entry(v).or_insert_with(BigRational::zero);
        *entry += c;
        if entry.is_zero() {
            self.coeffs.remove(&v);
        }
    }

    /// Coefficient of `v` (zero when absent).
    pub fn coeff(&self, v: VarId) -> BigRational {
        self.coeffs.get(&v).cloned().unwrap_or_else(BigRational::zero)
    }

    /// True iff this is the zero expression.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Number of variables with non-zero coefficient.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// True iff no variable occurs.
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// The variables in ascending order.
    pub fn sorted_vars(&self) -> Vec<VarId> {
        let mut vars: Vec<VarId> = self.coeffs.keys().copied().collect();
        vars.sort_unstable();
        vars
    }

    /// Iterate over (variable, coefficient) pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&VarId, &BigRational)> {
        self.coeffs.iter()
    }

    /// `self + k * other`.
    pub fn add_scaled(&self, other: &LinearExpr, k: &BigRational) -> LinearExpr {
        let mut out = self.clone();
        for (v, c) in other.iter() {
            out.add_term(*v, c * k);
        }
        out
    }

    /// Multiply every coefficient by `k`.
    pub fn scale(&self, k: &BigRational) -> LinearExpr {
        if k.is_zero() {
            return LinearExpr::new();
        }
        LinearExpr {
            coeffs: self.coeffs.iter().map(|(v, c)| (*v, c * k)).collect(),
        }
    }

    /// Replace `v` by `replacement` (which must not mention `v`).
    pub fn substitute(&self, v: VarId, replacement: &LinearExpr) -> LinearExpr {
        let c = self.coeff(v);
        if c.is_zero() {
            return self.clone();
        }
        let mut out = self.clone();
        out.add_term(v, -c.clone());
        out.add_scaled(replacement, &c)
    }

    /// Evaluate under a delta-rational assignment (absent variables are 0).
    pub fn eval(&self, assignment: &FxHashMap<VarId, DeltaRational>) -> DeltaRational {
        let mut acc = DeltaRational::zero();
        for (v, c) in self.iter() {
            if let Some(val) = assignment.get(v) {
                acc = acc.add(&val.scale(c));
            }
        }
        acc
    }

    /// Evaluate under a plain rational assignment (absent variables are 0).
    pub fn eval_rational(&self, assignment: &FxHashMap<VarId, BigRational>) -> BigRational {
        let mut acc = BigRational::zero();
        for (v, c) in self.iter() {
            if let Some(val) = assignment.get(v) {
                acc += c * val;
            }
        }
        acc
    }
}

/// A linear constraint `expr rel bound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Left-hand linear term.
    pub expr: LinearExpr,
    /// Comparison relation.
    pub rel: Relation,
    /// Right-hand rational bound.
    pub bound: BigRational,
}

impl Constraint {
    /// Create a constraint.
    pub fn new(expr: LinearExpr, rel: Relation, bound: BigRational) -> Self {
        Self { expr, rel, bound }
    }

    /// True iff the rational assignment satisfies the constraint.
    pub fn is_satisfied_by(&self, assignment: &FxHashMap<VarId, BigRational>) -> bool {
        self.rel.eval(&self.expr.eval_rational(assignment), &self.bound)
    }

    /// The complementary constraint, when the relation has one.
    pub fn complement(&self) -> Option<Constraint> {
        self.rel
            .complement()
            .map(|rel| Constraint::new(self.expr.clone(), rel, self.bound.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn rat(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    #[test]
    fn zero_coefficients_are_absent() {
        let mut e = LinearExpr::from_terms([(0, rat(2)), (1, rat(3))]);
        e.add_term(0, rat(-2));
        assert_eq!(e.len(), 1);
        assert!(e.coeff(0).is_zero());
        assert_eq!(e.coeff(1), rat(3));
    }

    #[test]
    fn substitute_eliminates_variable() {
        // e = 2x + y with x := 3z - y gives 6z - y.
        let e = LinearExpr::from_terms([(0, rat(2)), (1, rat(1))]);
        let r = LinearExpr::from_terms([(2, rat(3)), (1, rat(-1))]);
        let s = e.substitute(0, &r);
        assert!(s.coeff(0).is_zero());
        assert_eq!(s.coeff(2), rat(6));
        assert_eq!(s.coeff(1), rat(-1));
    }

    #[test]
    fn constraint_evaluation() {
        let e = LinearExpr::from_terms([(0, rat(1)), (1, rat(1))]);
        let c = Constraint::new(e, Relation::Le, rat(3));
        let mut a = FxHashMap::default();
        a.insert(0, rat(2));
        a.insert(1, rat(0));
        assert!(c.is_satisfied_by(&a));
        a.insert(1, rat(2));
        assert!(!c.is_satisfied_by(&a));
    }
}
