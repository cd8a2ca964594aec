//! Simplex in general form with per-variable bounds.
//!
//! Each input constraint `t rel b` gets a fresh slack variable `s` with
//! basis row `s ↦ t` and a bound on `s` derived from the relation; strict
//! relations become non-strict bounds with an infinitesimal offset (see
//! [`DeltaRational`]). The pivot loop repairs violated basic variables
//! under Bland's rule (smallest id first, for both the leaving and the
//! entering variable), which excludes cycling.
//!
//! Tableau invariants, maintained by every pivot:
//! - basic and non-basic variable sets are disjoint;
//! - the assignment of every basic variable equals the evaluation of its
//!   row under the current assignment;
//! - every non-basic variable satisfies its bounds.

use super::delta::DeltaRational;
use super::{Constraint, LinearExpr, VarId};
use crate::relation::Relation;
use num_rational::BigRational;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Verdict of the pivot loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplexStatus {
    /// A satisfying assignment exists (see [`Simplex::model`]).
    Sat,
    /// The constraints are unsatisfiable.
    Unsat,
}

/// Outcome of a one-shot solve, with the model restricted to the
/// original (non-slack) variables.
#[derive(Debug, Clone, PartialEq)]
pub enum LraResult {
    /// Satisfiable with the given rational assignment.
    Sat(FxHashMap<VarId, BigRational>),
    /// Unsatisfiable.
    Unsat,
}

/// Counters for the pivot loop.
#[derive(Debug, Clone, Default)]
pub struct SimplexStats {
    /// Pivots performed.
    pub pivots: u64,
    /// Constant rows dropped before pivoting.
    pub zero_rows_dropped: u64,
}

/// Direction in which a violated basic variable must move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
    MustIncrease,
    MustDecrease,
}

/// Simplex tableau: basis rows, bounds and the current assignment.
pub struct Simplex {
    /// Basic variable -> linear term over non-basic variables.
    basis: FxHashMap<VarId, LinearExpr>,
    /// Lower bounds (slack variables only).
    lower: FxHashMap<VarId, DeltaRational>,
    /// Upper bounds (slack variables only).
    upper: FxHashMap<VarId, DeltaRational>,
    /// Current value of every variable, basic and non-basic.
    assignment: FxHashMap<VarId, DeltaRational>,
    /// First slack id; original variables are strictly below it.
    first_slack: VarId,
    /// Original variable ids, ascending.
    original_vars: Vec<VarId>,
    /// The input constraints, kept for δ instantiation.
    constraints: Vec<Constraint>,
    /// Set once a constant row contradicts its bound.
    infeasible: bool,
    /// Result of the last `check` call.
    status: Option<SimplexStatus>,
    stats: SimplexStats,
}

impl Simplex {
    /// Initialize the tableau for a constraint list.
    pub fn new(constraints: &[Constraint]) -> Self {
        let mut original_vars: Vec<VarId> = Vec::new();
        for c in constraints {
            original_vars.extend(c.expr.sorted_vars());
        }
        original_vars.sort_unstable();
        original_vars.dedup();
        let first_slack = original_vars.iter().max().map_or(0, |m| m + 1);

        let mut solver = Self {
            basis: FxHashMap::default(),
            lower: FxHashMap::default(),
            upper: FxHashMap::default(),
            assignment: FxHashMap::default(),
            first_slack,
            original_vars,
            constraints: constraints.to_vec(),
            infeasible: false,
            status: None,
            stats: SimplexStats::default(),
        };
        for &v in &solver.original_vars {
            solver.assignment.insert(v, DeltaRational::zero());
        }

        for (i, c) in constraints.iter().enumerate() {
            let slack = first_slack + i;
            solver.basis.insert(slack, c.expr.clone());
            solver.assignment.insert(slack, DeltaRational::zero());
            match c.rel {
                Relation::Le => {
                    solver
                        .upper
                        .insert(slack, DeltaRational::from_rational(c.bound.clone()));
                }
                Relation::Lt => {
                    solver.upper.insert(
                        slack,
                        DeltaRational::with_delta(c.bound.clone(), -BigRational::one()),
                    );
                }
                Relation::Ge => {
                    solver
                        .lower
                        .insert(slack, DeltaRational::from_rational(c.bound.clone()));
                }
                Relation::Gt => {
                    solver.lower.insert(
                        slack,
                        DeltaRational::with_delta(c.bound.clone(), BigRational::one()),
                    );
                }
                Relation::Eq => {
                    let b = DeltaRational::from_rational(c.bound.clone());
                    solver.lower.insert(slack, b.clone());
                    solver.upper.insert(slack, b);
                }
            }
        }
        solver.eliminate_zero_rows();
        solver
    }

    /// One-shot convenience: initialize, pivot, extract the model.
    pub fn solve(constraints: &[Constraint]) -> LraResult {
        let mut simplex = Self::new(constraints);
        match simplex.check() {
            SimplexStatus::Sat => LraResult::Sat(simplex.model()),
            SimplexStatus::Unsat => LraResult::Unsat,
        }
    }

    /// Pivot statistics.
    pub fn stats(&self) -> &SimplexStats {
        &self.stats
    }

    /// Rows whose linear term is identically zero are constant
    /// constraints: a violated bound is an immediate contradiction, a
    /// satisfied one carries no information. Drop them before pivoting.
    fn eliminate_zero_rows(&mut self) {
        let zero_rows: Vec<VarId> = self
            .basis
            .iter()
            .filter(|(_, row)| row.is_zero())
            .map(|(v, _)| *v)
            .collect();
        for slack in zero_rows {
            let value = DeltaRational::zero();
            if self.violates_bounds(slack, &value) {
                self.infeasible = true;
            }
            self.basis.remove(&slack);
            self.lower.remove(&slack);
            self.upper.remove(&slack);
            self.assignment.remove(&slack);
            self.stats.zero_rows_dropped += 1;
        }
    }

    fn violates_bounds(&self, v: VarId, value: &DeltaRational) -> bool {
        if let Some(lb) = self.lower.get(&v) {
            if value < lb {
                return true;
            }
        }
        if let Some(ub) = self.upper.get(&v) {
            if value > ub {
                return true;
            }
        }
        false
    }

    /// Run the pivot loop to a verdict.
    pub fn check(&mut self) -> SimplexStatus {
        if self.infeasible {
            self.status = Some(SimplexStatus::Unsat);
            return SimplexStatus::Unsat;
        }
        loop {
            let Some((basic, violation, target)) = self.find_violated_basic() else {
                debug!(pivots = self.stats.pivots, "simplex sat");
                self.status = Some(SimplexStatus::Sat);
                return SimplexStatus::Sat;
            };
            let Some(entering) = self.find_entering(basic, violation) else {
                debug!(pivots = self.stats.pivots, basic, "simplex unsat");
                self.status = Some(SimplexStatus::Unsat);
                return SimplexStatus::Unsat;
            };
            trace!(basic, entering, ?violation, "pivot");
            self.pivot(basic, entering, target);
            self.stats.pivots += 1;
        }
    }

    /// Smallest-id basic variable with a violated bound, with the
    /// direction it must move and the bound it must reach.
    fn find_violated_basic(&self) -> Option<(VarId, Violation, DeltaRational)> {
        let mut basics: Vec<VarId> = self.basis.keys().copied().collect();
        basics.sort_unstable();
        for b in basics {
            let value = &self.assignment[&b];
            if let Some(lb) = self.lower.get(&b) {
                if value < lb {
                    return Some((b, Violation::MustIncrease, lb.clone()));
                }
            }
            if let Some(ub) = self.upper.get(&b) {
                if value > ub {
                    return Some((b, Violation::MustDecrease, ub.clone()));
                }
            }
        }
        None
    }

    /// Smallest-id non-basic variable in the row of `basic` whose
    /// coefficient and bound state permit progress.
    ///
    /// To increase the basic variable, a positive-coefficient variable
    /// must have room above its value, a negative-coefficient one room
    /// below; decreasing mirrors this. Unbounded variables always have
    /// room, which keeps every non-basic inside its bounds after the
    /// pivot.
    fn find_entering(&self, basic: VarId, violation: Violation) -> Option<VarId> {
        let row = &self.basis[&basic];
        for n in row.sorted_vars() {
            let c = row.coeff(n);
            debug_assert!(!c.is_zero());
            let positive = c > BigRational::zero();
            let eligible = match violation {
                Violation::MustIncrease => {
                    (positive && self.has_room_above(n)) || (!positive && self.has_room_below(n))
                }
                Violation::MustDecrease => {
                    (positive && self.has_room_below(n)) || (!positive && self.has_room_above(n))
                }
            };
            if eligible {
                return Some(n);
            }
        }
        None
    }

    fn has_room_above(&self, v: VarId) -> bool {
        self.upper.get(&v).is_none_or(|ub| &self.assignment[&v] < ub)
    }

    fn has_room_below(&self, v: VarId) -> bool {
        self.lower.get(&v).is_none_or(|lb| &self.assignment[&v] > lb)
    }

    /// Swap `basic` out of the basis for `entering`, moving `basic` to
    /// exactly `target` and re-evaluating every row.
    fn pivot(&mut self, basic: VarId, entering: VarId, target: DeltaRational) {
        let row = self
            .basis
            .remove(&basic)
            .expect("pivot called with variable not in basis");
        let c = row.coeff(entering);
        assert!(!c.is_zero(), "entering variable absent from pivot row");

        // Solve `basic = row` for the entering variable:
        // entering = basic/c - (row - c*entering)/c
        let inv = BigRational::one() / &c;
        let mut solved = LinearExpr::new();
        solved.add_term(basic, inv.clone());
        for (v, a) in row.iter() {
            if *v != entering {
                solved.add_term(*v, -(a * &inv));
            }
        }

        // The entering variable leaves every other row.
        for r in self.basis.values_mut() {
            *r = r.substitute(entering, &solved);
        }
        self.basis.insert(entering, solved);

        // The leaving variable sits exactly on its violated bound; all
        // basic values follow from their rows.
        self.assignment.insert(basic, target);
        let updates: Vec<(VarId, DeltaRational)> = self
            .basis
            .iter()
            .map(|(v, r)| (*v, r.eval(&self.assignment)))
            .collect();
        for (v, value) in updates {
            self.assignment.insert(v, value);
        }
    }

    /// Rational model for the original variables; callable after a `Sat`
    /// verdict.
    pub fn model(&self) -> FxHashMap<VarId, BigRational> {
        assert_eq!(
            self.status,
            Some(SimplexStatus::Sat),
            "model requested without a sat verdict"
        );
        let delta = self.concretize_delta();
        self.original_vars
            .iter()
            .map(|v| (*v, self.assignment[v].instantiate(&delta)))
            .collect()
    }

    /// A concrete positive value for δ small enough that every original
    /// constraint holds under the instantiated assignment.
    fn concretize_delta(&self) -> BigRational {
        let two = BigRational::from_integer(2.into());
        let mut delta = BigRational::one();
        for c in &self.constraints {
            let value = c.expr.eval(&self.assignment);
            let (v, d) = (&value.value, &value.delta);
            let relevant = match c.rel {
                Relation::Le | Relation::Lt => d > &BigRational::zero() && v < &c.bound,
                Relation::Ge | Relation::Gt => d < &BigRational::zero() && v > &c.bound,
                Relation::Eq => false,
            };
            if relevant {
                // At most half the distance to the bound, scaled by the
                // infinitesimal coefficient.
                let cap = (&c.bound - v) / (d * &two);
                if cap < delta {
                    delta = cap;
                }
            }
        }
        delta
    }

    /// Value of a variable in the delta-rational assignment.
    pub(crate) fn value(&self, v: VarId) -> &DeltaRational {
        &self.assignment[&v]
    }

    /// The basis row of `v`, if `v` is basic.
    pub(crate) fn row(&self, v: VarId) -> Option<&LinearExpr> {
        self.basis.get(&v)
    }

    /// Lower bound of `v`, if any.
    pub(crate) fn lower_bound(&self, v: VarId) -> Option<&DeltaRational> {
        self.lower.get(&v)
    }

    /// Upper bound of `v`, if any.
    pub(crate) fn upper_bound(&self, v: VarId) -> Option<&DeltaRational> {
        self.upper.get(&v)
    }

    /// The defining linear term of `v` over original variables: a slack
    /// stands for the left-hand side of its constraint, an original
    /// variable for itself.
    pub(crate) fn definition(&self, v: VarId) -> LinearExpr {
        if v >= self.first_slack {
            self.constraints[v - self.first_slack].expr.clone()
        } else {
            LinearExpr::from_terms([(v, BigRational::one())])
        }
    }

    /// Verify the tableau invariants; panics on violation.
    ///
    /// Exposed for the test suites; cheap enough to call after every
    /// solve on small instances.
    pub fn assert_invariants(&self) {
        for (b, row) in &self.basis {
            for v in row.sorted_vars() {
                assert!(
                    !self.basis.contains_key(&v),
                    "basic variable {v} appears in the row of {b}"
                );
            }
            assert_eq!(
                self.assignment[b],
                row.eval(&self.assignment),
                "assignment of basic {b} diverges from its row"
            );
        }
        for (v, value) in &self.assignment {
            if self.basis.contains_key(v) {
                continue;
            }
            if let Some(lb) = self.lower.get(v) {
                assert!(value >= lb, "non-basic {v} below its lower bound");
            }
            if let Some(ub) = self.upper.get(v) {
                assert!(value <= ub, "non-basic {v} above its upper bound");
            }
        }
    }
}
