//! Fourier-Motzkin elimination.
//!
//! A model-free decision procedure for linear constraint sets, used as a
//! soundness oracle for the Simplex solver. Variables are eliminated one
//! at a time by combining every constraint with a positive coefficient of
//! the variable against every one with a negative coefficient; a
//! combination is strict iff either premise is strict. The procedure is
//! complete but can blow up quadratically per eliminated variable, which
//! is why it stays a reference.

use super::{Constraint, LinearExpr, VarId};
use crate::relation::Relation;
use num_rational::BigRational;
use num_traits::Zero;

/// Verdict of Fourier-Motzkin elimination; no model is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FmResult {
    /// The constraint set has a solution.
    Sat,
    /// The constraint set is contradictory.
    Unsat,
}

/// `expr <= bound` (strict = false) or `expr < bound` (strict = true).
#[derive(Debug, Clone)]
struct UpperRow {
    expr: LinearExpr,
    strict: bool,
    bound: BigRational,
}

/// Decide satisfiability of a linear constraint set by eliminating all
/// variables.
pub fn fourier_motzkin(constraints: &[Constraint]) -> FmResult {
    let mut rows = Vec::new();
    for c in constraints {
        normalize(c, &mut rows);
    }

    loop {
        if let Some(verdict) = trivially_decided(&rows) {
            return verdict;
        }
        let Some(var) = smallest_var(&rows) else {
            // No variables left and nothing contradictory.
            return FmResult::Sat;
        };
        rows = eliminate(rows, var);
    }
}

/// Rewrite `expr rel bound` into at-most-upper rows.
fn normalize(c: &Constraint, out: &mut Vec<UpperRow>) {
    let (exprs, strict): (Vec<(LinearExpr, BigRational)>, bool) = match c.rel {
        Relation::Le => (vec![(c.expr.clone(), c.bound.clone())], false),
        Relation::Lt => (vec![(c.expr.clone(), c.bound.clone())], true),
        Relation::Ge => (
            vec![(c.expr.scale(&-BigRational::from_integer(1.into())), -&c.bound)],
            false,
        ),
        Relation::Gt => (
            vec![(c.expr.scale(&-BigRational::from_integer(1.into())), -&c.bound)],
            true,
        ),
        Relation::Eq => (
            vec![
                (c.expr.clone(), c.bound.clone()),
                (c.expr.scale(&-BigRational::from_integer(1.into())), -&c.bound),
            ],
            false,
        ),
    };
    for (expr, bound) in exprs {
        out.push(UpperRow {
            expr,
            strict,
            bound,
        });
    }
}

/// `Unsat` when some variable-free row is violated: `0 <= c` with
/// `c < 0`, or `0 < c` with `c <= 0`.
fn trivially_decided(rows: &[UpperRow]) -> Option<FmResult> {
    for row in rows {
        if row.expr.is_zero() {
            let zero = BigRational::zero();
            let violated = if row.strict {
                row.bound <= zero
            } else {
                row.bound < zero
            };
            if violated {
                return Some(FmResult::Unsat);
            }
        }
    }
    None
}

fn smallest_var(rows: &[UpperRow]) -> Option<VarId> {
    rows.iter()
        .flat_map(|r| r.expr.sorted_vars())
        .min()
}

/// Combine positive-coefficient rows against negative-coefficient rows so
/// that `var` cancels; rows not mentioning `var` pass through.
fn eliminate(rows: Vec<UpperRow>, var: VarId) -> Vec<UpperRow> {
    let mut positive = Vec::new();
    let mut negative = Vec::new();
    let mut rest = Vec::new();
    for row in rows {
        let c = row.expr.coeff(var);
        if c.is_zero() {
            rest.push(row);
        } else if c > BigRational::zero() {
            positive.push(row);
        } else {
            negative.push(row);
        }
    }

    for p in &positive {
        for n in &negative {
            let cp = p.expr.coeff(var);
            let cn = n.expr.coeff(var);
            // cp > 0 > cn: scale to cancel var, keeping both scales
            // positive so the inequality directions are preserved.
            let expr = p.expr.scale(&-&cn).add_scaled(&n.expr, &cp);
            debug_assert!(expr.coeff(var).is_zero());
            rest.push(UpperRow {
                expr,
                strict: p.strict || n.strict,
                bound: &p.bound * -&cn + &n.bound * &cp,
            });
        }
    }
    rest
}
