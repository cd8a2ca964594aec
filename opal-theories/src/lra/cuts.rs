//! Gomory cutting planes.
//!
//! A basic integer-constrained variable with fractional value yields a
//! valid inequality from its tableau row: shifting every non-basic
//! variable to the bound it currently sits on turns the row into
//! `x = β + Σ g_j·z_j` with `z_j >= 0`, and the mixed-integer Gomory cut
//! over the fractional parts excludes the current vertex while keeping
//! every integer point of the system.
//!
//! Rows whose non-basic variables are not all sitting on delta-free
//! bounds produce no cut; branch-and-bound covers those nodes.

use super::simplex::Simplex;
use super::{Constraint, LinearExpr, VarId};
use crate::relation::Relation;
use num_rational::BigRational;
use num_traits::{One, Zero};
use opal_math::rational::{fract_rational, is_integer};
use rustc_hash::FxHashSet;

/// Which bound a non-basic variable sits on.
enum AtBound {
    Lower(BigRational),
    Upper(BigRational),
}

/// Derive a Gomory cut from the row of `basic`, an integer-constrained
/// basic variable with fractional value.
///
/// Returns `None` when the row does not meet the side conditions (value
/// has an infinitesimal part, value is integral, or some non-basic
/// variable is off its bounds).
pub fn gomory_cut(
    simplex: &Simplex,
    basic: VarId,
    int_vars: &FxHashSet<VarId>,
) -> Option<Constraint> {
    let row = simplex.row(basic)?;
    let beta = simplex.value(basic);
    if !beta.is_rational() {
        return None;
    }
    let f0 = fract_rational(&beta.value);
    if f0.is_zero() {
        return None;
    }
    let one_minus_f0 = BigRational::one() - &f0;

    let mut expr = LinearExpr::new();
    let mut rhs = BigRational::one();

    for j in row.sorted_vars() {
        let a = row.coeff(j);
        let value = simplex.value(j);
        let at = at_bound(simplex, j, value)?;

        // Shift to the at-bound origin: z_j = y_j - l_j or u_j - y_j,
        // both non-negative on the feasible region.
        let (bound_value, sign) = match &at {
            AtBound::Lower(l) => (l.clone(), BigRational::one()),
            AtBound::Upper(u) => (u.clone(), -BigRational::one()),
        };
        // Row in shifted form: x + a'_j z_j + ... = beta with a'_j = -sign*a.
        let a_shifted = -(&sign * &a);

        let integral_shift = int_vars.contains(&j) && is_integer(&bound_value);
        let phi = if integral_shift {
            let fj = fract_rational(&a_shifted);
            if fj.is_zero() {
                BigRational::zero()
            } else if fj <= f0 {
                &fj / &f0
            } else {
                (BigRational::one() - &fj) / &one_minus_f0
            }
        } else if a_shifted > BigRational::zero() {
            &a_shifted / &f0
        } else {
            -&a_shifted / &one_minus_f0
        };
        if phi.is_zero() {
            continue;
        }

        // phi * z_j expressed over y_j moves phi*bound into the rhs;
        // slacks are replaced by their defining terms so the cut speaks
        // the language of the original variables.
        let coeff = &phi * &sign;
        expr = expr.add_scaled(&simplex.definition(j), &coeff);
        rhs += &coeff * &bound_value;
    }

    Some(Constraint::new(expr, Relation::Ge, rhs))
}

fn at_bound(
    simplex: &Simplex,
    v: VarId,
    value: &super::delta::DeltaRational,
) -> Option<AtBound> {
    if let Some(lb) = simplex.lower_bound(v) {
        if value == lb && lb.is_rational() {
            return Some(AtBound::Lower(lb.value.clone()));
        }
    }
    if let Some(ub) = simplex.upper_bound(v) {
        if value == ub && ub.is_rational() {
            return Some(AtBound::Upper(ub.value.clone()));
        }
    }
    None
}
