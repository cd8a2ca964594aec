//! Linearizing preprocessing for the ICP engine.
//!
//! Every non-linear term `coeff·m` (total degree above 1) is replaced by
//! a fresh auxiliary variable `h`, together with the side constraint
//! `h - coeff·m = 0`; the auxiliary's domain starts as the interval
//! evaluation of the term under the current domains. The state threaded
//! through the pass (fresh counter, emitted side constraints, domains) is
//! an explicit carrier rather than call-stack recursion.

use super::{DomainMap, PolyConstraint};
use crate::relation::Relation;
use num_rational::BigRational;
use num_traits::One;
use opal_math::polynomial::eval_term;
use opal_math::{IntervalUnion, Monomial, Polynomial, Var};

/// Result of the linearization pass.
#[derive(Debug, Clone)]
pub struct Linearized {
    /// The input constraints with non-linear terms replaced.
    pub constraints: Vec<PolyConstraint>,
    /// Defining constraints `h - coeff·m = 0` for the auxiliaries.
    pub side_constraints: Vec<PolyConstraint>,
    /// Input domains extended with the auxiliaries.
    pub domains: DomainMap,
    /// First auxiliary id; input variables are strictly below it.
    pub first_aux: Var,
}

/// Explicit state carrier for the pass.
struct LinearizeState {
    next_var: Var,
    side_constraints: Vec<PolyConstraint>,
    domains: DomainMap,
}

impl LinearizeState {
    /// Allocate an auxiliary for `coeff·m`, emitting its side constraint
    /// and seeding its domain from interval evaluation.
    fn introduce(&mut self, coeff: &BigRational, m: &Monomial) -> Var {
        let h = self.next_var;
        self.next_var += 1;

        let side = Polynomial::from_terms(vec![
            (BigRational::one(), Monomial::from_var(h)),
            (-coeff.clone(), m.clone()),
        ]);
        self.side_constraints
            .push(PolyConstraint::new(side, Relation::Eq));

        let domains = &self.domains;
        let dom = eval_term(coeff, m, |v| {
            domains.get(&v).cloned().unwrap_or_else(IntervalUnion::full)
        });
        self.domains.insert(h, dom);
        h
    }
}

/// Replace every non-linear term by an auxiliary variable.
pub fn linearize(constraints: &[PolyConstraint], domains: &DomainMap) -> Linearized {
    let max_input = constraints
        .iter()
        .flat_map(|c| c.poly.variables())
        .chain(domains.keys().copied())
        .max();
    let first_aux = max_input.map_or(0, |m| m + 1);

    let mut state = LinearizeState {
        next_var: first_aux,
        side_constraints: Vec::new(),
        domains: domains.clone(),
    };

    let mut linearized = Vec::with_capacity(constraints.len());
    for c in constraints {
        let mut terms = Vec::with_capacity(c.poly.num_terms());
        for (coeff, m) in c.poly.terms() {
            if m.total_degree() > 1 {
                let h = state.introduce(coeff, m);
                terms.push((BigRational::one(), Monomial::from_var(h)));
            } else {
                terms.push((coeff.clone(), m.clone()));
            }
        }
        linearized.push(PolyConstraint::new(Polynomial::from_terms(terms), c.rel));
    }

    // Every variable the engine will touch needs a domain.
    for c in &linearized {
        for v in c.poly.variables() {
            state.domains.entry(v).or_insert_with(IntervalUnion::full);
        }
    }

    Linearized {
        constraints: linearized,
        side_constraints: state.side_constraints,
        domains: state.domains,
        first_aux,
    }
}
