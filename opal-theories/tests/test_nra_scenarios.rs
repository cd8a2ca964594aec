//! Concrete non-linear scenarios for the ICP engine.

use num_bigint::BigInt;
use num_rational::BigRational;
use opal_theories::nra::{refine, DomainMap, IcpConfig, PolyConstraint};
use opal_theories::Relation;
use opal_math::{Interval, IntervalUnion, Monomial, Polynomial};

fn rat(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

fn dom(lo: f64, hi: f64) -> IntervalUnion<f64> {
    IntervalUnion::single(Interval::new(lo, hi))
}

#[test]
fn product_of_squares_keeps_zero() {
    // x^2 * y^2 = 0 with x, y in [-1, 1]: zero stays in both domains and
    // no diameter grows.
    let poly = Polynomial::from_terms(vec![(rat(1), Monomial::from_powers([(0, 2), (1, 2)]))]);
    let mut initial = DomainMap::default();
    initial.insert(0, dom(-1.0, 1.0));
    initial.insert(1, dom(-1.0, 1.0));

    let refinement = refine(
        &[PolyConstraint::new(poly, Relation::Eq)],
        &initial,
        IcpConfig::default(),
    );
    assert!(!refinement.conflict);
    for v in [0, 1] {
        let d = &refinement.domains[&v];
        assert!(d.contains(0.0), "zero left the domain of x{v}");
        assert!(d.is_subset_of(&initial[&v]));
        assert!(d.diameter() <= initial[&v].diameter());
    }
}

#[test]
fn quadratic_contracts_toward_roots() {
    // x^2 + 50x + 561 = 0 has roots -33 and -17; starting from
    // [-34, -16] the domain tightens around them without losing either.
    let poly = Polynomial::from_terms(vec![
        (rat(1), Monomial::from_var_power(0, 2)),
        (rat(50), Monomial::from_var(0)),
        (rat(561), Monomial::unit()),
    ]);
    let mut initial = DomainMap::default();
    initial.insert(0, dom(-34.0, -16.0));

    let refinement = refine(
        &[PolyConstraint::new(poly, Relation::Eq)],
        &initial,
        IcpConfig { max_iterations: 60 },
    );
    assert!(!refinement.conflict);
    let d = &refinement.domains[&0];
    assert!(d.contains(-33.0) && d.contains(-17.0));
    assert!(d.is_subset_of(&initial[&0]));
    assert!(d.diameter() < initial[&0].diameter());
    // The gap between the roots opens up or the hull tightens; either
    // way the envelope ends strictly inside the seed interval.
    let hull = d.hull();
    assert!(hull.lo >= -34.0 && hull.hi <= -16.0);
}

#[test]
fn infeasible_equation_empties_a_domain() {
    // x^2 = -1 over the reals.
    let poly = Polynomial::from_terms(vec![
        (rat(1), Monomial::from_var_power(0, 2)),
        (rat(1), Monomial::unit()),
    ]);
    let mut initial = DomainMap::default();
    initial.insert(0, dom(-10.0, 10.0));
    let refinement = refine(
        &[PolyConstraint::new(poly, Relation::Eq)],
        &initial,
        IcpConfig::default(),
    );
    assert!(refinement.conflict);
}

#[test]
fn default_budget_is_bounded() {
    // The engine stops after its iteration budget even on a constraint
    // that keeps contracting forever (x = x/2 style fixpoint at 0).
    let poly = Polynomial::from_terms(vec![
        (rat(1), Monomial::from_var_power(0, 3)),
        (rat(-1), Monomial::from_var(0)),
    ]);
    let mut initial = DomainMap::default();
    initial.insert(0, dom(-0.9, 0.9));
    let refinement = refine(
        &[PolyConstraint::new(poly, Relation::Eq)],
        &initial,
        IcpConfig::default(),
    );
    assert!(refinement.stats.iterations <= IcpConfig::default().max_iterations);
}
