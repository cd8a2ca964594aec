//! Contraction properties of the ICP engine: domains never widen and
//! never exclude a real solution.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use opal_math::{Interval, IntervalUnion, Monomial, Polynomial};
use opal_theories::nra::{refine, DomainMap, IcpConfig, PolyConstraint};
use opal_theories::Relation;
use proptest::prelude::*;

fn rat(n: i64, d: i64) -> BigRational {
    BigRational::new(BigInt::from(n), BigInt::from(d))
}

/// A small polynomial over two variables: up to three terms with degrees
/// at most 2 per variable and single-digit coefficients.
fn poly_strategy() -> impl Strategy<Value = Polynomial> {
    prop::collection::vec((-3i64..=3, 0u32..3, 0u32..3), 1..4).prop_map(|raw| {
        Polynomial::from_terms(
            raw.into_iter()
                .map(|(c, px, py)| {
                    (
                        BigRational::from_integer(BigInt::from(c)),
                        Monomial::from_powers([(0, px), (1, py)]),
                    )
                })
                .collect(),
        )
    })
}

fn relation_strategy() -> impl Strategy<Value = Relation> {
    prop_oneof![
        Just(Relation::Le),
        Just(Relation::Eq),
        Just(Relation::Ge),
    ]
}

fn constraints_strategy() -> impl Strategy<Value = Vec<PolyConstraint>> {
    prop::collection::vec(
        (poly_strategy(), relation_strategy()).prop_map(|(p, r)| PolyConstraint::new(p, r)),
        1..3,
    )
}

/// Exact evaluation of `poly` at a rational point.
fn eval_at(poly: &Polynomial, x: &BigRational, y: &BigRational) -> BigRational {
    let mut acc = BigRational::zero();
    for (c, m) in poly.terms() {
        let mut term = c.clone();
        term *= opal_math::pow_uint(x, m.degree(0));
        term *= opal_math::pow_uint(y, m.degree(1));
        acc += term;
    }
    acc
}

fn initial_domains() -> DomainMap {
    let mut domains = DomainMap::default();
    domains.insert(0, IntervalUnion::single(Interval::new(-2.0, 2.0)));
    domains.insert(1, IntervalUnion::single(Interval::new(-2.0, 2.0)));
    domains
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Refined domains are component-wise subsets of the initial ones.
    #[test]
    fn domains_never_widen(cs in constraints_strategy()) {
        let initial = initial_domains();
        let refinement = refine(&cs, &initial, IcpConfig::default());
        for (v, d) in &refinement.domains {
            prop_assert!(
                d.is_subset_of(&initial[v]),
                "domain of x{v} widened to {d:?}"
            );
        }
    }

    /// No real solution under the initial domains is ever excluded: every
    /// grid point satisfying all constraints stays inside the refined
    /// domains.
    #[test]
    fn solutions_stay_covered(cs in constraints_strategy()) {
        let initial = initial_domains();
        let refinement = refine(&cs, &initial, IcpConfig { max_iterations: 30 });

        // Quarter-integer grid over the initial box; f64 conversion is
        // exact for these points.
        for nx in -8i64..=8 {
            for ny in -8i64..=8 {
                let (x, y) = (rat(nx, 4), rat(ny, 4));
                let satisfies = cs.iter().all(|c| {
                    let value = eval_at(&c.poly, &x, &y);
                    c.rel.eval(&value, &BigRational::zero())
                });
                if !satisfies {
                    continue;
                }
                prop_assert!(!refinement.conflict, "conflict despite solution at ({x}, {y})");
                let (xf, yf) = (nx as f64 / 4.0, ny as f64 / 4.0);
                prop_assert!(
                    refinement.domains[&0].contains(xf),
                    "({x}, {y}) satisfies all constraints but x left {:?}",
                    refinement.domains[&0]
                );
                prop_assert!(
                    refinement.domains[&1].contains(yf),
                    "({x}, {y}) satisfies all constraints but y left {:?}",
                    refinement.domains[&1]
                );
            }
        }
    }
}
