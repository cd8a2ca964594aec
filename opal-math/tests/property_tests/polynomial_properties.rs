//! Property-based tests for polynomial invariants and arithmetic laws.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use opal_math::{Monomial, Polynomial};
use proptest::prelude::*;

fn rat(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/// Strategy for a small raw term list (unnormalized, may contain zeros
/// and duplicate monomials on purpose).
fn raw_terms_strategy() -> impl Strategy<Value = Vec<(i64, Vec<(u32, u32)>)>> {
    prop::collection::vec(
        (
            -5i64..=5,
            prop::collection::vec((0u32..4, 0u32..3), 0..3),
        ),
        0..6,
    )
}

fn build(terms: Vec<(i64, Vec<(u32, u32)>)>) -> Polynomial {
    Polynomial::from_terms(
        terms
            .into_iter()
            .map(|(c, powers)| (rat(c), Monomial::from_powers(powers)))
            .collect(),
    )
}

proptest! {
    /// Smart constructor invariants: no zero coefficient, no zero
    /// exponent, pairwise distinct monomials.
    #[test]
    fn constructor_invariants(terms in raw_terms_strategy()) {
        let p = build(terms);
        for (c, m) in p.terms() {
            prop_assert!(!c.is_zero());
            for vp in m.vars() {
                prop_assert!(vp.power > 0);
            }
        }
        for i in 0..p.terms().len() {
            for j in (i + 1)..p.terms().len() {
                prop_assert!(p.terms()[i].1 != p.terms()[j].1);
            }
        }
    }

    /// p - p = 0 for every polynomial.
    #[test]
    fn sub_self_is_zero(terms in raw_terms_strategy()) {
        let p = build(terms);
        prop_assert!(p.sub(&p).is_zero());
    }

    /// Addition is commutative.
    #[test]
    fn add_commutes(a in raw_terms_strategy(), b in raw_terms_strategy()) {
        let (pa, pb) = (build(a), build(b));
        prop_assert_eq!(pa.add(&pb), pb.add(&pa));
    }

    /// Multiplication distributes over addition.
    #[test]
    fn mul_distributes(
        a in raw_terms_strategy(),
        b in raw_terms_strategy(),
        c in raw_terms_strategy(),
    ) {
        let (pa, pb, pc) = (build(a), build(b), build(c));
        let lhs = pa.mul(&pb.add(&pc));
        let rhs = pa.mul(&pb).add(&pa.mul(&pc));
        prop_assert_eq!(lhs, rhs);
    }
}
