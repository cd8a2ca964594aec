//! Property-based tests for interval and interval-union containment.

use opal_math::{Interval, IntervalUnion};
use proptest::prelude::*;

/// Endpoints on a coarse dyadic grid so f64 arithmetic is exact and the
/// containment assertions are not muddied by rounding.
fn grid() -> impl Strategy<Value = f64> {
    (-32i32..=32).prop_map(|n| f64::from(n) / 4.0)
}

fn interval() -> impl Strategy<Value = Interval<f64>> {
    (grid(), grid()).prop_map(|(a, b)| Interval::new(a.min(b), a.max(b)))
}

fn union() -> impl Strategy<Value = IntervalUnion<f64>> {
    prop::collection::vec(interval(), 0..4).prop_map(IntervalUnion::from_parts)
}

proptest! {
    /// reduce keeps components sorted and pairwise disjoint.
    #[test]
    fn union_is_canonical(u in union()) {
        let parts = u.parts();
        for w in parts.windows(2) {
            prop_assert!(w[0].hi < w[1].lo);
        }
        for p in parts {
            prop_assert!(!p.is_empty());
        }
    }

    /// Intersection is a subset of both operands.
    #[test]
    fn intersection_is_subset(a in union(), b in union()) {
        let c = a.intersect(&b);
        prop_assert!(c.is_subset_of(&a));
        prop_assert!(c.is_subset_of(&b));
    }

    /// Addition contains the sum of any contained grid points.
    #[test]
    fn addition_contains_point_sums(a in interval(), b in interval(), t in 0f64..=1.0, s in 0f64..=1.0) {
        prop_assume!(!a.is_empty() && !b.is_empty());
        // Pick interior points by convex combination on the grid; with
        // finite endpoints this is exact enough for containment.
        let x = a.lo + (a.hi - a.lo) * (t * 4.0).floor() / 4.0;
        let y = b.lo + (b.hi - b.lo) * (s * 4.0).floor() / 4.0;
        prop_assert!(a.add(&b).contains(x + y));
    }

    /// Even powers are non-negative and contain squares of members.
    #[test]
    fn square_contains_members(a in interval()) {
        prop_assume!(!a.is_empty());
        let sq = a.pow(2);
        prop_assert!(sq.lo >= 0.0);
        prop_assert!(sq.contains(a.lo * a.lo));
        prop_assert!(sq.contains(a.hi * a.hi));
    }

    /// Root closure inverts powers: x in root_k(I) for x with x^k in I.
    #[test]
    fn root_closure_covers(a in interval(), k in 1u32..4) {
        prop_assume!(!a.is_empty());
        let powered = a.pow(k);
        let back = powered.nth_root(k);
        prop_assert!(back.contains(a.lo) || (k % 2 == 0 && back.contains(-a.lo)));
        prop_assert!(back.contains(a.hi) || (k % 2 == 0 && back.contains(-a.hi)));
    }

    /// Diameter never increases under intersection.
    #[test]
    fn intersection_shrinks_diameter(a in union(), b in union()) {
        let c = a.intersect(&b);
        prop_assert!(c.diameter() <= a.diameter());
        prop_assert!(c.diameter() <= b.diameter());
    }
}
