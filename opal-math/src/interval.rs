//! Closed intervals and interval unions over extended scalars.
//!
//! The interval code is parameterized over a [`Scalar`] providing ordering,
//! field operations and extended bounds (±∞). The shipped instance is
//! `f64`, whose infinities make the extended order free; the exact-rational
//! Simplex path never goes through intervals.
//!
//! All operations are conservative: the result interval contains every
//! value the operation can produce from values in the operands. Root
//! closures widen their endpoints outward by one step so containment
//! survives inexact arithmetic.

use smallvec::SmallVec;
use std::fmt;

/// Scalar bounds for interval arithmetic: total order on the extended
/// line, field operations, and directed k-th roots.
pub trait Scalar: Copy + PartialOrd + fmt::Debug {
    /// The additive identity.
    fn zero() -> Self;
    /// The multiplicative identity.
    fn one() -> Self;
    /// Negative infinity.
    fn neg_inf() -> Self;
    /// Positive infinity.
    fn pos_inf() -> Self;
    /// True for values that are neither ±∞ nor undefined.
    fn is_finite(self) -> bool;
    /// Addition on the extended line (∞ + finite = ∞).
    fn add(self, other: Self) -> Self;
    /// Subtraction on the extended line.
    fn sub(self, other: Self) -> Self;
    /// Multiplication with the interval convention `0 · ±∞ = 0`.
    fn mul(self, other: Self) -> Self;
    /// Division; caller guarantees the divisor is non-zero.
    fn div(self, other: Self) -> Self;
    /// Negation.
    fn neg(self) -> Self;
    /// Largest `k`-th root approximation from below (`self >= 0`, or odd `k`).
    fn nth_root_lower(self, k: u32) -> Self;
    /// Smallest `k`-th root approximation from above (`self >= 0`, or odd `k`).
    fn nth_root_upper(self, k: u32) -> Self;
}

impl Scalar for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn neg_inf() -> Self {
        f64::NEG_INFINITY
    }
    fn pos_inf() -> Self {
        f64::INFINITY
    }
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
    fn add(self, other: Self) -> Self {
        let r = self + other;
        if r.is_nan() {
            // ∞ + (−∞) only arises from mixing unbounded endpoints of the
            // same interval; resolve toward the unbounded side.
            if self == f64::NEG_INFINITY || other == f64::NEG_INFINITY {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        } else {
            r
        }
    }
    fn sub(self, other: Self) -> Self {
        Scalar::add(self, -other)
    }
    fn mul(self, other: Self) -> Self {
        if self == 0.0 || other == 0.0 {
            return 0.0;
        }
        self * other
    }
    fn div(self, other: Self) -> Self {
        if self == 0.0 {
            return 0.0;
        }
        self / other
    }
    fn neg(self) -> Self {
        -self
    }
    fn nth_root_lower(self, k: u32) -> Self {
        // powf is not correctly rounded; a few ulps of slack keep the
        // closure conservative.
        (0..4).fold(root(self, k), |r, _| crate::rational::next_down(r))
    }
    fn nth_root_upper(self, k: u32) -> Self {
        (0..4).fold(root(self, k), |r, _| crate::rational::next_up(r))
    }
}

fn root(x: f64, k: u32) -> f64 {
    if k == 1 || x == 0.0 {
        return x;
    }
    if x < 0.0 {
        // Odd roots only; even roots of negatives are screened by callers.
        -(-x).powf(1.0 / f64::from(k))
    } else {
        x.powf(1.0 / f64::from(k))
    }
}

/// A closed interval `[lo, hi]` over an extended scalar.
///
/// `lo <= hi` holds for every non-empty interval; the canonical empty
/// interval is `[+∞, −∞]`.
#[derive(Clone, Copy, PartialEq)]
pub struct Interval<S: Scalar> {
    /// Lower endpoint (inclusive).
    pub lo: S,
    /// Upper endpoint (inclusive).
    pub hi: S,
}

impl<S: Scalar> fmt::Debug for Interval<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[]")
        } else {
            write!(f, "[{:?}, {:?}]", self.lo, self.hi)
        }
    }
}

impl<S: Scalar> Interval<S> {
    /// Create `[lo, hi]`; yields the canonical empty interval when `lo > hi`.
    pub fn new(lo: S, hi: S) -> Self {
        if lo > hi {
            Self::empty()
        } else {
            Self { lo, hi }
        }
    }

    /// The canonical empty interval.
    pub fn empty() -> Self {
        Self {
            lo: S::pos_inf(),
            hi: S::neg_inf(),
        }
    }

    /// The whole extended line `(−∞, +∞)`.
    pub fn full() -> Self {
        Self {
            lo: S::neg_inf(),
            hi: S::pos_inf(),
        }
    }

    /// The point interval `[v, v]`.
    pub fn point(v: S) -> Self {
        Self { lo: v, hi: v }
    }

    /// True iff no value lies in the interval.
    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    /// True iff `v` lies in the interval.
    pub fn contains(&self, v: S) -> bool {
        !self.is_empty() && self.lo <= v && v <= self.hi
    }

    /// True iff every value of `self` lies in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.is_empty() || (!other.is_empty() && other.lo <= self.lo && self.hi <= other.hi)
    }

    /// `hi − lo`; 0 for the empty interval, ∞ when an endpoint is infinite.
    pub fn diameter(&self) -> S {
        if self.is_empty() {
            S::zero()
        } else if !self.lo.is_finite() || !self.hi.is_finite() {
            S::pos_inf()
        } else {
            self.hi.sub(self.lo)
        }
    }

    /// Intersection of two intervals.
    pub fn intersect(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::empty();
        }
        let lo = if self.lo >= other.lo { self.lo } else { other.lo };
        let hi = if self.hi <= other.hi { self.hi } else { other.hi };
        Self::new(lo, hi)
    }

    /// Smallest interval containing both operands.
    pub fn hull(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let lo = if self.lo <= other.lo { self.lo } else { other.lo };
        let hi = if self.hi >= other.hi { self.hi } else { other.hi };
        Self { lo, hi }
    }

    /// Interval addition.
    pub fn add(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::empty();
        }
        Self {
            lo: self.lo.add(other.lo),
            hi: self.hi.add(other.hi),
        }
    }

    /// Interval subtraction.
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Interval negation.
    pub fn neg(&self) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        Self {
            lo: self.hi.neg(),
            hi: self.lo.neg(),
        }
    }

    /// Interval multiplication: min/max over endpoint products.
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::empty();
        }
        let products = [
            self.lo.mul(other.lo),
            self.lo.mul(other.hi),
            self.hi.mul(other.lo),
            self.hi.mul(other.hi),
        ];
        let mut lo = products[0];
        let mut hi = products[0];
        for &p in &products[1..] {
            if p < lo {
                lo = p;
            }
            if p > hi {
                hi = p;
            }
        }
        Self { lo, hi }
    }

    /// Division by an interval not containing zero.
    ///
    /// A divisor straddling zero yields the full line (no information);
    /// the caller decides what that means for its relation.
    pub fn div(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::empty();
        }
        if other.contains(S::zero()) {
            return Self::full();
        }
        let inv = Self {
            lo: S::one().div(other.hi),
            hi: S::one().div(other.lo),
        };
        self.mul(&inv)
    }

    /// `k`-th power, exact on monotone segments.
    pub fn pow(&self, k: u32) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        if k == 0 {
            return Self::point(S::one());
        }
        if k == 1 {
            return *self;
        }
        let lo_p = pow_scalar(self.lo, k);
        let hi_p = pow_scalar(self.hi, k);
        if k % 2 == 1 {
            Self { lo: lo_p, hi: hi_p }
        } else if self.lo >= S::zero() {
            Self { lo: lo_p, hi: hi_p }
        } else if self.hi <= S::zero() {
            Self { lo: hi_p, hi: lo_p }
        } else {
            // Straddles zero: minimum 0, maximum at the larger magnitude.
            let hi = if lo_p >= hi_p { lo_p } else { hi_p };
            Self { lo: S::zero(), hi }
        }
    }

    /// `k`-th root closure: the set of `x` with `x^k` in `self`.
    ///
    /// Even `k` yields the symmetric two-component union; odd `k` is
    /// monotone. Endpoints are rounded outward by the scalar.
    pub fn nth_root(&self, k: u32) -> IntervalUnion<S> {
        if self.is_empty() {
            return IntervalUnion::empty();
        }
        if k <= 1 {
            return IntervalUnion::single(*self);
        }
        if k % 2 == 1 {
            return IntervalUnion::single(Self::new(
                self.lo.nth_root_lower(k),
                self.hi.nth_root_upper(k),
            ));
        }
        // Even root: only the non-negative part of `self` has preimages.
        if self.hi < S::zero() {
            return IntervalUnion::empty();
        }
        let lo = if self.lo >= S::zero() {
            self.lo
        } else {
            S::zero()
        };
        let r_lo = lo.nth_root_lower(k);
        let r_hi = self.hi.nth_root_upper(k);
        let pos = Self::new(
            if r_lo >= S::zero() { r_lo } else { S::zero() },
            r_hi,
        );
        IntervalUnion::from_parts(vec![pos.neg(), pos])
    }
}

fn pow_scalar<S: Scalar>(x: S, k: u32) -> S {
    let mut acc = S::one();
    for _ in 0..k {
        acc = acc.mul(x);
    }
    acc
}

/// An ordered sequence of pairwise disjoint intervals.
///
/// `reduce` (applied by every constructor) merges overlapping neighbours
/// and drops empties, so the component list is always canonical.
#[derive(Clone, PartialEq)]
pub struct IntervalUnion<S: Scalar> {
    parts: SmallVec<[Interval<S>; 2]>,
}

impl<S: Scalar> fmt::Debug for IntervalUnion<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parts.is_empty() {
            return write!(f, "{{}}");
        }
        let mut first = true;
        for p in &self.parts {
            if !first {
                write!(f, " ∪ ")?;
            }
            first = false;
            write!(f, "{p:?}")?;
        }
        Ok(())
    }
}

impl<S: Scalar> IntervalUnion<S> {
    /// The empty union.
    pub fn empty() -> Self {
        Self {
            parts: SmallVec::new(),
        }
    }

    /// The whole extended line.
    pub fn full() -> Self {
        Self::single(Interval::full())
    }

    /// A one-component union (empty when the interval is).
    pub fn single(iv: Interval<S>) -> Self {
        if iv.is_empty() {
            Self::empty()
        } else {
            Self {
                parts: SmallVec::from_elem(iv, 1),
            }
        }
    }

    /// The point union `[v, v]`.
    pub fn point(v: S) -> Self {
        Self::single(Interval::point(v))
    }

    /// Build from arbitrary parts, reducing to canonical form.
    pub fn from_parts(parts: Vec<Interval<S>>) -> Self {
        let mut u = Self {
            parts: SmallVec::from_vec(parts),
        };
        u.reduce();
        u
    }

    /// Merge overlapping neighbours and drop empty components.
    fn reduce(&mut self) {
        self.parts.retain(|p| !p.is_empty());
        self.parts
            .sort_by(|a, b| a.lo.partial_cmp(&b.lo).unwrap_or(std::cmp::Ordering::Equal));
        let mut merged: SmallVec<[Interval<S>; 2]> = SmallVec::new();
        for p in self.parts.drain(..) {
            match merged.last_mut() {
                Some(last) if p.lo <= last.hi => {
                    if p.hi > last.hi {
                        last.hi = p.hi;
                    }
                }
                _ => merged.push(p),
            }
        }
        self.parts = merged;
    }

    /// The components, ascending and disjoint.
    pub fn parts(&self) -> &[Interval<S>] {
        &self.parts
    }

    /// True iff no value lies in the union.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// True iff `v` lies in some component.
    pub fn contains(&self, v: S) -> bool {
        self.parts.iter().any(|p| p.contains(v))
    }

    /// True iff every component of `self` fits inside some component of
    /// `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.parts
            .iter()
            .all(|p| other.parts.iter().any(|q| p.is_subset_of(q)))
    }

    /// Sum of component diameters; ∞ propagates.
    pub fn diameter(&self) -> S {
        let mut total = S::zero();
        for p in &self.parts {
            let d = p.diameter();
            if !d.is_finite() {
                return S::pos_inf();
            }
            total = total.add(d);
        }
        total
    }

    /// Smallest single interval covering the union.
    pub fn hull(&self) -> Interval<S> {
        let mut h = Interval::empty();
        for p in &self.parts {
            h = h.hull(p);
        }
        h
    }

    /// Pairwise intersection of two unions.
    pub fn intersect(&self, other: &Self) -> Self {
        let mut parts = Vec::new();
        for a in &self.parts {
            for b in &other.parts {
                let c = a.intersect(b);
                if !c.is_empty() {
                    parts.push(c);
                }
            }
        }
        Self::from_parts(parts)
    }

    /// Intersect every component with one interval.
    pub fn intersect_interval(&self, iv: &Interval<S>) -> Self {
        self.intersect(&Self::single(*iv))
    }

    /// Union-wise addition.
    pub fn add(&self, other: &Self) -> Self {
        self.pairwise(other, Interval::add)
    }

    /// Union-wise subtraction.
    pub fn sub(&self, other: &Self) -> Self {
        self.pairwise(other, Interval::sub)
    }

    /// Union-wise multiplication.
    pub fn mul(&self, other: &Self) -> Self {
        self.pairwise(other, Interval::mul)
    }

    /// Union-wise division (divisor components straddling zero widen to
    /// the full line, as in [`Interval::div`]).
    pub fn div(&self, other: &Self) -> Self {
        self.pairwise(other, Interval::div)
    }

    /// Negation.
    pub fn neg(&self) -> Self {
        Self::from_parts(self.parts.iter().map(Interval::neg).collect())
    }

    /// Component-wise `k`-th power.
    pub fn pow(&self, k: u32) -> Self {
        Self::from_parts(self.parts.iter().map(|p| p.pow(k)).collect())
    }

    /// Component-wise `k`-th root closure.
    pub fn nth_root(&self, k: u32) -> Self {
        let mut parts = Vec::new();
        for p in &self.parts {
            parts.extend_from_slice(p.nth_root(k).parts());
        }
        Self::from_parts(parts)
    }

    fn pairwise(
        &self,
        other: &Self,
        op: impl Fn(&Interval<S>, &Interval<S>) -> Interval<S>,
    ) -> Self {
        let mut parts = Vec::new();
        for a in &self.parts {
            for b in &other.parts {
                let c = op(a, b);
                if !c.is_empty() {
                    parts.push(c);
                }
            }
        }
        Self::from_parts(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(lo: f64, hi: f64) -> Interval<f64> {
        Interval::new(lo, hi)
    }

    #[test]
    fn new_canonicalizes_empty() {
        assert!(iv(2.0, 1.0).is_empty());
        assert!(!iv(1.0, 1.0).is_empty());
    }

    #[test]
    fn intersect_and_hull() {
        let a = iv(0.0, 2.0);
        let b = iv(1.0, 3.0);
        assert_eq!(a.intersect(&b), iv(1.0, 2.0));
        assert_eq!(a.hull(&b), iv(0.0, 3.0));
        assert!(a.intersect(&iv(5.0, 6.0)).is_empty());
    }

    #[test]
    fn mul_handles_infinities() {
        let a = iv(0.0, f64::INFINITY);
        let b = iv(0.0, 2.0);
        let c = a.mul(&b);
        assert_eq!(c.lo, 0.0);
        assert_eq!(c.hi, f64::INFINITY);
    }

    #[test]
    fn pow_straddling_zero() {
        let a = iv(-2.0, 1.0);
        assert_eq!(a.pow(2), iv(0.0, 4.0));
        assert_eq!(a.pow(3), iv(-8.0, 1.0));
    }

    #[test]
    fn even_root_is_two_components() {
        let r = iv(4.0, 9.0).nth_root(2);
        assert_eq!(r.parts().len(), 2);
        assert!(r.contains(-3.0) && r.contains(3.0));
        assert!(r.contains(2.0) && r.contains(-2.0));
        assert!(!r.contains(0.0));
    }

    #[test]
    fn even_root_of_negative_is_empty() {
        assert!(iv(-9.0, -4.0).nth_root(2).is_empty());
    }

    #[test]
    fn odd_root_is_monotone() {
        let r = iv(-8.0, 27.0).nth_root(3);
        assert_eq!(r.parts().len(), 1);
        assert!(r.contains(-2.0) && r.contains(3.0) && r.contains(0.0));
    }

    #[test]
    fn union_reduce_merges_overlaps() {
        let u = IntervalUnion::from_parts(vec![iv(0.0, 1.0), iv(0.5, 2.0), iv(3.0, 4.0)]);
        assert_eq!(u.parts().len(), 2);
        assert_eq!(u.parts()[0], iv(0.0, 2.0));
    }

    #[test]
    fn union_diameter_sums_and_propagates_infinity() {
        let u = IntervalUnion::from_parts(vec![iv(0.0, 1.0), iv(3.0, 5.0)]);
        assert_eq!(u.diameter(), 3.0);
        let inf = IntervalUnion::from_parts(vec![iv(0.0, 1.0), iv(2.0, f64::INFINITY)]);
        assert_eq!(inf.diameter(), f64::INFINITY);
    }

    #[test]
    fn union_intersection_is_pairwise() {
        let a = IntervalUnion::from_parts(vec![iv(-3.0, -1.0), iv(1.0, 3.0)]);
        let b = IntervalUnion::single(iv(-2.0, 2.0));
        let c = a.intersect(&b);
        assert_eq!(c.parts().len(), 2);
        assert_eq!(c.parts()[0], iv(-2.0, -1.0));
        assert_eq!(c.parts()[1], iv(1.0, 2.0));
    }

    #[test]
    fn division_by_straddling_divisor_is_full() {
        let a = iv(1.0, 2.0);
        let d = a.div(&iv(-1.0, 1.0));
        assert_eq!(d, Interval::full());
    }
}
