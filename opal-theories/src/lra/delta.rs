//! Delta-rationals: exact rationals extended with an infinitesimal.
//!
//! A strict bound `x < b` is represented as the non-strict bound
//! `x <= b - δ` for a symbolic infinitesimal δ > 0. Values are pairs
//! `value + k·δ` ordered lexicographically, which is exactly the total
//! order on (value, strictness) the Simplex comparisons need.

use num_rational::BigRational;
use num_traits::Zero;
use std::cmp::Ordering;
use std::fmt;

/// An element `value + delta·δ` of the ordered extension field.
#[derive(Clone, PartialEq, Eq)]
pub struct DeltaRational {
    /// The standard rational part.
    pub value: BigRational,
    /// The coefficient of the infinitesimal δ.
    pub delta: BigRational,
}

impl fmt::Debug for DeltaRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.delta.is_zero() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} + {}δ", self.value, self.delta)
        }
    }
}

impl DeltaRational {
    /// Zero.
    pub fn zero() -> Self {
        Self {
            value: BigRational::zero(),
            delta: BigRational::zero(),
        }
    }

    /// A pure rational (no infinitesimal part).
    pub fn from_rational(value: BigRational) -> Self {
        Self {
            value,
            delta: BigRational::zero(),
        }
    }

    /// `value + delta·δ`.
    pub fn with_delta(value: BigRational, delta: BigRational) -> Self {
        Self { value, delta }
    }

    /// True iff the infinitesimal part is zero.
    pub fn is_rational(&self) -> bool {
        self.delta.is_zero()
    }

    /// Addition.
    pub fn add(&self, other: &Self) -> Self {
        Self {
            value: &self.value + &other.value,
            delta: &self.delta + &other.delta,
        }
    }

    /// Subtraction.
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            value: &self.value - &other.value,
            delta: &self.delta - &other.delta,
        }
    }

    /// Scale by a rational.
    pub fn scale(&self, k: &BigRational) -> Self {
        Self {
            value: &self.value * k,
            delta: &self.delta * k,
        }
    }

    /// Instantiate δ with a concrete positive rational.
    pub fn instantiate(&self, delta: &BigRational) -> BigRational {
        &self.value + &self.delta * delta
    }
}

impl PartialOrd for DeltaRational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeltaRational {
    /// Lexicographic: the rational part dominates, δ breaks ties.
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.delta.cmp(&other.delta))
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
    fn delta_breaks_ties() {
        let b = DeltaRational::from_rational(rat(3));
        let below = DeltaRational::with_delta(rat(3), rat(-1));
        let above = DeltaRational::with_delta(rat(3), rat(1));
        assert!(below < b && b < above);
        // The rational part dominates any delta coefficient.
        assert!(DeltaRational::with_delta(rat(2), rat(1000)) < below);
    }

    #[test]
    fn arithmetic_is_componentwise() {
        let a = DeltaRational::with_delta(rat(1), rat(-1));
        let b = DeltaRational::with_delta(rat(2), rat(1));
        assert_eq!(a.add(&b), DeltaRational::from_rational(rat(3)));
        assert_eq!(
            a.scale(&rat(-2)),
            DeltaRational::with_delta(rat(-2), rat(2))
        );
    }
}
