//! Rational helpers shared by the solver crates.
//!
//! The exact scalar everywhere is [`BigRational`]; this module adds the
//! small operations the Simplex and ICP cores need on top of it.

use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Raise a rational to a non-negative integer power by squaring.
pub fn pow_uint(base: &BigRational, exp: u32) -> BigRational {
    if exp == 0 {
        return BigRational::one();
    }
    let mut result = BigRational::one();
    let mut base = base.clone();
    let mut exp = exp;
    while exp > 0 {
        if exp & 1 == 1 {
            result *= &base;
        }
        exp >>= 1;
        if exp > 0 {
            base = &base * &base;
        }
    }
    result
}

/// Floor of a rational, as a rational.
pub fn floor_rational(r: &BigRational) -> BigRational {
    r.floor()
}

/// Ceiling of a rational, as a rational.
pub fn ceil_rational(r: &BigRational) -> BigRational {
    r.ceil()
}

/// Fractional part in `[0, 1)`: `r - floor(r)`.
pub fn fract_rational(r: &BigRational) -> BigRational {
    r - r.floor()
}

/// True iff the rational is an integer.
pub fn is_integer(r: &BigRational) -> bool {
    r.denom().is_one()
}

/// Convert a rational to an outward-rounded pair of `f64` bounds.
///
/// The returned `(lo, hi)` satisfies `lo <= r <= hi` so that interval
/// evaluation of rational coefficients never loses containment.
pub fn to_f64_bounds(r: &BigRational) -> (f64, f64) {
    let approx = rational_to_f64(r);
    if approx.is_infinite() {
        return if approx > 0.0 {
            (f64::MAX, f64::INFINITY)
        } else {
            (f64::NEG_INFINITY, f64::MIN)
        };
    }
    // f64 -> rational is exact for finite values, so the comparison below
    // decides which side needs widening.
    match BigRational::from_float(approx) {
        Some(back) => {
            if back == *r {
                (approx, approx)
            } else if back < *r {
                (approx, next_up(approx))
            } else {
                (next_down(approx), approx)
            }
        }
        None => (f64::NEG_INFINITY, f64::INFINITY),
    }
}

/// Nearest-`f64` approximation of a rational.
fn rational_to_f64(r: &BigRational) -> f64 {
    if r.is_zero() {
        return 0.0;
    }
    r.to_f64().unwrap_or(if r.is_positive() {
        f64::INFINITY
    } else {
        f64::NEG_INFINITY
    })
}

/// Next representable `f64` above `x`.
pub fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Next representable `f64` below `x`.
pub fn next_down(x: f64) -> f64 {
    if x.is_nan() || x == f64::NEG_INFINITY {
        return x;
    }
    if x == 0.0 {
        return -f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits - 1)
    } else {
        f64::from_bits(bits + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn rat(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn pow_uint_basic() {
        assert_eq!(pow_uint(&rat(2, 3), 0), BigRational::one());
        assert_eq!(pow_uint(&rat(2, 3), 1), rat(2, 3));
        assert_eq!(pow_uint(&rat(2, 3), 3), rat(8, 27));
        assert_eq!(pow_uint(&rat(-2, 1), 2), rat(4, 1));
    }

    #[test]
    fn fract_is_in_unit_interval() {
        assert_eq!(fract_rational(&rat(7, 2)), rat(1, 2));
        assert_eq!(fract_rational(&rat(-7, 2)), rat(1, 2));
        assert!(fract_rational(&rat(4, 1)).is_zero());
    }

    #[test]
    fn f64_bounds_contain_value() {
        for r in [rat(1, 3), rat(-1, 3), rat(10, 7), rat(0, 1), rat(5, 1)] {
            let (lo, hi) = to_f64_bounds(&r);
            let lo_r = BigRational::from_float(lo);
            let hi_r = BigRational::from_float(hi);
            if let (Some(lo_r), Some(hi_r)) = (lo_r, hi_r) {
                assert!(lo_r <= r && r <= hi_r, "bounds lost {r}");
            }
        }
    }

    #[test]
    fn next_up_down_bracket() {
        assert!(next_up(1.0) > 1.0);
        assert!(next_down(1.0) < 1.0);
        assert!(next_up(0.0) > 0.0);
        assert!(next_down(0.0) < 0.0);
    }
}
