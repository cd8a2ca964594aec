//! Opal Math - numeric kernel for the Opal SMT decision core.
//!
//! This crate provides the exact and extended numeric types the solver
//! crates are built on:
//! - Rational helpers over [`num_rational::BigRational`]
//! - Multivariate polynomials with smart constructors ([`Polynomial`])
//! - Closed intervals and interval unions over extended scalars
//!   ([`Interval`], [`IntervalUnion`])
//!
//! # Examples
//!
//! ```
//! use opal_math::{Monomial, Polynomial};
//! use num_rational::BigRational;
//! use num_bigint::BigInt;
//!
//! // x^2 + 2xy
//! let x2 = Monomial::from_var_power(0, 2);
//! let xy = Monomial::from_powers([(0, 1), (1, 1)]);
//! let p = Polynomial::from_terms(vec![
//!     (BigRational::from_integer(BigInt::from(1)), x2),
//!     (BigRational::from_integer(BigInt::from(2)), xy),
//! ]);
//! assert_eq!(p.num_terms(), 2);
//! assert_eq!(p.total_degree(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod interval;
pub mod polynomial;
pub mod rational;

pub use interval::{Interval, IntervalUnion, Scalar};
pub use polynomial::{Monomial, Polynomial, Var, VarPower, NULL_VAR};
pub use rational::{
    ceil_rational, floor_rational, fract_rational, is_integer, pow_uint, to_f64_bounds,
};
