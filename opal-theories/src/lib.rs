//! Opal Theories - arithmetic decision procedures for the Opal SMT core.
//!
//! Two theory solvers live here:
//! - [`lra`]: linear real/integer arithmetic. A Simplex solver in general
//!   form with per-variable bounds (Bland's rule, exact rationals,
//!   infinitesimals for strict inequalities), extended with Gomory cuts
//!   and branch-and-bound for integer constraints, plus a Fourier-Motzkin
//!   elimination procedure used as a soundness oracle.
//! - [`nra`]: non-linear real arithmetic. Interval constraint propagation
//!   over interval unions with weight-guided candidate selection, fed by a
//!   preprocessing pass that linearizes non-linear monomials through fresh
//!   auxiliary variables.
//!
//! # Examples
//!
//! ```
//! use opal_theories::lra::{Constraint, LinearExpr, Simplex, SimplexStatus};
//! use opal_theories::Relation;
//! use num_rational::BigRational;
//! use num_bigint::BigInt;
//!
//! let rat = |n: i64| BigRational::from_integer(BigInt::from(n));
//! // x <= 1 and x >= 2 is unsatisfiable.
//! let x = LinearExpr::from_terms([(0, rat(1))]);
//! let cs = vec![
//!     Constraint::new(x.clone(), Relation::Le, rat(1)),
//!     Constraint::new(x, Relation::Ge, rat(2)),
//! ];
//! let mut simplex = Simplex::new(&cs);
//! assert_eq!(simplex.check(), SimplexStatus::Unsat);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod lra;
pub mod nra;
mod relation;

pub use error::TheoryError;
pub use relation::Relation;
