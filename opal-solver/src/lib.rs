//! Opal Solver - lazy CDCL(T) over linear arithmetic.
//!
//! The Boolean abstraction of a formula is decided by the CDCL engine;
//! asserted arithmetic atoms are checked by the Simplex-based theory
//! solver. A theory conflict comes back as a subset of the asserted
//! literals and turns into a blocking clause, refining the abstraction
//! until the verdicts agree.
//!
//! # Examples
//!
//! ```
//! use num_bigint::BigInt;
//! use num_rational::BigRational;
//! use opal_solver::{SmtResult, SmtSolver};
//! use opal_theories::lra::{Constraint, LinearExpr};
//! use opal_theories::Relation;
//!
//! let rat = |n: i64| BigRational::from_integer(BigInt::from(n));
//! let x = |c: i64| LinearExpr::from_terms([(0usize, rat(c))]);
//!
//! let mut solver = SmtSolver::new();
//! let low = solver.atom(Constraint::new(x(1), Relation::Le, rat(1)));
//! let high = solver.atom(Constraint::new(x(1), Relation::Ge, rat(3)));
//! let mid = solver.atom(Constraint::new(x(1), Relation::Ge, rat(2)));
//! solver.add_clause([low, high]);
//! solver.add_clause([mid]);
//! match solver.solve() {
//!     SmtResult::Sat { arith_model, .. } => {
//!         assert!(arith_model[&0] >= rat(3));
//!     }
//!     SmtResult::Unsat => unreachable!(),
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod solver;
pub mod theory;

pub use solver::{SmtResult, SmtSolver};
pub use theory::{LraTheory, TheoryVerdict};
