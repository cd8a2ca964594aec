//! Opal SAT - Boolean satisfiability engines for the Opal SMT core.
//!
//! Two engines share the same clause-set interface:
//! - [`dpll`]: a reference recursive DPLL with unit propagation and
//!   pure-literal elimination, used for differential testing.
//! - [`cdcl`]: the production conflict-driven engine with two-watched
//!   literal propagation, activity-based decisions, 1UIP learning and
//!   non-chronological backjumping.
//!
//! Both return [`SatResult`]: a model in which every clause has a
//! satisfied literal, or `Unsat`.
//!
//! # Examples
//!
//! ```
//! use opal_sat::{Cnf, Lit, SatResult};
//!
//! let mut cnf = Cnf::new();
//! cnf.add_clause([Lit::pos(0), Lit::pos(1)]);
//! cnf.add_clause([Lit::neg(0), Lit::neg(1)]);
//! match opal_sat::cdcl::solve(&cnf) {
//!     SatResult::Sat(model) => assert!(cnf.is_satisfied_by(&model)),
//!     SatResult::Unsat => unreachable!(),
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod cdcl;
pub mod cnf;
pub mod dpll;
pub mod literal;

pub use cdcl::{CdclConfig, CdclSolver, CdclStats};
pub use cnf::{Clause, Cnf, LBool, SatResult};
pub use literal::{Lit, Var};
