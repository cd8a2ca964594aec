//! Non-linear real arithmetic by interval constraint propagation.
//!
//! The pipeline has two stages:
//! 1. [`linearize`]: every non-linear term is replaced by a fresh
//!    auxiliary variable with a defining side constraint, so downstream
//!    code only ever isolates single occurrences.
//! 2. [`IcpEngine`]: weight-guided contraction of variable domains until
//!    the iteration budget runs out or a domain empties (UNSAT witness).

pub mod icp;
pub mod linearize;

pub use icp::{refine, Candidates, IcpConfig, IcpEngine, IcpStats, Refinement};
pub use linearize::{linearize, Linearized};

use crate::relation::Relation;
use opal_math::{IntervalUnion, Polynomial, Var};
use rustc_hash::FxHashMap;

/// Variable domains: each variable maps to a union of closed intervals.
pub type DomainMap = FxHashMap<Var, IntervalUnion<f64>>;

/// A polynomial constraint `poly rel 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyConstraint {
    /// The polynomial left-hand side.
    pub poly: Polynomial,
    /// Relation against zero.
    pub rel: Relation,
}

impl PolyConstraint {
    /// Create a constraint `poly rel 0`.
    pub fn new(poly: Polynomial, rel: Relation) -> Self {
        Self { poly, rel }
    }
}
