//! The theory-checking contract between CDCL and the LRA solver.

use num_rational::BigRational;
use opal_sat::Lit;
use opal_theories::lra::{Constraint, LraResult, Simplex, VarId};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Verdict of a theory check over a set of asserted literals.
#[derive(Debug, Clone, PartialEq)]
pub enum TheoryVerdict {
    /// The asserted constraints are satisfiable; a model for the
    /// arithmetic variables is attached.
    Sat(FxHashMap<VarId, BigRational>),
    /// The asserted constraints conflict; the returned literals are a
    /// subset of the input that is itself unsatisfiable.
    Unsat(Vec<Lit>),
}

/// Stateless LRA theory backend.
pub struct LraTheory;

impl LraTheory {
    /// Check the conjunction of the asserted constraints.
    ///
    /// On conflict the reported subset is minimized by a deletion
    /// filter: every literal whose removal keeps the rest unsatisfiable
    /// is dropped. The result is irreducible, though not necessarily a
    /// minimum core.
    pub fn check(assignments: &[(Lit, Constraint)]) -> TheoryVerdict {
        let constraints: Vec<Constraint> = assignments.iter().map(|(_, c)| c.clone()).collect();
        match Simplex::solve(&constraints) {
            LraResult::Sat(model) => TheoryVerdict::Sat(model),
            LraResult::Unsat => {
                let mut core: Vec<usize> = (0..assignments.len()).collect();
                let mut i = 0;
                while i < core.len() {
                    let without: Vec<Constraint> = core
                        .iter()
                        .filter(|j| **j != core[i])
                        .map(|j| constraints[*j].clone())
                        .collect();
                    if Simplex::solve(&without) == LraResult::Unsat {
                        core.remove(i);
                    } else {
                        i += 1;
                    }
                }
                debug!(
                    total = assignments.len(),
                    core = core.len(),
                    "theory conflict"
                );
                TheoryVerdict::Unsat(core.into_iter().map(|j| assignments[j].0).collect())
            }
        }
    }
}
