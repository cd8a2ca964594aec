//! Lazy CDCL(T) refinement loop.

use crate::theory::{LraTheory, TheoryVerdict};
use num_rational::BigRational;
use opal_sat::{cdcl, Cnf, Lit, SatResult, Var};
use opal_theories::lra::{Constraint, VarId};
use opal_theories::Relation;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Outcome of an SMT solve.
#[derive(Debug, Clone, PartialEq)]
pub enum SmtResult {
    /// Satisfiable: a Boolean model of the abstraction together with a
    /// rational model of the asserted arithmetic.
    Sat {
        /// Assignment of the Boolean abstraction variables.
        bool_model: FxHashMap<Var, bool>,
        /// Assignment of the arithmetic variables.
        arith_model: FxHashMap<VarId, BigRational>,
    },
    /// Unsatisfiable.
    Unsat,
}

/// SMT solver combining the CDCL engine with the LRA theory.
#[derive(Debug, Default)]
pub struct SmtSolver {
    cnf: Cnf,
    /// Boolean variable -> arithmetic atom. Only relations with a
    /// complement are stored; equalities are desugared on registration.
    atoms: FxHashMap<Var, Constraint>,
    next_var: Var,
}

impl SmtSolver {
    /// An empty solver.
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_var(&mut self) -> Var {
        let v = self.next_var;
        self.next_var += 1;
        v
    }

    /// Register an arithmetic atom and return its literal.
    ///
    /// Equality atoms are split into a conjunction of the two bound
    /// atoms, so that every stored atom has a complement for the negated
    /// phase.
    pub fn atom(&mut self, constraint: Constraint) -> Lit {
        if constraint.rel == Relation::Eq {
            let le = self.atom(Constraint::new(
                constraint.expr.clone(),
                Relation::Le,
                constraint.bound.clone(),
            ));
            let ge = self.atom(Constraint::new(
                constraint.expr,
                Relation::Ge,
                constraint.bound,
            ));
            let v = self.fresh_var();
            let eq = Lit::pos(v);
            // eq <-> le /\ ge
            self.cnf.add_clause([!eq, le]);
            self.cnf.add_clause([!eq, ge]);
            self.cnf.add_clause([eq, !le, !ge]);
            return eq;
        }
        let v = self.fresh_var();
        self.atoms.insert(v, constraint);
        Lit::pos(v)
    }

    /// A plain Boolean variable with no theory meaning.
    pub fn bool_var(&mut self) -> Lit {
        Lit::pos(self.fresh_var())
    }

    /// Add a clause over atom and Boolean literals.
    pub fn add_clause(&mut self, lits: impl IntoIterator<Item = Lit>) {
        self.cnf.add_clause(lits);
    }

    /// Decide the formula.
    pub fn solve(&mut self) -> SmtResult {
        loop {
            match cdcl::solve(&self.cnf) {
                SatResult::Unsat => return SmtResult::Unsat,
                SatResult::Sat(bool_model) => {
                    let assignments = self.asserted_atoms(&bool_model);
                    match LraTheory::check(&assignments) {
                        TheoryVerdict::Sat(arith_model) => {
                            return SmtResult::Sat {
                                bool_model,
                                arith_model,
                            };
                        }
                        TheoryVerdict::Unsat(conflict) => {
                            debug!(len = conflict.len(), "blocking theory conflict");
                            // The conflict literals cannot all hold.
                            self.cnf.add_clause(conflict.into_iter().map(|l| !l));
                        }
                    }
                }
            }
        }
    }

    /// The theory assignment induced by a Boolean model: a positively
    /// assigned atom contributes its constraint, a negatively assigned
    /// one its complement.
    fn asserted_atoms(&self, model: &FxHashMap<Var, bool>) -> Vec<(Lit, Constraint)> {
        let mut atoms: Vec<(&Var, &Constraint)> = self.atoms.iter().collect();
        atoms.sort_by_key(|(v, _)| **v);
        atoms
            .into_iter()
            .map(|(v, c)| {
                if *model.get(v).unwrap_or(&false) {
                    (Lit::pos(*v), c.clone())
                } else {
                    let complement = c
                        .complement()
                        .expect("stored atoms always have a complement");
                    (Lit::neg(*v), complement)
                }
            })
            .collect()
    }
}
