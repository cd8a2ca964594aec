//! Reference DPLL solver.
//!
//! Recursive backtracking with unit propagation and pure-literal
//! elimination; decisions follow ascending variable-id order. This engine
//! exists to cross-check the CDCL solver: both must agree on SAT/UNSAT
//! for every input.

use crate::cnf::{Cnf, SatResult};
use crate::literal::{Lit, Var};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

type WorkClause = SmallVec<[Lit; 4]>;

/// Decide satisfiability of `cnf` by recursive DPLL.
pub fn solve(cnf: &Cnf) -> SatResult {
    let clauses: Vec<WorkClause> = cnf
        .clauses()
        .iter()
        .map(|c| c.lits().iter().copied().collect())
        .collect();
    let mut assignment: FxHashMap<Var, bool> = FxHashMap::default();
    if search(clauses, &mut assignment) {
        // Variables eliminated along the way keep the default polarity.
        for v in 0..cnf.num_vars() {
            assignment.entry(v).or_insert(false);
        }
        SatResult::Sat(assignment)
    } else {
        SatResult::Unsat
    }
}

fn search(mut clauses: Vec<WorkClause>, assignment: &mut FxHashMap<Var, bool>) -> bool {
    loop {
        if clauses.is_empty() {
            return true;
        }
        if clauses.iter().any(|c| c.is_empty()) {
            return false;
        }
        let unit = clauses.iter().find(|c| c.len() == 1).map(|c| c[0]);
        if let Some(unit) = unit {
            assignment.insert(unit.var(), unit.is_pos());
            clauses = assign(clauses, unit);
            continue;
        }
        if let Some(pure) = find_pure_literal(&clauses) {
            assignment.insert(pure.var(), pure.is_pos());
            clauses = assign(clauses, pure);
            continue;
        }
        break;
    }

    // Decision: smallest variable id still occurring.
    let var = clauses
        .iter()
        .flat_map(|c| c.iter().map(|l| l.var()))
        .min()
        .expect("non-empty clause set has a variable");
    for positive in [true, false] {
        let lit = Lit::new(var, positive);
        assignment.insert(var, positive);
        if search(assign(clauses.clone(), lit), assignment) {
            return true;
        }
    }
    assignment.remove(&var);
    false
}

/// Apply `lit`: drop satisfied clauses, strip the falsified literal.
fn assign(clauses: Vec<WorkClause>, lit: Lit) -> Vec<WorkClause> {
    clauses
        .into_iter()
        .filter(|c| !c.contains(&lit))
        .map(|mut c| {
            c.retain(|l| *l != !lit);
            c
        })
        .collect()
}

/// A literal whose negation occurs in no clause, if any (smallest
/// variable first, positive before negative).
fn find_pure_literal(clauses: &[WorkClause]) -> Option<Lit> {
    let mut present: FxHashSet<Lit> = FxHashSet::default();
    for c in clauses {
        present.extend(c.iter().copied());
    }
    let mut candidates: Vec<Lit> = present
        .iter()
        .filter(|l| !present.contains(&!**l))
        .copied()
        .collect();
    candidates.sort_by_key(|l| (l.var(), !l.is_pos()));
    candidates.first().copied()
}
