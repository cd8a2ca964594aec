//! End-to-end checks of the lazy CDCL(T) loop against brute force.

use num_bigint::BigInt;
use num_rational::BigRational;
use opal_sat::Lit;
use opal_solver::{SmtResult, SmtSolver};
use opal_theories::lra::{Constraint, LinearExpr, LraResult, Simplex};
use opal_theories::Relation;
use proptest::prelude::*;

fn rat(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/// Atoms over two arithmetic variables with single-digit bounds.
fn atom_strategy() -> impl Strategy<Value = Constraint> {
    (
        prop::collection::vec((0usize..2, -3i64..=3), 1..3),
        prop_oneof![
            Just(Relation::Le),
            Just(Relation::Lt),
            Just(Relation::Ge),
            Just(Relation::Gt),
        ],
        -4i64..=4,
    )
        .prop_map(|(terms, rel, bound)| {
            Constraint::new(
                LinearExpr::from_terms(terms.into_iter().map(|(v, c)| (v, rat(c)))),
                rel,
                rat(bound),
            )
        })
}

/// A formula: a few atoms plus random clauses over them.
fn formula_strategy() -> impl Strategy<Value = (Vec<Constraint>, Vec<Vec<(usize, bool)>>)> {
    (
        prop::collection::vec(atom_strategy(), 1..4),
        prop::collection::vec(prop::collection::vec((0usize..4, any::<bool>()), 1..3), 1..4),
    )
}

/// Brute-force satisfiability: try every phase assignment of the atoms.
fn brute_force(atoms: &[Constraint], clauses: &[Vec<(usize, bool)>]) -> bool {
    let n = atoms.len();
    'assignments: for bits in 0u32..(1 << n) {
        let phase = |i: usize| bits >> i & 1 == 1;
        for clause in clauses {
            let satisfied = clause.iter().any(|(i, pos)| phase(i % n) == *pos);
            if !satisfied {
                continue 'assignments;
            }
        }
        let mut constraints = Vec::new();
        let mut ok = true;
        for (i, atom) in atoms.iter().enumerate() {
            if phase(i) {
                constraints.push(atom.clone());
            } else {
                match atom.complement() {
                    Some(c) => constraints.push(c),
                    None => ok = false,
                }
            }
        }
        if !ok {
            continue;
        }
        if matches!(Simplex::solve(&constraints), LraResult::Sat(_)) {
            return true;
        }
    }
    false
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// The lazy loop agrees with brute force over full phase
    /// enumeration.
    #[test]
    fn smt_matches_brute_force((atoms, clauses) in formula_strategy()) {
        let mut solver = SmtSolver::new();
        let lits: Vec<Lit> = atoms.iter().cloned().map(|a| solver.atom(a)).collect();
        for clause in &clauses {
            solver.add_clause(
                clause
                    .iter()
                    .map(|(i, pos)| {
                        let lit = lits[i % lits.len()];
                        if *pos { lit } else { !lit }
                    }),
            );
        }
        let expected = brute_force(&atoms, &clauses);
        match solver.solve() {
            SmtResult::Sat { arith_model, bool_model } => {
                prop_assert!(expected, "solver sat, brute force unsat");
                // The arithmetic model satisfies every asserted atom.
                for (i, atom) in atoms.iter().enumerate() {
                    let phase = bool_model.get(&lits[i].var()).copied().unwrap_or(false);
                    let effective = if phase {
                        Some(atom.clone())
                    } else {
                        atom.complement()
                    };
                    if let Some(c) = effective {
                        prop_assert!(c.is_satisfied_by(&arith_model), "violated {c:?}");
                    }
                }
            }
            SmtResult::Unsat => prop_assert!(!expected, "solver unsat, brute force sat"),
        }
    }
}
