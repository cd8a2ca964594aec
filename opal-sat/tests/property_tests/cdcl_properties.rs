//! Differential and soundness properties: DPLL vs CDCL vs brute force.

use opal_sat::{cdcl, dpll, Cnf, Lit, SatResult};
use proptest::prelude::*;

const MAX_VARS: u32 = 6;

/// Random small CNF: clauses of 0-3 literals over up to `MAX_VARS` vars.
fn cnf_strategy() -> impl Strategy<Value = Cnf> {
    prop::collection::vec(
        prop::collection::vec((0..MAX_VARS, any::<bool>()), 1..4),
        0..10,
    )
    .prop_map(|raw| {
        let mut cnf = Cnf::new();
        for clause in raw {
            cnf.add_clause(clause.into_iter().map(|(v, pos)| Lit::new(v, pos)));
        }
        cnf
    })
}

/// Exhaustive satisfiability check over all assignments.
fn brute_force_sat(cnf: &Cnf) -> bool {
    let n = cnf.num_vars();
    (0u64..(1 << n)).any(|bits| {
        cnf.clauses().iter().all(|c| {
            c.lits()
                .iter()
                .any(|l| ((bits >> l.var()) & 1 == 1) == l.is_pos())
        })
    })
}

proptest! {
    /// The two engines agree on every small input.
    #[test]
    fn dpll_equals_cdcl(cnf in cnf_strategy()) {
        let d = dpll::solve(&cnf);
        let c = cdcl::solve(&cnf);
        prop_assert_eq!(d.is_sat(), c.is_sat());
    }

    /// SAT models satisfy every clause; UNSAT verdicts match brute force.
    #[test]
    fn cdcl_is_sound_and_complete(cnf in cnf_strategy()) {
        match cdcl::solve(&cnf) {
            SatResult::Sat(model) => prop_assert!(cnf.is_satisfied_by(&model)),
            SatResult::Unsat => prop_assert!(!brute_force_sat(&cnf)),
        }
    }

    /// Same for the reference engine.
    #[test]
    fn dpll_is_sound_and_complete(cnf in cnf_strategy()) {
        match dpll::solve(&cnf) {
            SatResult::Sat(model) => prop_assert!(cnf.is_satisfied_by(&model)),
            SatResult::Unsat => prop_assert!(!brute_force_sat(&cnf)),
        }
    }
}
