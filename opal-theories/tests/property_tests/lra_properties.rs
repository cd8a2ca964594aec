//! Differential and invariant properties for the linear solvers.

use num_bigint::BigInt;
use num_rational::BigRational;
use opal_theories::lra::{
    fourier_motzkin, BranchBoundConfig, BranchBoundSolver, Constraint, FmResult, LiaResult,
    LinearExpr, LraResult, Simplex, SimplexStatus, VarId,
};
use opal_theories::Relation;
use proptest::prelude::*;
use rustc_hash::FxHashSet;

fn rat(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

fn relation_strategy() -> impl Strategy<Value = Relation> {
    prop_oneof![
        Just(Relation::Le),
        Just(Relation::Lt),
        Just(Relation::Eq),
        Just(Relation::Ge),
        Just(Relation::Gt),
    ]
}

/// Small random constraint systems over three variables with
/// single-digit coefficients.
fn constraints_strategy() -> impl Strategy<Value = Vec<Constraint>> {
    prop::collection::vec(
        (
            prop::collection::vec((0usize..3, -4i64..=4), 1..3),
            relation_strategy(),
            -6i64..=6,
        ),
        1..6,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .map(|(terms, rel, bound)| {
                Constraint::new(
                    LinearExpr::from_terms(terms.into_iter().map(|(v, c)| (v, rat(c)))),
                    rel,
                    rat(bound),
                )
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Fourier-Motzkin and Simplex agree on satisfiability.
    #[test]
    fn fm_agrees_with_simplex(cs in constraints_strategy()) {
        let fm = fourier_motzkin(&cs);
        let sx = Simplex::solve(&cs);
        match (fm, sx) {
            (FmResult::Sat, LraResult::Sat(_)) | (FmResult::Unsat, LraResult::Unsat) => {}
            (fm, sx) => prop_assert!(false, "fm: {fm:?}, simplex: {sx:?}"),
        }
    }

    /// Every Simplex model satisfies every input constraint.
    #[test]
    fn simplex_models_are_sound(cs in constraints_strategy()) {
        if let LraResult::Sat(model) = Simplex::solve(&cs) {
            for c in &cs {
                prop_assert!(c.is_satisfied_by(&model), "violated {c:?}");
            }
        }
    }

    /// Tableau invariants hold when the pivot loop stops.
    #[test]
    fn tableau_invariants_after_check(cs in constraints_strategy()) {
        let mut simplex = Simplex::new(&cs);
        let status = simplex.check();
        if status == SimplexStatus::Sat {
            simplex.assert_invariants();
        }
    }

    /// Branch-and-bound models are integral and satisfy the input; when
    /// the relaxation is already unsat, so is the integer problem.
    #[test]
    fn lia_models_are_sound(cs in constraints_strategy()) {
        let ints: FxHashSet<VarId> = [0, 1, 2].into_iter().collect();
        // Unbounded integer domains need not terminate; a small node
        // budget keeps the property test fast and NodeLimit is ignored.
        let mut solver = BranchBoundSolver::new(BranchBoundConfig {
            max_nodes: 200,
            ..BranchBoundConfig::default()
        });
        match solver.solve(&cs, &ints) {
            LiaResult::Sat(model) => {
                for (v, value) in &model {
                    prop_assert!(
                        value.denom() == &BigInt::from(1),
                        "x{v} = {value} is not integral"
                    );
                }
                for c in &cs {
                    prop_assert!(c.is_satisfied_by(&model), "violated {c:?}");
                }
            }
            LiaResult::Unsat => {
                // The rational relaxation being sat is fine; but if even
                // the relaxation is unsat the verdicts must agree.
            }
            LiaResult::NodeLimit => {}
        }
    }
}
