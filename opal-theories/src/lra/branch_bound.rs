//! Branch-and-bound for integer constraints.
//!
//! Depth-first search over the relaxation: a fractional integer variable
//! `x` with value `v` splits the problem into `x <= ⌊v⌋` and `x >= ⌈v⌉`,
//! exploring the branch nearer the fractional value first. Before
//! branching, a bounded number of Gomory cut rounds tightens the node.
//! The node budget bounds the search on unbounded integer domains, where
//! termination is otherwise not guaranteed.

use super::cuts::gomory_cut;
use super::simplex::{Simplex, SimplexStatus};
use super::{Constraint, LinearExpr, VarId};
use crate::relation::Relation;
use num_rational::BigRational;
use num_traits::One;
use opal_math::rational::{ceil_rational, floor_rational, fract_rational, is_integer};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

/// Tunables for branch-and-bound.
#[derive(Debug, Clone)]
pub struct BranchBoundConfig {
    /// Maximum number of nodes to explore before giving up.
    pub max_nodes: usize,
    /// Maximum Gomory cut rounds per node before branching.
    pub max_cut_rounds: usize,
}

impl Default for BranchBoundConfig {
    fn default() -> Self {
        Self {
            max_nodes: 100_000,
            max_cut_rounds: 10,
        }
    }
}

/// Counters for branch-and-bound.
#[derive(Debug, Clone, Default)]
pub struct BranchBoundStats {
    /// Nodes explored.
    pub nodes_explored: usize,
    /// Gomory cuts added.
    pub cuts_added: usize,
    /// Relaxations solved.
    pub lp_solves: usize,
}

/// Outcome of an integer solve.
#[derive(Debug, Clone, PartialEq)]
pub enum LiaResult {
    /// Integer-feasible, with a model for the original variables.
    Sat(FxHashMap<VarId, BigRational>),
    /// No integer solution exists.
    Unsat,
    /// The node budget ran out before a verdict.
    NodeLimit,
}

/// Branch-and-bound solver over the bounds Simplex.
#[derive(Debug)]
pub struct BranchBoundSolver {
    config: BranchBoundConfig,
    stats: BranchBoundStats,
}

impl BranchBoundSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: BranchBoundConfig) -> Self {
        Self {
            config,
            stats: BranchBoundStats::default(),
        }
    }

    /// Solver statistics.
    pub fn stats(&self) -> &BranchBoundStats {
        &self.stats
    }

    /// Decide the constraints with the variables in `int_vars` required
    /// to take integer values.
    pub fn solve(&mut self, constraints: &[Constraint], int_vars: &FxHashSet<VarId>) -> LiaResult {
        let mut int_sorted: Vec<VarId> = int_vars.iter().copied().collect();
        int_sorted.sort_unstable();

        let mut stack: Vec<Vec<Constraint>> = vec![constraints.to_vec()];
        while let Some(mut node) = stack.pop() {
            if self.stats.nodes_explored >= self.config.max_nodes {
                debug!(nodes = self.stats.nodes_explored, "node budget exhausted");
                return LiaResult::NodeLimit;
            }
            self.stats.nodes_explored += 1;

            let mut cut_rounds = 0;
            'node: loop {
                let mut simplex = Simplex::new(&node);
                self.stats.lp_solves += 1;
                if simplex.check() == SimplexStatus::Unsat {
                    break 'node;
                }
                let model = simplex.model();
                let Some((var, value)) = first_fractional(&int_sorted, &model) else {
                    return LiaResult::Sat(model);
                };

                if cut_rounds < self.config.max_cut_rounds {
                    if let Some(cut) = gomory_cut(&simplex, var, int_vars) {
                        trace!(var, round = cut_rounds, "gomory cut");
                        self.stats.cuts_added += 1;
                        cut_rounds += 1;
                        node.push(cut);
                        continue 'node;
                    }
                }

                // Branch on x <= ⌊v⌋ / x >= ⌈v⌉; the nearer branch is
                // pushed last so depth-first search explores it first.
                let floor = floor_rational(&value);
                let ceil = ceil_rational(&value);
                let x = LinearExpr::from_terms([(var, BigRational::one())]);
                let down = with_constraint(&node, Constraint::new(x.clone(), Relation::Le, floor));
                let up = with_constraint(&node, Constraint::new(x, Relation::Ge, ceil));
                let half = BigRational::new(1.into(), 2.into());
                if fract_rational(&value) <= half {
                    stack.push(up);
                    stack.push(down);
                } else {
                    stack.push(down);
                    stack.push(up);
                }
                break 'node;
            }
        }
        LiaResult::Unsat
    }
}

/// Decide integer feasibility with the default configuration.
pub fn solve_lia(constraints: &[Constraint], int_vars: &FxHashSet<VarId>) -> LiaResult {
    BranchBoundSolver::new(BranchBoundConfig::default()).solve(constraints, int_vars)
}

/// Smallest-id integer variable whose model value is fractional.
fn first_fractional(
    int_sorted: &[VarId],
    model: &FxHashMap<VarId, BigRational>,
) -> Option<(VarId, BigRational)> {
    for &v in int_sorted {
        if let Some(value) = model.get(&v) {
            if !is_integer(value) {
                return Some((v, value.clone()));
            }
        }
    }
    None
}

fn with_constraint(node: &[Constraint], extra: Constraint) -> Vec<Constraint> {
    let mut out = node.to_vec();
    out.push(extra);
    out
}
