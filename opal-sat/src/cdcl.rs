//! Conflict-driven clause learning solver.
//!
//! The production engine: two-watched-literal propagation, activity-based
//! decisions with decay, first-UIP conflict analysis and
//! non-chronological backjumping. Learned clauses are appended to the
//! clause database and never deleted; the decision core has no restart or
//! garbage-collection policy.

use crate::cnf::{Cnf, LBool, SatResult};
use crate::literal::{Lit, Var};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Clause identifier into the solver's database.
type ClauseId = usize;

/// Tunables for the CDCL engine.
#[derive(Debug, Clone)]
pub struct CdclConfig {
    /// Multiplicative activity decay applied after every conflict.
    pub var_decay: f64,
    /// Rescale threshold for activity scores.
    pub activity_rescale: f64,
}

impl Default for CdclConfig {
    fn default() -> Self {
        Self {
            var_decay: 0.95,
            activity_rescale: 1e100,
        }
    }
}

/// Counters for the CDCL engine.
#[derive(Debug, Clone, Default)]
pub struct CdclStats {
    /// Decisions made.
    pub decisions: u64,
    /// Literals propagated.
    pub propagations: u64,
    /// Conflicts analyzed.
    pub conflicts: u64,
    /// Clauses learned.
    pub learned: u64,
    /// Highest trail size observed.
    pub max_trail: usize,
}

/// Conflict-driven clause learning solver state.
pub struct CdclSolver {
    config: CdclConfig,
    stats: CdclStats,
    /// Clause database: originals first, learned clauses appended.
    clauses: Vec<Vec<Lit>>,
    /// For each literal index, the clauses in which it is watched.
    watches: Vec<Vec<ClauseId>>,
    /// Per-variable assignment value.
    values: Vec<LBool>,
    /// Per-variable decision level (meaningful while assigned).
    level: Vec<u32>,
    /// Per-variable propagation reason (`None` for decisions).
    reason: Vec<Option<ClauseId>>,
    /// Assignment history.
    trail: Vec<Lit>,
    /// Trail index where each decision level starts.
    trail_lim: Vec<usize>,
    /// Next trail position to propagate.
    qhead: usize,
    /// Per-variable activity score.
    activity: Vec<f64>,
    /// Amount to bump with.
    var_inc: f64,
    /// False once a top-level conflict has been found.
    ok: bool,
}

impl CdclSolver {
    /// Build a solver for the given clause set.
    pub fn new(cnf: &Cnf) -> Self {
        Self::with_config(cnf, CdclConfig::default())
    }

    /// Build a solver with a custom configuration.
    pub fn with_config(cnf: &Cnf, config: CdclConfig) -> Self {
        let n = cnf.num_vars() as usize;
        let mut solver = Self {
            config,
            stats: CdclStats::default(),
            clauses: Vec::with_capacity(cnf.clauses().len()),
            watches: vec![Vec::new(); 2 * n],
            values: vec![LBool::Undef; n],
            level: vec![0; n],
            reason: vec![None; n],
            trail: Vec::new(),
            trail_lim: Vec::new(),
            qhead: 0,
            activity: vec![0.0; n],
            var_inc: 1.0,
            ok: true,
        };
        for clause in cnf.clauses() {
            solver.add_clause(clause.lits().to_vec());
        }
        solver
    }

    /// Solver statistics.
    pub fn stats(&self) -> &CdclStats {
        &self.stats
    }

    /// Insert a clause into the database, setting up watches.
    fn add_clause(&mut self, lits: Vec<Lit>) {
        if !self.ok {
            return;
        }
        match lits.len() {
            0 => self.ok = false,
            1 => {
                let lit = lits[0];
                if self.value(lit) == LBool::Undef {
                    self.enqueue(lit, None);
                } else if self.values[lit.var() as usize].falsifies(lit) {
                    self.ok = false;
                }
            }
            _ => {
                let id = self.clauses.len();
                self.watches[lits[0].index()].push(id);
                self.watches[lits[1].index()].push(id);
                self.clauses.push(lits);
            }
        }
    }

    /// Run the main loop to completion.
    pub fn solve(&mut self) -> SatResult {
        if !self.ok || self.propagate().is_some() {
            return SatResult::Unsat;
        }
        loop {
            match self.propagate() {
                Some(conflict) => {
                    self.stats.conflicts += 1;
                    if self.decision_level() == 0 {
                        debug!(conflicts = self.stats.conflicts, "top-level conflict");
                        return SatResult::Unsat;
                    }
                    let (learned, backjump) = self.analyze(conflict);
                    trace!(?learned, backjump, "learned clause");
                    self.cancel_until(backjump);
                    self.learn(learned);
                    self.decay_activities();
                }
                None => match self.pick_branch_var() {
                    Some(var) => {
                        self.stats.decisions += 1;
                        self.trail_lim.push(self.trail.len());
                        // Default polarity is negative.
                        self.enqueue(Lit::neg(var), None);
                    }
                    None => return SatResult::Sat(self.model()),
                },
            }
        }
    }

    fn model(&self) -> FxHashMap<Var, bool> {
        self.values
            .iter()
            .enumerate()
            .map(|(v, val)| (v as Var, *val == LBool::True))
            .collect()
    }

    #[inline]
    fn decision_level(&self) -> u32 {
        self.trail_lim.len() as u32
    }

    #[inline]
    fn value(&self, lit: Lit) -> LBool {
        match self.values[lit.var() as usize] {
            LBool::Undef => LBool::Undef,
            v => LBool::from_bool(v.satisfies(lit)),
        }
    }

    /// Put `lit` on the trail as true at the current decision level.
    fn enqueue(&mut self, lit: Lit, reason: Option<ClauseId>) {
        debug_assert_eq!(self.value(lit), LBool::Undef);
        let var = lit.var() as usize;
        self.values[var] = LBool::from_bool(lit.is_pos());
        self.level[var] = self.decision_level();
        self.reason[var] = reason;
        self.trail.push(lit);
        self.stats.max_trail = self.stats.max_trail.max(self.trail.len());
    }

    /// Propagate to fixed point; returns the conflicting clause, if any.
    fn propagate(&mut self) -> Option<ClauseId> {
        while self.qhead < self.trail.len() {
            let p = self.trail[self.qhead];
            self.qhead += 1;
            self.stats.propagations += 1;

            // Clauses watching ¬p may have lost their watch.
            let watch_idx = (!p).index();
            let watchers = std::mem::take(&mut self.watches[watch_idx]);
            let mut kept = Vec::with_capacity(watchers.len());
            let mut conflict = None;

            for cid in watchers {
                if conflict.is_some() {
                    kept.push(cid);
                    continue;
                }
                // Normalize so the falsified watch sits at position 1.
                if self.clauses[cid][0] == !p {
                    self.clauses[cid].swap(0, 1);
                }
                debug_assert_eq!(self.clauses[cid][1], !p);
                let first = self.clauses[cid][0];
                if self.value(first) == LBool::True {
                    kept.push(cid);
                    continue;
                }
                // Look for a non-false replacement watch.
                let mut replaced = false;
                for i in 2..self.clauses[cid].len() {
                    let candidate = self.clauses[cid][i];
                    if self.value(candidate) != LBool::False {
                        self.clauses[cid].swap(1, i);
                        self.watches[candidate.index()].push(cid);
                        replaced = true;
                        break;
                    }
                }
                if replaced {
                    continue;
                }
                // No replacement: clause is unit or conflicting.
                kept.push(cid);
                if self.value(first) == LBool::False {
                    conflict = Some(cid);
                } else {
                    self.enqueue(first, Some(cid));
                }
            }
            self.watches[watch_idx] = kept;
            if conflict.is_some() {
                self.qhead = self.trail.len();
                return conflict;
            }
        }
        None
    }

    /// First-UIP conflict analysis.
    ///
    /// Resolves the conflict clause against the reasons of the most
    /// recently assigned current-level literals until exactly one literal
    /// at the current level remains. Returns the learned clause (UIP
    /// first, a highest-level remaining literal second) and the backjump
    /// level.
    fn analyze(&mut self, conflict: ClauseId) -> (Vec<Lit>, u32) {
        let current = self.decision_level();
        let mut seen = vec![false; self.values.len()];
        let mut learned: Vec<Lit> = vec![Lit::pos(0)]; // slot 0 holds the UIP
        let mut counter = 0usize;
        let mut index = self.trail.len();
        let mut clause_id = conflict;
        let mut resolving_on: Option<Lit> = None;

        loop {
            let clause = &self.clauses[clause_id];
            let skip = usize::from(resolving_on.is_some());
            for &q in &clause[skip..] {
                let v = q.var() as usize;
                if !seen[v] && self.level[v] > 0 {
                    seen[v] = true;
                    if self.level[v] == current {
                        counter += 1;
                    } else {
                        learned.push(q);
                    }
                }
            }
            // Walk back to the next marked trail literal.
            loop {
                index -= 1;
                if seen[self.trail[index].var() as usize] {
                    break;
                }
            }
            let p = self.trail[index];
            seen[p.var() as usize] = false;
            counter -= 1;
            if counter == 0 {
                learned[0] = !p;
                break;
            }
            clause_id = self.reason[p.var() as usize]
                .expect("non-decision current-level literal must have a reason");
            resolving_on = Some(p);
        }

        // Backjump to the second-highest decision level in the clause.
        let backjump = if learned.len() == 1 {
            0
        } else {
            let mut max_i = 1;
            for i in 2..learned.len() {
                if self.level[learned[i].var() as usize] > self.level[learned[max_i].var() as usize]
                {
                    max_i = i;
                }
            }
            learned.swap(1, max_i);
            self.level[learned[1].var() as usize]
        };

        for &lit in &learned {
            self.bump_activity(lit.var());
        }
        (learned, backjump)
    }

    /// Undo all trail entries above `target` level.
    fn cancel_until(&mut self, target: u32) {
        if self.decision_level() <= target {
            return;
        }
        let keep = self.trail_lim[target as usize];
        for lit in self.trail.drain(keep..) {
            let var = lit.var() as usize;
            self.values[var] = LBool::Undef;
            self.reason[var] = None;
        }
        self.trail_lim.truncate(target as usize);
        self.qhead = self.trail.len();
    }

    /// Add a learned clause and assert its UIP literal.
    fn learn(&mut self, learned: Vec<Lit>) {
        self.stats.learned += 1;
        let uip = learned[0];
        if learned.len() == 1 {
            self.enqueue(uip, None);
        } else {
            let id = self.clauses.len();
            self.watches[learned[0].index()].push(id);
            self.watches[learned[1].index()].push(id);
            self.clauses.push(learned);
            self.enqueue(uip, Some(id));
        }
    }

    /// Unassigned variable with the highest activity, ties to lowest id.
    fn pick_branch_var(&self) -> Option<Var> {
        let mut best: Option<(Var, f64)> = None;
        for v in 0..self.values.len() {
            if self.values[v] != LBool::Undef {
                continue;
            }
            let act = self.activity[v];
            match best {
                Some((_, best_act)) if act <= best_act => {}
                _ => best = Some((v as Var, act)),
            }
        }
        best.map(|(v, _)| v)
    }

    fn bump_activity(&mut self, var: Var) {
        let v = var as usize;
        self.activity[v] += self.var_inc;
        if self.activity[v] > self.config.activity_rescale {
            let scale = 1.0 / self.config.activity_rescale;
            for a in &mut self.activity {
                *a *= scale;
            }
            self.var_inc *= scale;
        }
    }

    fn decay_activities(&mut self) {
        self.var_inc /= self.config.var_decay;
    }

    /// Debug check: watched literals of every pending clause are sound.
    ///
    /// For every clause of length >= 2 that is not satisfied, at most one
    /// watched literal is false once propagation has reached fixpoint.
    #[cfg(test)]
    fn check_watch_invariant(&self) {
        for (cid, clause) in self.clauses.iter().enumerate() {
            let satisfied = clause.iter().any(|&l| self.value(l) == LBool::True);
            if satisfied {
                continue;
            }
            let w0 = self.value(clause[0]) == LBool::False;
            let w1 = self.value(clause[1]) == LBool::False;
            assert!(
                !(w0 && w1),
                "both watches false in unsatisfied clause {cid}"
            );
        }
    }
}

/// Decide satisfiability of `cnf` with a fresh CDCL solver.
pub fn solve(cnf: &Cnf) -> SatResult {
    CdclSolver::new(cnf).solve()
}
