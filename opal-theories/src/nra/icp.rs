//! Interval constraint propagation.
//!
//! The engine repeatedly picks a (constraint, variable) contraction
//! candidate, solves the constraint for the variable under the current
//! domains, and intersects the variable's domain with the solution set.
//! Domains only ever shrink, so every real solution under the initial
//! domains stays covered.
//!
//! Candidate selection is weight-guided: candidates live in buckets
//! keyed by strictly positive weights, and the front of the
//! maximum-weight bucket is chosen in time independent of the other
//! buckets' sizes. A chosen candidate is reinserted with its achieved
//! relative contraction as the new weight; candidates that stopped
//! making progress are retired.

use super::{DomainMap, PolyConstraint};
use crate::error::TheoryError;
use crate::relation::Relation;
use num_rational::BigRational;
use opal_math::polynomial::eval_term;
use opal_math::{Interval, IntervalUnion, Polynomial, Var};
use smallvec::SmallVec;
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, trace};

/// Tunables for the ICP engine.
#[derive(Debug, Clone)]
pub struct IcpConfig {
    /// Number of contraction steps before the engine stops.
    pub max_iterations: usize,
}

impl Default for IcpConfig {
    fn default() -> Self {
        Self { max_iterations: 10 }
    }
}

/// Counters for the ICP engine.
#[derive(Debug, Clone, Default)]
pub struct IcpStats {
    /// Contraction steps performed.
    pub iterations: usize,
    /// Steps that narrowed a domain.
    pub contractions: usize,
    /// Domains that became empty.
    pub empty_domains: usize,
}

/// Weighted contraction candidates.
///
/// Buckets are keyed by strictly positive weights; within a bucket,
/// candidates are served first-in first-out.
#[derive(Debug, Default)]
pub struct Candidates {
    buckets: BTreeMap<BigRational, VecDeque<(usize, Var)>>,
}

impl Candidates {
    /// An empty candidate store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate under the given weight; non-positive weights
    /// retire the candidate instead.
    pub fn insert(&mut self, weight: BigRational, candidate: (usize, Var)) {
        if weight <= BigRational::from_integer(0.into()) {
            return;
        }
        self.buckets.entry(weight).or_default().push_back(candidate);
    }

    /// Pop the first candidate of the maximum-weight bucket.
    pub fn choose(&mut self) -> Option<(usize, Var)> {
        let weight = self.buckets.keys().next_back()?.clone();
        let bucket = self
            .buckets
            .get_mut(&weight)
            .expect("maximum key has a bucket");
        let candidate = bucket
            .pop_front()
            .expect("candidate buckets are never empty");
        if bucket.is_empty() {
            self.buckets.remove(&weight);
        }
        Some(candidate)
    }

    /// True iff no candidate remains.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Result of a refinement run.
#[derive(Debug, Clone)]
pub struct Refinement {
    /// Refined domains for the input variables.
    pub domains: DomainMap,
    /// True iff some domain (input or auxiliary) became empty.
    pub conflict: bool,
    /// Counters.
    pub stats: IcpStats,
}

/// The contraction engine over a linearized constraint set.
pub struct IcpEngine {
    constraints: Vec<PolyConstraint>,
    domains: DomainMap,
    candidates: Candidates,
    config: IcpConfig,
    stats: IcpStats,
    conflict: bool,
}

/// Solution set of a constraint for one variable, with endpoints that a
/// strict relation excludes.
struct Solution {
    set: IntervalUnion<f64>,
    excluded: SmallVec<[f64; 2]>,
}

impl IcpEngine {
    /// Build an engine over already-linearized constraints: every
    /// variable must occur in at most one term per constraint.
    pub fn new(
        constraints: Vec<PolyConstraint>,
        domains: DomainMap,
        config: IcpConfig,
    ) -> Result<Self, TheoryError> {
        let initial_weight = BigRational::new(1.into(), 10.into());
        let mut candidates = Candidates::new();
        for (cid, c) in constraints.iter().enumerate() {
            for var in c.poly.variables() {
                let occurrences = c
                    .poly
                    .terms()
                    .iter()
                    .filter(|(_, m)| m.degree(var) > 0)
                    .count();
                if occurrences > 1 {
                    return Err(TheoryError::InvalidInput(format!(
                        "variable {var} occurs in {occurrences} terms of constraint {cid}; \
                         linearize the input first"
                    )));
                }
                candidates.insert(initial_weight.clone(), (cid, var));
            }
        }
        Ok(Self {
            constraints,
            domains,
            candidates,
            config,
            stats: IcpStats::default(),
            conflict: false,
        })
    }

    /// Run contraction until the iteration budget runs out, a domain
    /// empties, or no candidate remains.
    pub fn run(mut self) -> Refinement {
        for _ in 0..self.config.max_iterations {
            let Some((cid, var)) = self.candidates.choose() else {
                break;
            };
            self.stats.iterations += 1;
            let weight = self.contract(cid, var);
            if self.conflict {
                debug!(var, "domain emptied");
                break;
            }
            if let Some(weight) = weight {
                self.candidates.insert(weight, (cid, var));
            }
        }
        Refinement {
            domains: self.domains,
            conflict: self.conflict,
            stats: self.stats,
        }
    }

    /// Contract `var` through constraint `cid`; returns the achieved
    /// relative contraction as the candidate's next weight.
    fn contract(&mut self, cid: usize, var: Var) -> Option<BigRational> {
        let old = self
            .domains
            .get(&var)
            .cloned()
            .unwrap_or_else(IntervalUnion::full);
        let solution = solve_for(&self.constraints[cid], var, &self.domains)?;

        let mut narrowed = old.intersect(&solution.set);
        if !solution.excluded.is_empty() {
            // A strict bound empties a component the relation only
            // touches at a point.
            narrowed = IntervalUnion::from_parts(
                narrowed
                    .parts()
                    .iter()
                    .filter(|p| !(p.lo == p.hi && solution.excluded.contains(&p.lo)))
                    .copied()
                    .collect(),
            );
        }
        trace!(cid, var, ?narrowed, "contraction");

        let old_diameter = old.diameter();
        let new_diameter = narrowed.diameter();
        if narrowed.is_empty() {
            self.stats.empty_domains += 1;
            self.conflict = true;
        }
        if new_diameter < old_diameter {
            self.stats.contractions += 1;
        }
        self.domains.insert(var, narrowed);
        relative_contraction(old_diameter, new_diameter)
    }
}

/// `(old - new) / old` as an exact weight; 0 (retire) when the old
/// diameter is 0 or no progress was made, 1 when an unbounded domain
/// became bounded.
fn relative_contraction(old: f64, new: f64) -> Option<BigRational> {
    if old == 0.0 {
        return None;
    }
    if old.is_infinite() {
        return if new.is_finite() {
            Some(BigRational::from_integer(1.into()))
        } else {
            None
        };
    }
    let ratio = ((old - new) / old).clamp(0.0, 1.0);
    if ratio <= 0.0 {
        return None;
    }
    BigRational::from_float(ratio)
}

/// Solve `constraint` for `var` under the domains: the returned set
/// contains every value of `var` admitting a solution of the constraint
/// with all other variables in their domains.
///
/// Returns `None` when the constraint yields no restriction (variable
/// occurs in several terms, or the divisor straddles zero under a
/// non-strict relation).
fn solve_for(constraint: &PolyConstraint, var: Var, domains: &DomainMap) -> Option<Solution> {
    let occurrences: Vec<usize> = constraint
        .poly
        .terms()
        .iter()
        .enumerate()
        .filter(|(_, (_, m))| m.degree(var) > 0)
        .map(|(i, _)| i)
        .collect();
    let &[index] = &occurrences[..] else {
        return None;
    };

    let (coeff, monomial) = &constraint.poly.terms()[index];
    let k = monomial.degree(var);
    let rest = monomial
        .without(var, k)
        .expect("monomial contains the variable");

    let lookup = |v: Var| {
        domains
            .get(&v)
            .cloned()
            .unwrap_or_else(IntervalUnion::full)
    };

    // Move everything else to the right-hand side and evaluate.
    let rhs_poly = Polynomial::from_terms(
        constraint
            .poly
            .terms()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, t)| t.clone())
            .collect(),
    )
    .neg();
    let rhs = rhs_poly.eval_on(lookup);

    // Divisor: the coefficient times the rest of the monomial.
    let divisor = eval_term(coeff, &rest, lookup);
    if rhs.is_empty() || divisor.is_empty() {
        return Some(Solution {
            set: IntervalUnion::empty(),
            excluded: SmallVec::new(),
        });
    }
    if divisor.contains(0.0) {
        // Dividing by something that may be zero: nothing can be
        // concluded for a non-strict relation, while a strict one has no
        // admissible value.
        return if constraint.rel.is_strict() {
            Some(Solution {
                set: IntervalUnion::empty(),
                excluded: SmallVec::new(),
            })
        } else {
            None
        };
    }
    let hull = divisor.hull();
    let negative = hull.hi < 0.0;
    if !negative && hull.lo < 0.0 {
        // Mixed-sign divisor union: the inequality direction differs per
        // component. Only an equality still contracts.
        if constraint.rel != Relation::Eq {
            return None;
        }
    }

    let quotient = rhs.div(&divisor);
    let rel = if negative {
        constraint.rel.flip()
    } else {
        constraint.rel
    };
    Some(preimage(&quotient, rel, k))
}

/// The set of `x` with `x^k rel q` for some `q` in the quotient set.
fn preimage(quotient: &IntervalUnion<f64>, rel: Relation, k: u32) -> Solution {
    let mut excluded: SmallVec<[f64; 2]> = SmallVec::new();
    let set = match rel {
        Relation::Eq => quotient.nth_root(k),
        Relation::Le | Relation::Lt => {
            let sup = quotient.hull().hi;
            let root = if k <= 1 {
                sup
            } else {
                opal_math::interval::Scalar::nth_root_upper(sup, k)
            };
            if rel == Relation::Lt {
                excluded.push(root);
            }
            if k > 1 && k % 2 == 0 {
                if sup < 0.0 {
                    IntervalUnion::empty()
                } else {
                    if rel == Relation::Lt {
                        excluded.push(-root);
                    }
                    IntervalUnion::single(Interval::new(-root, root))
                }
            } else {
                IntervalUnion::single(Interval::new(f64::NEG_INFINITY, root))
            }
        }
        Relation::Ge | Relation::Gt => {
            let inf = quotient.hull().lo;
            let root = if k <= 1 {
                inf
            } else {
                opal_math::interval::Scalar::nth_root_lower(inf, k)
            };
            if rel == Relation::Gt {
                excluded.push(root);
            }
            if k > 1 && k % 2 == 0 {
                if inf <= 0.0 {
                    IntervalUnion::full()
                } else {
                    if rel == Relation::Gt {
                        excluded.push(-root);
                    }
                    IntervalUnion::from_parts(vec![
                        Interval::new(f64::NEG_INFINITY, -root),
                        Interval::new(root, f64::INFINITY),
                    ])
                }
            } else {
                IntervalUnion::single(Interval::new(root, f64::INFINITY))
            }
        }
    };
    Solution { set, excluded }
}

/// Linearize, contract, and return the refined domains restricted to the
/// input variables.
pub fn refine(
    constraints: &[PolyConstraint],
    domains: &DomainMap,
    config: IcpConfig,
) -> Refinement {
    let linearized = super::linearize(constraints, domains);
    let first_aux = linearized.first_aux;

    let mut all = linearized.constraints;
    all.extend(linearized.side_constraints);
    let engine = IcpEngine::new(all, linearized.domains, config)
        .expect("linearized constraint sets are always well-formed");
    let mut refinement = engine.run();

    refinement.domains.retain(|v, _| *v < first_aux);
    refinement
}
