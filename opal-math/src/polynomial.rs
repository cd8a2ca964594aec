//! Multivariate polynomial arithmetic for the non-linear theory core.
//!
//! Polynomials are sets of `(coefficient, monomial)` terms with exact
//! rational coefficients. The smart constructor [`Polynomial::from_terms`]
//! enforces the representation invariants:
//! - every stored coefficient is non-zero,
//! - every stored exponent is strictly positive,
//! - monomials within a polynomial are pairwise distinct.

use crate::interval::{Interval, IntervalUnion};
use crate::rational::to_f64_bounds;
use num_rational::BigRational;
use num_traits::Zero;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Variable identifier for polynomials.
pub type Var = u32;

/// Null variable constant (indicates no variable).
pub const NULL_VAR: Var = u32::MAX;

/// Power of a variable (variable, exponent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarPower {
    /// The variable identifier.
    pub var: Var,
    /// The exponent of the variable; always strictly positive when stored.
    pub power: u32,
}

impl VarPower {
    /// Create a new variable power.
    #[inline]
    pub fn new(var: Var, power: u32) -> Self {
        Self { var, power }
    }
}

/// A monomial is a product of variables with positive exponents,
/// represented as a list of (variable, power) pairs sorted by variable.
/// The unit monomial (the constant 1) is the empty list.
#[derive(Clone, PartialEq, Eq)]
pub struct Monomial {
    vars: SmallVec<[VarPower; 4]>,
    total_degree: u32,
}

impl Hash for Monomial {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for vp in &self.vars {
            vp.hash(state);
        }
    }
}

impl fmt::Debug for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unit() {
            return write!(f, "1");
        }
        let mut first = true;
        for vp in &self.vars {
            if !first {
                write!(f, "*")?;
            }
            first = false;
            if vp.power == 1 {
                write!(f, "x{}", vp.var)?;
            } else {
                write!(f, "x{}^{}", vp.var, vp.power)?;
            }
        }
        Ok(())
    }
}

impl Monomial {
    /// Create the unit monomial (1).
    #[inline]
    pub fn unit() -> Self {
        Self {
            vars: SmallVec::new(),
            total_degree: 0,
        }
    }

    /// Create a monomial from a single variable with power 1.
    #[inline]
    pub fn from_var(var: Var) -> Self {
        Self::from_var_power(var, 1)
    }

    /// Create a monomial from a single variable with a given power.
    pub fn from_var_power(var: Var, power: u32) -> Self {
        if power == 0 {
            return Self::unit();
        }
        let mut vars = SmallVec::new();
        vars.push(VarPower::new(var, power));
        Self {
            total_degree: power,
            vars,
        }
    }

    /// Create a monomial from (variable, power) pairs; the input need not
    /// be sorted or normalized, and zero powers are dropped.
    pub fn from_powers(powers: impl IntoIterator<Item = (Var, u32)>) -> Self {
        let mut by_var: FxHashMap<Var, u32> = FxHashMap::default();
        for (var, power) in powers {
            if power > 0 {
                *by_var.entry(var).or_insert(0) += power;
            }
        }
        let mut vars: SmallVec<[VarPower; 4]> = by_var
            .into_iter()
            .map(|(v, p)| VarPower::new(v, p))
            .collect();
        vars.sort_by_key(|vp| vp.var);
        let total_degree = vars.iter().map(|vp| vp.power).sum();
        Self { vars, total_degree }
    }

    /// Returns true if this is the unit monomial.
    #[inline]
    pub fn is_unit(&self) -> bool {
        self.vars.is_empty()
    }

    /// Returns the total degree of the monomial.
    #[inline]
    pub fn total_degree(&self) -> u32 {
        self.total_degree
    }

    /// Returns the variable-power pairs, sorted by variable.
    #[inline]
    pub fn vars(&self) -> &[VarPower] {
        &self.vars
    }

    /// Returns the degree of a specific variable in this monomial.
    pub fn degree(&self, var: Var) -> u32 {
        self.vars
            .iter()
            .find(|vp| vp.var == var)
            .map(|vp| vp.power)
            .unwrap_or(0)
    }

    /// Returns the maximum variable in this monomial, or NULL_VAR if unit.
    pub fn max_var(&self) -> Var {
        self.vars.last().map(|vp| vp.var).unwrap_or(NULL_VAR)
    }

    /// Check if this monomial is linear (degree 0 or 1).
    #[inline]
    pub fn is_linear(&self) -> bool {
        self.total_degree <= 1
    }

    /// Multiply two monomials.
    pub fn mul(&self, other: &Monomial) -> Monomial {
        if self.is_unit() {
            return other.clone();
        }
        if other.is_unit() {
            return self.clone();
        }
        let mut vars: SmallVec<[VarPower; 4]> = SmallVec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.vars.len() && j < other.vars.len() {
            match self.vars[i].var.cmp(&other.vars[j].var) {
                Ordering::Less => {
                    vars.push(self.vars[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    vars.push(other.vars[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    vars.push(VarPower::new(
                        self.vars[i].var,
                        self.vars[i].power + other.vars[j].power,
                    ));
                    i += 1;
                    j += 1;
                }
            }
        }
        vars.extend_from_slice(&self.vars[i..]);
        vars.extend_from_slice(&other.vars[j..]);
        Monomial {
            total_degree: self.total_degree + other.total_degree,
            vars,
        }
    }

    /// Remove `var^power` from the monomial; `None` if it does not divide.
    pub fn without(&self, var: Var, power: u32) -> Option<Monomial> {
        let have = self.degree(var);
        if have < power {
            return None;
        }
        Some(Self::from_powers(self.vars.iter().map(|vp| {
            if vp.var == var {
                (vp.var, vp.power - power)
            } else {
                (vp.var, vp.power)
            }
        })))
    }

    /// Lexicographic comparison of monomials.
    pub fn lex_cmp(&self, other: &Monomial) -> Ordering {
        let (mut i, mut j) = (0, 0);
        while i < self.vars.len() && j < other.vars.len() {
            match self.vars[i].var.cmp(&other.vars[j].var) {
                Ordering::Less => return Ordering::Greater,
                Ordering::Greater => return Ordering::Less,
                Ordering::Equal => match self.vars[i].power.cmp(&other.vars[j].power) {
                    Ordering::Equal => {
                        i += 1;
                        j += 1;
                    }
                    ord => return ord,
                },
            }
        }
        if i < self.vars.len() {
            Ordering::Greater
        } else if j < other.vars.len() {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }
}

/// A multivariate polynomial with rational coefficients.
///
/// Terms are kept sorted by graded-lexicographic monomial order so that
/// identical polynomials have identical representations.
#[derive(Clone, PartialEq)]
pub struct Polynomial {
    terms: Vec<(BigRational, Monomial)>,
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        let mut first = true;
        for (c, m) in &self.terms {
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            if m.is_unit() {
                write!(f, "{c}")?;
            } else {
                write!(f, "{c}*{m:?}")?;
            }
        }
        Ok(())
    }
}

impl Polynomial {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    /// A constant polynomial.
    pub fn constant(c: BigRational) -> Self {
        Self::from_terms(vec![(c, Monomial::unit())])
    }

    /// The polynomial `x`.
    pub fn from_var(var: Var) -> Self {
        Self::from_terms(vec![(
            BigRational::from_integer(1.into()),
            Monomial::from_var(var),
        )])
    }

    /// Smart constructor: combines like monomials and drops zero results.
    pub fn from_terms(terms: Vec<(BigRational, Monomial)>) -> Self {
        let mut by_monomial: FxHashMap<Monomial, BigRational> = FxHashMap::default();
        for (c, m) in terms {
            if c.is_zero() {
                continue;
            }
            let entry = by_monomial.entry(m).or_insert_with(BigRational::zero);
            *entry += c;
        }
        let mut terms: Vec<(BigRational, Monomial)> = by_monomial
            .into_iter()
            .filter(|(_, c)| !c.is_zero())
            .map(|(m, c)| (c, m))
            .collect();
        terms.sort_by(|(_, a), (_, b)| {
            b.total_degree()
                .cmp(&a.total_degree())
                .then_with(|| a.lex_cmp(b))
        });
        Self { terms }
    }

    /// True iff this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// The terms, each with non-zero coefficient and distinct monomial.
    pub fn terms(&self) -> &[(BigRational, Monomial)] {
        &self.terms
    }

    /// Maximum total degree over all terms (0 for the zero polynomial).
    pub fn total_degree(&self) -> u32 {
        self.terms
            .iter()
            .map(|(_, m)| m.total_degree())
            .max()
            .unwrap_or(0)
    }

    /// Degree of a specific variable.
    pub fn degree(&self, var: Var) -> u32 {
        self.terms
            .iter()
            .map(|(_, m)| m.degree(var))
            .max()
            .unwrap_or(0)
    }

    /// The coefficient of the unit monomial.
    pub fn constant_term(&self) -> BigRational {
        self.terms
            .iter()
            .find(|(_, m)| m.is_unit())
            .map(|(c, _)| c.clone())
            .unwrap_or_else(BigRational::zero)
    }

    /// All variables occurring in the polynomial, ascending.
    pub fn variables(&self) -> Vec<Var> {
        let mut set: FxHashSet<Var> = FxHashSet::default();
        for (_, m) in &self.terms {
            for vp in m.vars() {
                set.insert(vp.var);
            }
        }
        let mut vars: Vec<Var> = set.into_iter().collect();
        vars.sort_unstable();
        vars
    }

    /// Polynomial addition.
    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        Self::from_terms(terms)
    }

    /// Polynomial subtraction.
    pub fn sub(&self, other: &Polynomial) -> Polynomial {
        self.add(&other.neg())
    }

    /// Polynomial negation.
    pub fn neg(&self) -> Polynomial {
        Self {
            terms: self
                .terms
                .iter()
                .map(|(c, m)| (-c.clone(), m.clone()))
                .collect(),
        }
    }

    /// Polynomial multiplication.
    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        let mut terms = Vec::with_capacity(self.terms.len() * other.terms.len());
        for (c1, m1) in &self.terms {
            for (c2, m2) in &other.terms {
                terms.push((c1 * c2, m1.mul(m2)));
            }
        }
        Self::from_terms(terms)
    }

    /// Multiply by a rational scalar.
    pub fn scale(&self, c: &BigRational) -> Polynomial {
        if c.is_zero() {
            return Self::zero();
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(c0, m)| (c0 * c, m.clone()))
                .collect(),
        }
    }

    /// Interval evaluation of the polynomial under variable domains.
    ///
    /// Coefficients enter through outward-rounded `f64` bounds, so the
    /// result contains the exact value for every point in the domains.
    pub fn eval_on(&self, lookup: impl Fn(Var) -> IntervalUnion<f64>) -> IntervalUnion<f64> {
        let mut acc = IntervalUnion::point(0.0);
        for (c, m) in &self.terms {
            acc = acc.add(&eval_term(c, m, &lookup));
        }
        acc
    }
}

/// Interval evaluation of a single `coeff * monomial` term.
pub fn eval_term(
    coeff: &BigRational,
    monomial: &Monomial,
    lookup: impl Fn(Var) -> IntervalUnion<f64>,
) -> IntervalUnion<f64> {
    let (lo, hi) = to_f64_bounds(coeff);
    let mut acc = IntervalUnion::single(Interval::new(lo, hi));
    for vp in monomial.vars() {
        acc = acc.mul(&lookup(vp.var).pow(vp.power));
    }
    acc
}
