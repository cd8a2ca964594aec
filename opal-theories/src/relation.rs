//! Constraint relations shared by the arithmetic theories.

/// Comparison relation of a constraint against its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Less than or equal.
    Le,
    /// Strictly less than.
    Lt,
    /// Equal.
    Eq,
    /// Greater than or equal.
    Ge,
    /// Strictly greater than.
    Gt,
}

impl Relation {
    /// Mirror the relation, as when both sides are negated.
    pub fn flip(self) -> Self {
        match self {
            Relation::Le => Relation::Ge,
            Relation::Lt => Relation::Gt,
            Relation::Eq => Relation::Eq,
            Relation::Ge => Relation::Le,
            Relation::Gt => Relation::Lt,
        }
    }

    /// The complementary relation (`¬(t ≤ b)` is `t > b`); equalities have
    /// no single complement and return `None`.
    pub fn complement(self) -> Option<Self> {
        match self {
            Relation::Le => Some(Relation::Gt),
            Relation::Lt => Some(Relation::Ge),
            Relation::Eq => None,
            Relation::Ge => Some(Relation::Lt),
            Relation::Gt => Some(Relation::Le),
        }
    }

    /// True for `Lt` and `Gt`.
    pub fn is_strict(self) -> bool {
        matches!(self, Relation::Lt | Relation::Gt)
    }

    /// Evaluate `lhs rel rhs` for any ordered type.
    pub fn eval<T: PartialOrd>(self, lhs: &T, rhs: &T) -> bool {
        match self {
            Relation::Le => lhs <= rhs,
            Relation::Lt => lhs < rhs,
            Relation::Eq => lhs == rhs,
            Relation::Ge => lhs >= rhs,
            Relation::Gt => lhs > rhs,
        }
    }
}
