//! Error type for the theory solvers.
//!
//! Domain-level negative answers (UNSAT, empty interval) are ordinary
//! return values, not errors. This enum covers programmer mistakes caught
//! at the API boundary; internal invariant violations panic instead.

use thiserror::Error;

/// Error type for theory-solver operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TheoryError {
    /// The caller handed over malformed input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for theory-solver operations.
pub type TheoryResult<T> = Result<T, TheoryError>;
