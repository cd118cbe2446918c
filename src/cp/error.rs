//! Error types for model construction and solver configuration.

use super::variables::VarId;
use thiserror::Error;

/// A malformed model. Raised while the model is being built, never during search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A constraint mentions a variable that was never declared.
    #[error("{constraint}: unknown variable {var} (model has {declared} variables)")]
    UnknownVariable {
        constraint: &'static str,
        var: VarId,
        declared: usize,
    },

    /// A variable was declared with no values.
    #[error("variable '{name}' has an empty domain")]
    EmptyDomain { name: String },

    /// A variable's value range is too wide for a bitset domain.
    #[error("variable '{name}' spans {width} values (limit {limit})")]
    DomainTooWide {
        name: String,
        width: u128,
        limit: usize,
    },

    /// A linear constraint has a different number of variables and coefficients.
    #[error("linear sum: {vars} variables but {coeffs} coefficients")]
    LengthMismatch { vars: usize, coeffs: usize },

    /// Lower bound above upper bound.
    #[error("{constraint}: lower bound {lower} exceeds upper bound {upper}")]
    InvertedBounds {
        constraint: &'static str,
        lower: i64,
        upper: i64,
    },

    /// A constraint with no variables or no literals.
    #[error("{0}: empty scope")]
    EmptyScope(&'static str),
}

/// An invalid solver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("search runs on exactly one worker, got {0}")]
    Workers(usize),

    #[error("time limit must be positive")]
    TimeLimit,
}
