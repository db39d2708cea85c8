//! Error types for the planning core
//!
//! Only invalid input is an error. Degraded weight solves, sampling gaps,
//! empty results and truncated scans are reported through the outcome types
//! of the operation that produced them.

use thiserror::Error;

/// Invalid input detected before any computation starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error("pairwise matrix must have at least one criterion")]
    EmptyMatrix,

    #[error("criterion index {index} out of range for {size} criteria")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("diagonal entry ({0}, {0}) is fixed at 1")]
    DiagonalEdit(usize),

    #[error("value {0} is not on the 1/9..9 pairwise scale")]
    NotOnScale(f64),

    #[error("unknown pairwise judgment label '{0}'")]
    UnknownJudgment(String),

    #[error("expected {expected} upper-triangle judgments, got {actual}")]
    UpperTriangleLength { expected: usize, actual: usize },

    #[error("cannot remove the last remaining criterion")]
    LastCriterion,

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} = {value} is outside the allowed range {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("factor weights must be finite and non-negative with a positive sum, got {0}")]
    NonPositiveWeightSum(f64),

    #[error("{0} weights supplied for {1} criteria")]
    WeightCountMismatch(usize, usize),

    #[error("no criteria supplied")]
    NoCriteria,

    #[error("criterion '{0}' has no observed min/max and none could be computed")]
    MissingRange(String),

    #[error("region is not a usable polygon: {0}")]
    InvalidRegion(&'static str),

    #[error("grid of {rows}x{cols} cells needs {expected} values, got {actual}")]
    GridShape {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("requested count must be at least 1")]
    ZeroCount,
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Reject non-finite or non-positive parameters
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PlannerError::NonPositive { name, value })
    }
}

/// Reject values outside an inclusive range (NaN included)
pub(crate) fn ensure_within(name: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if value >= min && value <= max {
        Ok(value)
    } else {
        Err(PlannerError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
