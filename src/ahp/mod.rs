//! Analytic Hierarchy Process
//!
//! Pairwise judgments on the 1/9..9 scale, the reciprocal matrix that holds
//! them, and the principal-eigenvector weight solve with its consistency ratio.

pub mod scale;
pub mod matrix;
pub mod solver;

pub use scale::Judgment;
pub use matrix::PairwiseComparisonMatrix;
pub use solver::{
    random_index, solve_weights, ConsistencyReport, WeightSolution, CONSISTENCY_THRESHOLD,
};
