//! Pairwise Weight Solver
//!
//! Derives criterion weights from a reciprocal judgment matrix via its
//! principal eigenvector and reports Saaty's consistency ratio.
//!
//! A positive reciprocal matrix has a simple dominant real eigenvalue (the
//! Perron root) with a strictly positive eigenvector, so power iteration
//! converges to exactly the eigenpair we want. When it does not converge, or
//! produces non-finite values, the solve degrades to uniform weights.

use super::matrix::PairwiseComparisonMatrix;
use nalgebra::DVector;
use serde::Serialize;

/// Conventional acceptability threshold for the consistency ratio
pub const CONSISTENCY_THRESHOLD: f64 = 0.10;

/// Saaty's Random Index for n = 1..=10
const RANDOM_INDEX: [f64; 10] = [0.00, 0.00, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49];

const MAX_ITERATIONS: usize = 1000;
const CONVERGENCE_TOLERANCE: f64 = 1e-12;

/// Random Index for `n` criteria
///
/// Matrices larger than the published table reuse the n = 10 value.
pub fn random_index(n: usize) -> f64 {
    match n {
        0 => 0.0,
        n => RANDOM_INDEX[n.min(RANDOM_INDEX.len()) - 1],
    }
}

/// Consistency diagnostic for one solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsistencyReport {
    pub principal_eigenvalue: f64,
    pub consistency_index: f64,
    pub consistency_ratio: f64,
}

impl ConsistencyReport {
    /// CR within the conventional 0.10 threshold
    pub fn is_acceptable(&self) -> bool {
        self.consistency_ratio <= CONSISTENCY_THRESHOLD
    }
}

/// Weights plus the consistency diagnostic
///
/// `consistency` is `None` when the eigen solve failed and the weights fell
/// back to `1/n`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSolution {
    pub weights: Vec<f64>,
    pub consistency: Option<ConsistencyReport>,
}

impl WeightSolution {
    /// Uniform fallback weights
    pub(crate) fn uniform(n: usize) -> Self {
        Self {
            weights: vec![1.0 / n as f64; n],
            consistency: None,
        }
    }

    /// Whether the solve fell back to uniform weights
    pub fn is_degraded(&self) -> bool {
        self.consistency.is_none()
    }

    /// Consistency ratio, if defined
    pub fn consistency_ratio(&self) -> Option<f64> {
        self.consistency.map(|c| c.consistency_ratio)
    }

    /// True only when CR is defined and above the 0.10 threshold
    pub fn exceeds_threshold(&self) -> bool {
        self.consistency.is_some_and(|c| !c.is_acceptable())
    }
}

/// Solve weights and consistency for a judgment matrix
pub fn solve_weights(matrix: &PairwiseComparisonMatrix) -> WeightSolution {
    let n = matrix.size();
    if n == 1 {
        return WeightSolution {
            weights: vec![1.0],
            consistency: Some(ConsistencyReport {
                principal_eigenvalue: 1.0,
                consistency_index: 0.0,
                consistency_ratio: 0.0,
            }),
        };
    }

    weights_from_eigenpair(n, principal_eigenpair(matrix))
}

/// Turn a solved eigenpair into weights and a consistency report
///
/// A missing pair, a non-finite value or a zero-sum eigenvector falls back
/// to uniform weights with no report.
pub(crate) fn weights_from_eigenpair(n: usize, eigenpair: Option<(f64, DVector<f64>)>) -> WeightSolution {
    let usable = eigenpair.filter(|(lambda, w)| {
        w.len() == n && lambda.is_finite() && w.iter().all(|v| v.is_finite())
    });
    let Some((lambda_max, eigenvector)) = usable else {
        tracing::warn!("Eigen solve failed for {} criteria - using uniform weights", n);
        return WeightSolution::uniform(n);
    };

    let total: f64 = eigenvector.iter().map(|v| v.abs()).sum();
    if !(total > 0.0 && total.is_finite()) {
        tracing::warn!("Degenerate eigenvector for {} criteria - using uniform weights", n);
        return WeightSolution::uniform(n);
    }
    let weights = eigenvector.iter().map(|v| v.abs() / total).collect();

    // Two criteria can't be inconsistent
    let (ci, cr) = if n <= 2 {
        (0.0, 0.0)
    } else {
        let ci = (lambda_max - n as f64) / (n as f64 - 1.0);
        let ri = random_index(n);
        (ci, if ri > 0.0 { ci / ri } else { 0.0 })
    };

    let report = ConsistencyReport {
        principal_eigenvalue: lambda_max,
        consistency_index: ci,
        consistency_ratio: cr,
    };

    // callers decide how loudly to report a high CR
    tracing::debug!(
        "AHP weights for {} criteria: CR = {:.4} (lambda_max = {:.3})",
        n,
        cr,
        lambda_max
    );

    WeightSolution {
        weights,
        consistency: Some(report),
    }
}

/// Dominant eigenvalue and eigenvector (L1-normalized) by power iteration
fn principal_eigenpair(matrix: &PairwiseComparisonMatrix) -> Option<(f64, DVector<f64>)> {
    let n = matrix.size();
    let a = matrix.to_dmatrix();
    let mut w = DVector::from_element(n, 1.0 / n as f64);

    let mut converged = false;
    for _ in 0..MAX_ITERATIONS {
        let next = &a * &w;
        let total = next.sum();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        let next = next / total;
        let delta: f64 = next.iter().zip(w.iter()).map(|(a, b)| (a - b).abs()).sum();
        w = next;
        if delta < CONVERGENCE_TOLERANCE {
            converged = true;
            break;
        }
    }
    if !converged {
        return None;
    }

    // Rayleigh-style estimate: mean of (A w)_i / w_i
    let aw = &a * &w;
    let mut lambda = 0.0;
    for i in 0..n {
        if w[i] <= 0.0 {
            return None;
        }
        lambda += aw[i] / w[i];
    }
    Some((lambda / n as f64, w))
}
