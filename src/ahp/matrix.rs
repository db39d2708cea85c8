//! Pairwise Comparison Matrix
//!
//! Reciprocal n×n judgment matrix. Only the upper triangle is independent;
//! every edit writes both `(i, j)` and `(j, i)` so the reciprocal invariant
//! holds after each mutation, not only when weights are solved.

use super::scale::Judgment;
use crate::error::{PlannerError, Result};
use nalgebra::DMatrix;

/// Reciprocal matrix of pairwise importance judgments
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseComparisonMatrix {
    judgments: Vec<Judgment>, // row-major, n*n
    n: usize,
}

impl PairwiseComparisonMatrix {
    /// All-equal matrix for `n` criteria
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(PlannerError::EmptyMatrix);
        }
        Ok(Self {
            judgments: vec![Judgment::EQUAL; n * n],
            n,
        })
    }

    /// Rebuild a matrix from its n(n-1)/2 upper entries, row by row
    ///
    /// For n = 3 the order is (0,1), (0,2), (1,2).
    pub fn from_upper_triangle(n: usize, upper: &[Judgment]) -> Result<Self> {
        let mut matrix = Self::new(n)?;
        let expected = n * (n - 1) / 2;
        if upper.len() != expected {
            return Err(PlannerError::UpperTriangleLength {
                expected,
                actual: upper.len(),
            });
        }

        let mut entries = upper.iter();
        for i in 0..n {
            for j in i + 1..n {
                if let Some(&judgment) = entries.next() {
                    matrix.set(i, j, judgment)?;
                }
            }
        }
        Ok(matrix)
    }

    /// Number of criteria
    pub fn size(&self) -> usize {
        self.n
    }

    /// Judgment stored at `(i, j)`
    pub fn judgment(&self, i: usize, j: usize) -> Result<Judgment> {
        self.check_index(i)?;
        self.check_index(j)?;
        Ok(self.judgments[i * self.n + j])
    }

    /// Ratio stored at `(i, j)`
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        self.judgment(i, j).map(Judgment::value)
    }

    /// Set `(i, j)` and its reciprocal `(j, i)`
    pub fn set(&mut self, i: usize, j: usize, judgment: Judgment) -> Result<()> {
        self.check_index(i)?;
        self.check_index(j)?;
        if i == j {
            return Err(PlannerError::DiagonalEdit(i));
        }
        self.judgments[i * self.n + j] = judgment;
        self.judgments[j * self.n + i] = judgment.reciprocal();
        Ok(())
    }

    /// Set `(i, j)` from a raw ratio, which must be one of the 17 scale values
    pub fn set_value(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        let judgment = Judgment::try_from_value(value)?;
        self.set(i, j, judgment)
    }

    /// Upper-triangle judgments in row order (inverse of `from_upper_triangle`)
    pub fn upper_triangle(&self) -> Vec<Judgment> {
        let mut out = Vec::with_capacity(self.n * (self.n - 1) / 2);
        for i in 0..self.n {
            for j in i + 1..self.n {
                out.push(self.judgments[i * self.n + j]);
            }
        }
        out
    }

    /// Append a criterion judged equal to every existing one
    pub fn add_criterion(&mut self) {
        let n = self.n + 1;
        let mut judgments = vec![Judgment::EQUAL; n * n];
        for i in 0..self.n {
            for j in 0..self.n {
                judgments[i * n + j] = self.judgments[i * self.n + j];
            }
        }
        self.judgments = judgments;
        self.n = n;
    }

    /// Drop criterion `k`, keeping the judgments among the others
    pub fn remove_criterion(&mut self, k: usize) -> Result<()> {
        self.check_index(k)?;
        if self.n == 1 {
            return Err(PlannerError::LastCriterion);
        }
        let old_n = self.n;
        self.judgments = (0..old_n)
            .filter(|&i| i != k)
            .flat_map(|i| {
                (0..old_n)
                    .filter(move |&j| j != k)
                    .map(move |j| (i, j))
            })
            .map(|(i, j)| self.judgments[i * old_n + j])
            .collect();
        self.n = old_n - 1;
        Ok(())
    }

    /// Dense numeric form for the eigen solve
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.n, self.n, |i, j| self.judgments[i * self.n + j].value())
    }

    /// Check `M[i][i] = 1` and `M[i][j] * M[j][i] = 1` within `tolerance`
    pub fn is_reciprocal(&self, tolerance: f64) -> bool {
        let m = self.to_dmatrix();
        (0..self.n).all(|i| {
            (m[(i, i)] - 1.0).abs() <= tolerance
                && (0..self.n).all(|j| (m[(i, j)] * m[(j, i)] - 1.0).abs() <= tolerance)
        })
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.n {
            Ok(())
        } else {
            Err(PlannerError::IndexOutOfRange {
                index,
                size: self.n,
            })
        }
    }
}
