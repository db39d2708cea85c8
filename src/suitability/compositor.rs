//! Weighted linear combination of normalized criteria
//!
//! Raster-algebra semantics: a point with no data in any input has no data
//! in the output.

use super::criterion::{Criterion, ResolvedCriterion};
use crate::ahp::WeightSolution;
use crate::error::{PlannerError, Result};
use crate::fields::{GridField, GridGeometry, ScalarFieldSource};
use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Marker written into composite grids where any input is missing
pub const COMPOSITE_NODATA: f64 = -9999.0;

/// Post-multiplier applied to the weighted sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputScale {
    /// 0-1 when weights sum to 1
    #[default]
    Unit,
    /// 0-100
    Percent,
}

impl OutputScale {
    pub fn factor(self) -> f64 {
        match self {
            OutputScale::Unit => 1.0,
            OutputScale::Percent => 100.0,
        }
    }
}

/// Composite suitability surface built from weighted criteria
#[derive(Debug, Clone)]
pub struct SuitabilityCompositor {
    criteria: Vec<ResolvedCriterion>,
    scale: OutputScale,
}

impl SuitabilityCompositor {
    /// Build from criteria, resolving missing ranges over each whole grid
    pub fn new(criteria: Vec<Criterion>) -> Result<Self> {
        Self::build(criteria, None, None)
    }

    /// Build with missing ranges resolved only from cells inside `extent`
    pub fn within_extent(criteria: Vec<Criterion>, extent: Rect<f64>) -> Result<Self> {
        Self::build(criteria, None, Some(&extent))
    }

    /// Build with weights taken by index from an AHP solve
    pub fn with_solution(
        criteria: Vec<Criterion>,
        solution: &WeightSolution,
        extent: Option<Rect<f64>>,
    ) -> Result<Self> {
        if solution.weights.len() != criteria.len() {
            return Err(PlannerError::WeightCountMismatch(solution.weights.len(), criteria.len()));
        }
        Self::build(criteria, Some(&solution.weights), extent.as_ref())
    }

    fn build(mut criteria: Vec<Criterion>, weights: Option<&[f64]>, extent: Option<&Rect<f64>>) -> Result<Self> {
        if criteria.is_empty() {
            return Err(PlannerError::NoCriteria);
        }
        if let Some(weights) = weights {
            for (c, w) in criteria.iter_mut().zip(weights) {
                c.weight = Some(*w);
            }
        }

        let fallback = 1.0 / criteria.len() as f64;
        let criteria = criteria
            .iter()
            .map(|c| c.resolve(extent, fallback))
            .collect::<Result<Vec<_>>>()?;

        let total: f64 = criteria.iter().map(|c| c.weight).sum();
        if (total - 1.0).abs() > 1e-6 {
            tracing::debug!("Criterion weights sum to {:.4}; composite may leave 0-1", total);
        }

        Ok(Self {
            criteria,
            scale: OutputScale::Unit,
        })
    }

    pub fn with_scale(mut self, scale: OutputScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn scale(&self) -> OutputScale {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Effective weight per criterion, in input order
    pub fn weights(&self) -> Vec<f64> {
        self.criteria.iter().map(|c| c.weight).collect()
    }

    /// Resolved (min, max) per criterion name
    pub fn ranges(&self) -> Vec<(&str, f64, f64)> {
        self.criteria
            .iter()
            .map(|c| (c.name.as_str(), c.min, c.max))
            .collect()
    }

    /// Composite at `point`; `None` if any criterion has no data there
    pub fn evaluate(&self, point: Point<f64>) -> Option<f64> {
        let mut total = 0.0;
        for criterion in &self.criteria {
            total += criterion.contribution(point)?;
        }
        Some(total * self.scale.factor())
    }

    /// Evaluate every cell centre of `template`
    ///
    /// Inputs are assumed already aligned with the template grid.
    pub fn evaluate_grid(&self, template: &GridGeometry) -> Result<GridField> {
        let mut missing = 0usize;
        let grid = GridField::from_fn(*template, |p| {
            self.evaluate(p).unwrap_or_else(|| {
                missing += 1;
                COMPOSITE_NODATA
            })
        })?
        .with_nodata(COMPOSITE_NODATA);

        tracing::debug!(
            "Composite grid {}x{}: {} nodata cells",
            template.rows,
            template.cols,
            missing
        );
        Ok(grid)
    }
}

impl ScalarFieldSource for SuitabilityCompositor {
    fn sample(&self, point: Point<f64>) -> Option<f64> {
        self.evaluate(point)
    }
}
