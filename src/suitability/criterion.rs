//! Suitability criteria
//!
//! One criterion is a raster layer plus how to read it: its direction and
//! the range its values are normalized against. A missing range is filled
//! from the layer's own statistics when the compositor is built.

use crate::error::{ensure_within, PlannerError, Result};
use crate::fields::{FieldSource, ScalarFieldSource};
use crate::utils::{min_max_normalize, Direction};
use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub field: FieldSource,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub observed_min: Option<f64>,
    #[serde(default)]
    pub observed_max: Option<f64>,
    /// Explicit weight; normally supplied from an AHP solve instead
    #[serde(default)]
    pub weight: Option<f64>,
}

impl Criterion {
    pub fn new(name: impl Into<String>, field: impl Into<FieldSource>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            direction: Direction::Benefit,
            observed_min: None,
            observed_max: None,
            weight: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Lower raw values are better
    pub fn cost(self) -> Self {
        self.with_direction(Direction::Cost)
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.observed_min = Some(min);
        self.observed_max = Some(max);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Fix the normalization range and weight for one computation
    ///
    /// A side of the range that was not given comes from the grid statistics,
    /// restricted to cells whose centre lies in `within` when supplied.
    pub(crate) fn resolve(&self, within: Option<&Rect<f64>>, fallback_weight: f64) -> Result<ResolvedCriterion> {
        let stats = match (self.observed_min, self.observed_max) {
            (Some(_), Some(_)) => None,
            _ => self.field.as_grid().and_then(|g| g.stats(within)),
        };

        let min = self.observed_min.or(stats.map(|s| s.min));
        let max = self.observed_max.or(stats.map(|s| s.max));
        let (Some(min), Some(max)) = (min, max) else {
            return Err(PlannerError::MissingRange(self.name.clone()));
        };
        if !min.is_finite() || !max.is_finite() {
            return Err(PlannerError::MissingRange(self.name.clone()));
        }
        if max == min {
            tracing::warn!("Criterion '{}' has no spread ({}); it contributes 0", self.name, min);
        }

        let weight = match self.weight {
            Some(w) => ensure_within("criterion weight", w, 0.0, f64::MAX)?,
            None => fallback_weight,
        };

        Ok(ResolvedCriterion {
            name: self.name.clone(),
            field: self.field.clone(),
            direction: self.direction,
            min,
            max,
            weight,
        })
    }
}

/// Criterion with range and weight fixed
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedCriterion {
    pub name: String,
    pub field: FieldSource,
    pub direction: Direction,
    pub min: f64,
    pub max: f64,
    pub weight: f64,
}

impl ResolvedCriterion {
    /// Weighted, normalized contribution at `point`; `None` on nodata
    pub fn contribution(&self, point: Point<f64>) -> Option<f64> {
        let raw = self.field.sample(point)?;
        Some(self.weight * min_max_normalize(raw, self.min, self.max, self.direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{GridField, GridGeometry};
    use approx::assert_relative_eq;
    use geo::coord;

    fn ramp() -> GridField {
        // 1 row, 4 cols over x in [0, 40); values 10, 20, 30, 40
        let geometry = GridGeometry {
            origin_x: 0.0,
            origin_y: 10.0,
            cell_width: 10.0,
            cell_height: 10.0,
            cols: 4,
            rows: 1,
        };
        GridField::new(geometry, vec![10.0, 20.0, 30.0, 40.0]).unwrap()
    }

    #[test]
    fn test_range_from_grid_stats() {
        let c = Criterion::new("elevation", ramp()).resolve(None, 0.5).unwrap();
        assert_relative_eq!(c.min, 10.0);
        assert_relative_eq!(c.max, 40.0);
        assert_relative_eq!(c.weight, 0.5);
        assert_relative_eq!(c.contribution(Point::new(25.0, 5.0)).unwrap(), 0.5 * (30.0 - 10.0) / 30.0);
    }

    #[test]
    fn test_range_within_extent() {
        let extent = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 20.0, y: 10.0 });
        let c = Criterion::new("elevation", ramp()).resolve(Some(&extent), 1.0).unwrap();
        assert_relative_eq!(c.min, 10.0);
        assert_relative_eq!(c.max, 20.0);
    }

    #[test]
    fn test_partial_range_fills_missing_side() {
        let mut criterion = Criterion::new("elevation", ramp());
        criterion.observed_max = Some(100.0);
        let c = criterion.resolve(None, 1.0).unwrap();
        assert_relative_eq!(c.min, 10.0);
        assert_relative_eq!(c.max, 100.0);
    }

    #[test]
    fn test_missing_range_is_an_error() {
        let constant = Criterion::new("distance", FieldSource::Constant { value: 3.0 });
        assert_eq!(
            constant.resolve(None, 1.0),
            Err(PlannerError::MissingRange("distance".to_string()))
        );
        let ok = Criterion::new("distance", FieldSource::Constant { value: 3.0 })
            .with_range(0.0, 6.0)
            .cost()
            .resolve(None, 1.0)
            .unwrap();
        assert_relative_eq!(ok.contribution(Point::new(0.0, 0.0)).unwrap(), 0.5);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let c = Criterion::new("x", ramp()).with_weight(-0.1);
        assert!(matches!(c.resolve(None, 1.0), Err(PlannerError::OutOfRange { .. })));
    }

    #[test]
    fn test_criterion_json() {
        let json = r#"{
            "name": "slope",
            "field": {"kind": "constant", "value": 4.0},
            "direction": "cost",
            "observed_min": 0.0,
            "observed_max": 8.0
        }"#;
        let c: Criterion = serde_json::from_str(json).unwrap();
        assert_eq!(c.direction, Direction::Cost);
        assert!(c.weight.is_none());
    }
}
