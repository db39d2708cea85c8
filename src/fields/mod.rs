//! Scalar Fields
//!
//! Anything the core samples at a map position: terrain derivatives, a
//! precomputed suitability surface, or a constant. The core never owns raster
//! storage beyond the in-memory `GridField`; everything goes through
//! `ScalarFieldSource::sample`.

pub mod grid;

pub use grid::{FieldStats, GridField, GridGeometry};

use geo::Point;
use serde::{Deserialize, Serialize};

/// A gridded or analytic surface that can be sampled at a point
///
/// `None` means "no data at this point" (outside the grid, nodata cell, or a
/// non-finite value).
pub trait ScalarFieldSource {
    fn sample(&self, point: Point<f64>) -> Option<f64>;
}

impl<F> ScalarFieldSource for F
where
    F: Fn(Point<f64>) -> Option<f64>,
{
    fn sample(&self, point: Point<f64>) -> Option<f64> {
        self(point)
    }
}

/// Same value everywhere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantField(pub f64);

impl ScalarFieldSource for ConstantField {
    fn sample(&self, _point: Point<f64>) -> Option<f64> {
        self.0.is_finite().then_some(self.0)
    }
}

/// Field handle resolved once at the call boundary
///
/// Replaces "raster or nothing" layer handles with an explicit variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSource {
    Grid(GridField),
    Constant { value: f64 },
    #[default]
    Absent,
}

impl FieldSource {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldSource::Absent)
    }

    /// Sampling view, or `None` for an absent field
    pub fn as_source(&self) -> Option<&dyn ScalarFieldSource> {
        match self {
            FieldSource::Absent => None,
            other => Some(other as &dyn ScalarFieldSource),
        }
    }

    /// Underlying grid, if this is a gridded field
    pub fn as_grid(&self) -> Option<&GridField> {
        match self {
            FieldSource::Grid(grid) => Some(grid),
            _ => None,
        }
    }
}

impl From<GridField> for FieldSource {
    fn from(grid: GridField) -> Self {
        FieldSource::Grid(grid)
    }
}

impl ScalarFieldSource for FieldSource {
    fn sample(&self, point: Point<f64>) -> Option<f64> {
        match self {
            FieldSource::Grid(grid) => grid.sample(point),
            FieldSource::Constant { value } => ConstantField(*value).sample(point),
            FieldSource::Absent => None,
        }
    }
}
