//! Trench candidates produced by the grid scan

use crate::geometry::Orientation;
use crate::metrics::ComponentScores;
use geo::{Point, Polygon};
use serde::Serialize;

/// One feasible trench placement
///
/// Created by the generator and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub center: Point<f64>,
    pub footprint: Polygon<f64>,
    /// Long-axis bearing, degrees clockwise from north, in [0, 180)
    pub bearing_deg: f64,
    pub orientation: Orientation,
    /// Fraction of the footprint inside the survey area
    pub inside_ratio: f64,
    pub slope_deg: f64,
    pub aspect_deg: f64,
    pub scores: ComponentScores,
    pub composite_score: f64,
    /// Position in the row-major scan; ties are broken by this
    pub scan_index: usize,
}

impl Candidate {
    /// Largest distance from the centre to a footprint vertex
    pub fn footprint_radius(&self) -> f64 {
        let (cx, cy) = (self.center.x(), self.center.y());
        self.footprint
            .exterior()
            .coords()
            .map(|c| (c.x - cx).hypot(c.y - cy))
            .fold(0.0, f64::max)
    }

    /// Planar distance between two centres
    pub fn distance_to(&self, other: &Candidate) -> f64 {
        (self.center.x() - other.center.x()).hypot(self.center.y() - other.center.y())
    }
}

/// Candidate with its 1-based acceptance rank
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub rank: usize,
    #[serde(flatten)]
    pub candidate: Candidate,
}
