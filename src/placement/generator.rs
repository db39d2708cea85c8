//! Candidate Generator
//!
//! Scans a regular grid over the survey area's bounding box and keeps every
//! point where a trench footprint is feasible, scoring each on three factors.
//!
//! Scan order is row-major: rows of constant y from the bottom of the box
//! upward, x ascending within a row, points at cell centres (half a step in
//! from the box edge). Per point, checks run in a fixed order and the first
//! failure decides the rejection reason:
//!
//! 1. Centre outside the area
//! 2. Slope or aspect missing or out of range (sampling gap)
//! 3. Slope above the limit
//! 4. Footprint containment below the threshold
//! 5. Footprint touches an exclusion zone

use super::candidate::Candidate;
use crate::error::{ensure_positive, ensure_within, PlannerError, Result};
use crate::fields::ScalarFieldSource;
use crate::geometry::{
    oriented_rectangle, ExclusionGeometry, Orientation, PolygonRegion, ReferenceProximityIndex,
};
use crate::metrics::{
    calculate_proximity, calculate_slope_score, calculate_suitability, ComponentScores,
    FactorWeights,
};
use crate::observer::{EventSink, PlanEvent};
use geo::{Area, Point};
use serde::{Deserialize, Serialize};

/// Why a grid point produced no candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    OutsideRegion,
    SamplingGap,
    TooSteep,
    LowContainment,
    Excluded,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::OutsideRegion => "outside_region",
            RejectReason::SamplingGap => "sampling_gap",
            RejectReason::TooSteep => "too_steep",
            RejectReason::LowContainment => "low_containment",
            RejectReason::Excluded => "excluded",
        }
    }
}

/// Scan bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScanStats {
    /// Grid points covering the bounding box
    pub total_points: usize,
    /// Points visited (stops at `max_evaluated`)
    pub scanned: usize,
    pub kept: usize,
    pub outside_region: usize,
    pub sampling_gap: usize,
    pub too_steep: usize,
    pub low_containment: usize,
    pub excluded: usize,
    /// Stopped before visiting every grid point
    pub truncated: bool,
}

impl ScanStats {
    pub fn rejected(&self) -> usize {
        self.outside_region + self.sampling_gap + self.too_steep + self.low_containment + self.excluded
    }

    fn record(&mut self, reason: RejectReason) {
        let slot = match reason {
            RejectReason::OutsideRegion => &mut self.outside_region,
            RejectReason::SamplingGap => &mut self.sampling_gap,
            RejectReason::TooSteep => &mut self.too_steep,
            RejectReason::LowContainment => &mut self.low_containment,
            RejectReason::Excluded => &mut self.excluded,
        };
        *slot += 1;
    }
}

/// Candidates in scan order plus bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub candidates: Vec<Candidate>,
    pub stats: ScanStats,
}

/// Footprint, grid and scoring parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorParams {
    pub length: f64,
    pub width: f64,
    pub orientation: Orientation,
    pub step: f64,
    /// Minimum fraction of the footprint inside the area, in [0, 1]
    pub min_inside_ratio: f64,
    /// In (0, 90]
    pub max_slope_deg: f64,
    pub proximity_radius: f64,
    pub max_evaluated: usize,
    pub weights: FactorWeights,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            length: 20.0,
            width: 2.0,
            orientation: Orientation::Orthogonal,
            step: 10.0,
            min_inside_ratio: 0.95,
            max_slope_deg: 30.0,
            proximity_radius: 1000.0,
            max_evaluated: 8000,
            weights: FactorWeights::default(),
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("length", self.length)?;
        ensure_positive("width", self.width)?;
        ensure_positive("step", self.step)?;
        ensure_within("min_inside_ratio", self.min_inside_ratio, 0.0, 1.0)?;
        ensure_positive("max_slope_deg", self.max_slope_deg)?;
        ensure_within("max_slope_deg", self.max_slope_deg, 0.0, 90.0)?;
        ensure_positive("proximity_radius", self.proximity_radius)?;
        if self.max_evaluated == 0 {
            return Err(PlannerError::NonPositive {
                name: "max_evaluated",
                value: 0.0,
            });
        }
        self.weights.validate()
    }
}

/// Everything the scan samples
///
/// Optional layers fall back to neutral scores (suitability, proximity) or
/// are skipped (exclusions).
#[derive(Clone, Copy)]
pub struct GeneratorInputs<'a> {
    pub region: &'a dyn PolygonRegion,
    pub slope: &'a dyn ScalarFieldSource,
    pub aspect: &'a dyn ScalarFieldSource,
    pub suitability: Option<&'a dyn ScalarFieldSource>,
    /// Known (min, max) of the suitability surface
    pub suitability_range: Option<(f64, f64)>,
    pub references: Option<&'a dyn ReferenceProximityIndex>,
    pub exclusions: Option<&'a dyn ExclusionGeometry>,
}

impl<'a> GeneratorInputs<'a> {
    pub fn new(
        region: &'a dyn PolygonRegion,
        slope: &'a dyn ScalarFieldSource,
        aspect: &'a dyn ScalarFieldSource,
    ) -> Self {
        Self {
            region,
            slope,
            aspect,
            suitability: None,
            suitability_range: None,
            references: None,
            exclusions: None,
        }
    }

    pub fn with_suitability(mut self, field: &'a dyn ScalarFieldSource, range: Option<(f64, f64)>) -> Self {
        self.suitability = Some(field);
        self.suitability_range = range;
        self
    }

    pub fn with_references(mut self, references: &'a dyn ReferenceProximityIndex) -> Self {
        self.references = Some(references);
        self
    }

    pub fn with_exclusions(mut self, exclusions: &'a dyn ExclusionGeometry) -> Self {
        self.exclusions = Some(exclusions);
        self
    }
}

/// Points along one axis: centres at `(k + 0.5) * step` not past the far edge
fn axis_points(extent: f64, step: f64) -> usize {
    let half = step * 0.5;
    if extent.is_nan() || extent < half {
        return 0;
    }
    // small slack so an edge landing exactly on a centre is included
    // float-to-int casts saturate, so huge extents clamp to usize::MAX
    (((extent - half) / step + 1e-9).floor() as usize).saturating_add(1)
}

pub struct CandidateGenerator {
    params: GeneratorParams,
}

impl CandidateGenerator {
    /// Validates parameters up front
    pub fn new(params: GeneratorParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Scan the grid and return surviving candidates in scan order
    pub fn generate(&self, inputs: &GeneratorInputs<'_>, sink: &mut dyn EventSink) -> Result<ScanOutcome> {
        let region_area = inputs.region.area();
        if !region_area.is_finite() || region_area <= 0.0 {
            return Err(PlannerError::InvalidRegion("zero area"));
        }

        let p = &self.params;
        let bbox = inputs.region.bounding_box();
        let cols = axis_points(bbox.width(), p.step);
        let rows = if cols == 0 { 0 } else { axis_points(bbox.height(), p.step) };
        let total_points = rows.saturating_mul(cols);
        let per_point = sink.wants_per_point();

        let mut stats = ScanStats {
            total_points,
            ..ScanStats::default()
        };
        let mut candidates = Vec::new();
        sink.send(PlanEvent::ScanStarted { total_points });

        'scan: for row in 0..rows {
            let y = bbox.min().y + (row as f64 + 0.5) * p.step;
            for col in 0..cols {
                if stats.scanned >= p.max_evaluated {
                    break 'scan;
                }
                let scan_index = stats.scanned;
                stats.scanned += 1;

                let x = bbox.min().x + (col as f64 + 0.5) * p.step;
                match self.evaluate_point(Point::new(x, y), scan_index, inputs) {
                    Ok(candidate) => {
                        if per_point {
                            sink.send(PlanEvent::CandidateKept {
                                scan_index,
                                composite_score: candidate.composite_score,
                            });
                        }
                        stats.kept += 1;
                        candidates.push(candidate);
                    }
                    Err(reason) => {
                        if per_point {
                            sink.send(PlanEvent::CandidateRejected { scan_index, reason });
                        }
                        stats.record(reason);
                    }
                }
            }
        }

        stats.truncated = stats.scanned < total_points;
        if stats.truncated {
            sink.send(PlanEvent::ScanTruncated {
                scanned: stats.scanned,
                total_points,
            });
        }
        if candidates.is_empty() {
            tracing::warn!(
                "No feasible candidates ({} points scanned); relax step, containment or slope limit",
                stats.scanned
            );
        }
        tracing::debug!(
            "Scan: {} of {} points, {} kept, {} rejected",
            stats.scanned,
            total_points,
            stats.kept,
            stats.rejected()
        );
        sink.send(PlanEvent::ScanFinished { stats });

        Ok(ScanOutcome { candidates, stats })
    }

    fn evaluate_point(
        &self,
        center: Point<f64>,
        scan_index: usize,
        inputs: &GeneratorInputs<'_>,
    ) -> std::result::Result<Candidate, RejectReason> {
        let p = &self.params;

        if !inputs.region.contains(center) {
            return Err(RejectReason::OutsideRegion);
        }

        let (Some(slope), Some(aspect)) = (inputs.slope.sample(center), inputs.aspect.sample(center)) else {
            return Err(RejectReason::SamplingGap);
        };
        if !(0.0..=90.0).contains(&slope) || !(0.0..=360.0).contains(&aspect) {
            return Err(RejectReason::SamplingGap);
        }
        if slope > p.max_slope_deg {
            return Err(RejectReason::TooSteep);
        }

        let bearing = p.orientation.bearing_from_aspect(aspect);
        let footprint = oriented_rectangle(center, p.length, p.width, bearing);
        let footprint_area = footprint.unsigned_area().max(1e-9);
        let inside_ratio = inputs.region.intersection_area(&footprint).max(0.0) / footprint_area;
        if inside_ratio < p.min_inside_ratio {
            return Err(RejectReason::LowContainment);
        }

        if inputs.exclusions.is_some_and(|ex| ex.intersects(&footprint)) {
            return Err(RejectReason::Excluded);
        }

        let raw_suitability = inputs.suitability.and_then(|f| f.sample(center));
        let distance = inputs.references.and_then(|r| r.nearest_distance(center));
        let scores = ComponentScores {
            suitability: calculate_suitability(raw_suitability, inputs.suitability_range),
            proximity: calculate_proximity(distance, p.proximity_radius),
            slope: calculate_slope_score(slope, p.max_slope_deg),
        };
        let composite_score = scores.composite(&p.weights);

        Ok(Candidate {
            center,
            footprint,
            bearing_deg: bearing,
            orientation: p.orientation,
            inside_ratio: inside_ratio.min(1.0),
            slope_deg: slope,
            aspect_deg: aspect,
            scores,
            composite_score,
            scan_index,
        })
    }
}
