//! FACTOR 1: SITE SUITABILITY
//!
//! Samples the composite suitability surface (typically the AHP weighted
//! overlay) at a candidate centre and maps it to 0-1.
//!
//! **Rules**:
//!   - Sample + known, non-degenerate (min, max) → min-max normalize (benefit)
//!   - Sample but no usable range → raw value clamped to 0-1
//!   - No field, or no data at the point → neutral 0.5

use crate::utils::{clamp_unit, min_max_normalize, Direction};
use serde::Serialize;

/// Neutral score when no suitability information exists
pub const NEUTRAL_SUITABILITY: f64 = 0.5;

/// Spread below which a (min, max) pair is treated as unknown
const MIN_SPREAD: f64 = 1e-12;

/// Result of factor 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SuitabilityScore {
    /// Sampled surface value, if any
    pub raw: Option<f64>,
    /// Score in 0-1 (HIGH = GOOD)
    pub norm: f64,
}

/// Usable normalization range, or `None` if missing or degenerate
pub fn usable_range(range: Option<(f64, f64)>) -> Option<(f64, f64)> {
    range.filter(|(min, max)| {
        min.is_finite() && max.is_finite() && (max - min) > MIN_SPREAD
    })
}

/// Calculate factor 1 from a sampled value and optional observed range
pub fn calculate_suitability(raw: Option<f64>, range: Option<(f64, f64)>) -> SuitabilityScore {
    let norm = match (raw, usable_range(range)) {
        (Some(v), Some((min, max))) => min_max_normalize(v, min, max, Direction::Benefit),
        (Some(v), None) => clamp_unit(v),
        (None, _) => NEUTRAL_SUITABILITY,
    };
    SuitabilityScore { raw, norm }
}
