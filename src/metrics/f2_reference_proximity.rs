//! FACTOR 2: REFERENCE PROXIMITY
//!
//! Candidates close to known reference features score higher, falling off
//! linearly to 0 at `radius`.

use crate::utils::clamp_unit;
use serde::Serialize;

/// Neutral score when no reference layer is available
pub const NEUTRAL_PROXIMITY: f64 = 0.5;

/// Result of factor 2
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProximityScore {
    /// Distance to the nearest reference feature, if known
    pub distance: Option<f64>,
    /// Score in 0-1 (HIGH = GOOD)
    pub norm: f64,
}

/// Calculate factor 2: `clamp(1 - distance / radius)`, or 0.5 without a distance
pub fn calculate_proximity(distance: Option<f64>, radius: f64) -> ProximityScore {
    let norm = match distance {
        Some(d) => clamp_unit(1.0 - d / radius),
        None => NEUTRAL_PROXIMITY,
    };
    ProximityScore { distance, norm }
}
