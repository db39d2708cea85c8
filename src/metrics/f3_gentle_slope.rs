//! FACTOR 3: GENTLE SLOPE
//!
//! Flatter ground is easier and safer to excavate: 1 on flat terrain,
//! falling linearly to 0 at the slope limit.

use crate::utils::clamp_unit;

/// Calculate factor 3: `clamp(1 - slope / max_slope)`
pub fn calculate_slope_score(slope_deg: f64, max_slope_deg: f64) -> f64 {
    clamp_unit(1.0 - slope_deg / max_slope_deg)
}
