//! Factor modules for candidate scoring
//!
//! Each factor maps one signal at a candidate centre to a 0-1 score; the
//! composite is their weighted mean.

pub mod f1_suitability;
pub mod f2_reference_proximity;
pub mod f3_gentle_slope;

// Re-export factor functions
pub use f1_suitability::{calculate_suitability, usable_range, SuitabilityScore, NEUTRAL_SUITABILITY};
pub use f2_reference_proximity::{calculate_proximity, ProximityScore, NEUTRAL_PROXIMITY};
pub use f3_gentle_slope::calculate_slope_score;

use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};

/// Relative weights of the three factors
///
/// Weights need not sum to 1; the composite divides by their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub suitability: f64,
    pub proximity: f64,
    pub slope: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            suitability: 0.55,
            proximity: 0.25,
            slope: 0.20,
        }
    }
}

impl FactorWeights {
    pub fn sum(&self) -> f64 {
        self.suitability + self.proximity + self.slope
    }

    /// Every weight finite and non-negative, with a positive total
    pub fn validate(&self) -> Result<()> {
        let all = [self.suitability, self.proximity, self.slope];
        let sum = self.sum();
        if all.iter().all(|w| w.is_finite() && *w >= 0.0) && sum > 0.0 {
            Ok(())
        } else {
            Err(PlannerError::NonPositiveWeightSum(sum))
        }
    }
}

/// Per-factor scores recorded on each candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentScores {
    pub suitability: SuitabilityScore,
    pub proximity: ProximityScore,
    pub slope: f64,
}

impl ComponentScores {
    /// Weighted mean of the three factors
    ///
    /// Callers validate `weights` first; the sum is assumed positive.
    pub fn composite(&self, weights: &FactorWeights) -> f64 {
        (weights.suitability * self.suitability.norm
            + weights.proximity * self.proximity.norm
            + weights.slope * self.slope)
            / weights.sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scores(suit: f64, prox: f64, slope: f64) -> ComponentScores {
        ComponentScores {
            suitability: SuitabilityScore { raw: None, norm: suit },
            proximity: ProximityScore { distance: None, norm: prox },
            slope,
        }
    }

    #[test]
    fn test_composite_is_weighted_mean() {
        let w = FactorWeights::default();
        let c = scores(1.0, 0.0, 0.5).composite(&w);
        assert_relative_eq!(c, (0.55 + 0.10) / 1.0, epsilon = 1e-12);

        let unnormalized = FactorWeights { suitability: 2.0, proximity: 1.0, slope: 1.0 };
        assert_relative_eq!(scores(1.0, 0.0, 0.0).composite(&unnormalized), 0.5);
    }

    #[test]
    fn test_equal_inputs_give_same_composite() {
        let w = FactorWeights { suitability: 0.3, proximity: 4.0, slope: 0.01 };
        assert_relative_eq!(scores(0.5, 0.5, 0.5).composite(&w), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_weight_validation() {
        assert!(FactorWeights::default().validate().is_ok());
        let zero = FactorWeights { suitability: 0.0, proximity: 0.0, slope: 0.0 };
        assert!(matches!(zero.validate(), Err(PlannerError::NonPositiveWeightSum(_))));
        let negative = FactorWeights { suitability: 1.0, proximity: -0.5, slope: 0.0 };
        assert!(negative.validate().is_err());
        let nan = FactorWeights { suitability: f64::NAN, proximity: 1.0, slope: 0.0 };
        assert!(nan.validate().is_err());
    }
}
