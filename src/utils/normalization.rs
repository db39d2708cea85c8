//! Normalization Utilities
//!
//! Min-max rescaling of raw criterion values to the 0-1 range, with a
//! benefit/cost direction.
//!
//! Algorithm:
//! 1. Benefit: (v - min) / (max - min)
//! 2. Cost:    (max - v) / (max - min)
//! 3. Degenerate range (max == min, or non-finite spread): constant 0, so a
//!    criterion with no observed spread contributes nothing
//! 4. Values outside [min, max] saturate at 0 or 1

use serde::{Deserialize, Serialize};

/// Whether higher raw values are better or worse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Higher raw value = more suitable
    #[default]
    Benefit,
    /// Lower raw value = more suitable
    Cost,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Benefit => Direction::Cost,
            Direction::Cost => Direction::Benefit,
        }
    }
}

/// Clamp to [0, 1]; NaN maps to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Min-max normalize `value` against an observed range
pub fn min_max_normalize(value: f64, min: f64, max: f64, direction: Direction) -> f64 {
    let spread = max - min;
    if !spread.is_finite() || spread == 0.0 {
        return 0.0;
    }

    let fraction = match direction {
        Direction::Benefit => (value - min) / spread,
        Direction::Cost => (max - value) / spread,
    };

    clamp_unit(fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_benefit_and_cost() {
        assert_relative_eq!(min_max_normalize(25.0, 0.0, 100.0, Direction::Benefit), 0.25);
        assert_relative_eq!(min_max_normalize(25.0, 0.0, 100.0, Direction::Cost), 0.75);
        assert_relative_eq!(min_max_normalize(-10.0, -10.0, 10.0, Direction::Benefit), 0.0);
        assert_relative_eq!(min_max_normalize(10.0, -10.0, 10.0, Direction::Benefit), 1.0);
    }

    #[test]
    fn test_degenerate_range_is_zero() {
        for v in [-5.0, 0.0, 3.0, 1e9] {
            assert_eq!(min_max_normalize(v, 3.0, 3.0, Direction::Benefit), 0.0);
            assert_eq!(min_max_normalize(v, 3.0, 3.0, Direction::Cost), 0.0);
        }
        assert_eq!(min_max_normalize(1.0, 0.0, f64::INFINITY, Direction::Benefit), 0.0);
        assert_eq!(min_max_normalize(1.0, f64::NAN, 2.0, Direction::Cost), 0.0);
    }

    #[test]
    fn test_direction_symmetry() {
        let (min, max) = (12.5, 87.0);
        for i in 0..=20 {
            let v = min + (max - min) * i as f64 / 20.0;
            let reflected = max + min - v;
            assert_relative_eq!(
                min_max_normalize(v, min, max, Direction::Benefit),
                min_max_normalize(reflected, min, max, Direction::Cost),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                min_max_normalize(v, min, max, Direction::Cost),
                min_max_normalize(reflected, min, max, Direction::Cost.flipped()),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_out_of_range_saturates() {
        assert_eq!(min_max_normalize(150.0, 0.0, 100.0, Direction::Benefit), 1.0);
        assert_eq!(min_max_normalize(150.0, 0.0, 100.0, Direction::Cost), 0.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }
}
