//! Pairwise Judgment Scale
//!
//! The 17 discrete ratio levels a pairwise comparison may take:
//! 1/9, 1/8, ..., 1/2, 1, 2, ..., 9.
//!
//! A judgment is stored as a signed level in -8..=8 so that reciprocals are
//! exact (`level -> -level`) and no floating point drift can creep into the
//! matrix through repeated edits.

use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tolerance used when matching a raw ratio to a scale level
const SCALE_TOLERANCE: f64 = 1e-9;

/// One level of the 1/9..9 pairwise scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Judgment {
    level: i8,
}

impl Judgment {
    /// Equal importance (ratio 1)
    pub const EQUAL: Judgment = Judgment { level: 0 };

    /// Extreme importance of the row criterion (ratio 9)
    pub const EXTREME: Judgment = Judgment { level: 8 };

    /// Build from an integer intensity 1..=9 (row criterion preferred)
    pub fn favoring(intensity: u8) -> Option<Self> {
        match intensity {
            1..=9 => Some(Self {
                level: intensity as i8 - 1,
            }),
            _ => None,
        }
    }

    /// Build from an integer intensity 1..=9 (column criterion preferred)
    pub fn against(intensity: u8) -> Option<Self> {
        Self::favoring(intensity).map(|j| j.reciprocal())
    }

    /// Look up the scale level matching a raw ratio
    pub fn from_value(value: f64) -> Option<Self> {
        Self::scale().find(|j| (j.value() - value).abs() <= SCALE_TOLERANCE)
    }

    /// Like `from_value`, but with a typed error
    pub fn try_from_value(value: f64) -> Result<Self> {
        Self::from_value(value).ok_or(PlannerError::NotOnScale(value))
    }

    /// All 17 levels, ascending from 1/9 to 9
    pub fn scale() -> impl Iterator<Item = Judgment> {
        (-8..=8).map(|level| Judgment { level })
    }

    /// Ratio value of this level
    pub fn value(self) -> f64 {
        if self.level >= 0 {
            f64::from(self.level + 1)
        } else {
            1.0 / f64::from(1 - self.level)
        }
    }

    /// The judgment seen from the other criterion's side
    pub fn reciprocal(self) -> Self {
        Self { level: -self.level }
    }

    /// Display label ("1/9" .. "9")
    pub fn label(self) -> String {
        if self.level >= 0 {
            format!("{}", self.level + 1)
        } else {
            format!("1/{}", 1 - self.level)
        }
    }
}

impl Default for Judgment {
    fn default() -> Self {
        Self::EQUAL
    }
}

impl fmt::Display for Judgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Judgment {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::scale()
            .find(|j| j.label() == trimmed)
            .ok_or_else(|| PlannerError::UnknownJudgment(trimmed.to_string()))
    }
}

impl TryFrom<String> for Judgment {
    type Error = PlannerError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Judgment> for String {
    fn from(j: Judgment) -> Self {
        j.label()
    }
}
