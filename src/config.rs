//! Planner configuration
//!
//! One flat, serde-friendly struct with field-survey defaults (20 m x 2 m
//! trenches on a 10 m grid). Validation happens when it is turned into the
//! per-stage parameter types.

use crate::error::{ensure_within, Result as PlannerResult};
use crate::geometry::Orientation;
use crate::metrics::FactorWeights;
use crate::placement::{GeneratorParams, SelectionParams};
use crate::suitability::OutputScale;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Trench length along the bearing (m)
    pub trench_length: f64,
    pub trench_width: f64,
    pub orientation: Orientation,
    pub grid_step: f64,
    /// Number of trenches to propose
    pub count: usize,
    pub min_spacing: f64,
    /// Minimum fraction of each footprint inside the survey area
    pub min_inside_ratio: f64,
    pub proximity_radius: f64,
    /// Distance kept from exclusion zones (m)
    pub exclusion_buffer: f64,
    pub max_slope_deg: f64,
    /// Upper bound on visited grid points
    pub max_evaluated: usize,
    pub weights: FactorWeights,
    pub output_scale: OutputScale,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            trench_length: 20.0,
            trench_width: 2.0,
            orientation: Orientation::Orthogonal,
            grid_step: 10.0,
            count: 12,
            min_spacing: 6.0,
            min_inside_ratio: 0.95,
            proximity_radius: 1000.0,
            exclusion_buffer: 3.0,
            max_slope_deg: 30.0,
            max_evaluated: 8000,
            weights: FactorWeights::default(),
            output_scale: OutputScale::Unit,
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a JSON file; missing keys take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read planner config: {:?}", path))?;

        Self::from_json_str(&contents)
            .with_context(|| format!("Invalid planner config: {:?}", path))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PlannerConfig =
            serde_json::from_str(json).with_context(|| "Failed to parse planner config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Check every stage's parameters
    pub fn validate(&self) -> PlannerResult<()> {
        self.generator_params().validate()?;
        self.selection_params().validate()?;
        ensure_within("exclusion_buffer", self.exclusion_buffer, 0.0, f64::MAX)?;
        Ok(())
    }

    pub fn generator_params(&self) -> GeneratorParams {
        GeneratorParams {
            length: self.trench_length,
            width: self.trench_width,
            orientation: self.orientation,
            step: self.grid_step,
            min_inside_ratio: self.min_inside_ratio,
            max_slope_deg: self.max_slope_deg,
            proximity_radius: self.proximity_radius,
            max_evaluated: self.max_evaluated,
            weights: self.weights,
        }
    }

    pub fn selection_params(&self) -> SelectionParams {
        SelectionParams {
            count: self.count,
            min_spacing: self.min_spacing,
        }
    }
}
