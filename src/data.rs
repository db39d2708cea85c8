//! Scenario Loading
//!
//! A scenario is one JSON document holding everything a planning run needs:
//! configuration, survey area, terrain derivatives already resampled onto a
//! common grid, and the optional suitability, reference and exclusion
//! layers.

use crate::ahp::{Judgment, PairwiseComparisonMatrix};
use crate::config::PlannerConfig;
use crate::fields::FieldSource;
use crate::geometry::{PolygonRegion, ReferenceFeature, ReferenceSites, SurveyArea};
use crate::observer::EventSink;
use crate::placement::GeneratorInputs;
use crate::planner::{PlanReport, SurveyPlanner};
use crate::suitability::Criterion;
use anyhow::{Context, Result};
use geo::Polygon;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Full input set for one planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioData {
    #[serde(default)]
    pub config: PlannerConfig,

    /// AOI polygons, merged into one survey area
    pub region: Vec<Polygon<f64>>,

    /// Slope in degrees
    pub slope: FieldSource,

    /// Aspect in degrees clockwise from north
    pub aspect: FieldSource,

    /// Precomputed suitability surface (used when no criteria are given)
    #[serde(default)]
    pub suitability: FieldSource,

    /// Known (min, max) of `suitability`
    #[serde(default)]
    pub suitability_range: Option<(f64, f64)>,

    /// Criteria combined into a suitability surface
    #[serde(default)]
    pub criteria: Vec<Criterion>,

    /// Upper-triangle pairwise judgments over `criteria`, row by row
    #[serde(default)]
    pub judgments: Option<Vec<Judgment>>,

    #[serde(default)]
    pub references: Vec<ReferenceFeature>,

    #[serde(default)]
    pub exclusions: Vec<Polygon<f64>>,
}

impl ScenarioData {
    /// Load a scenario from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {:?}", path))?;

        let scenario: ScenarioData = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse scenario JSON: {:?}", path))?;

        tracing::info!(
            "Loaded scenario: {} AOI polygons, {} criteria, {} references, {} exclusions",
            scenario.region.len(),
            scenario.criteria.len(),
            scenario.references.len(),
            scenario.exclusions.len()
        );
        Ok(scenario)
    }

    /// Pairwise matrix over the criteria, if judgments were supplied
    pub fn judgment_matrix(&self) -> Result<Option<PairwiseComparisonMatrix>> {
        let Some(upper) = &self.judgments else {
            return Ok(None);
        };
        let matrix = PairwiseComparisonMatrix::from_upper_triangle(self.criteria.len(), upper)
            .with_context(|| "Judgments do not match the criteria")?;
        Ok(Some(matrix))
    }

    /// Run the whole pipeline on this scenario
    pub fn run(&self, sink: &mut dyn EventSink) -> Result<PlanReport> {
        let planner = SurveyPlanner::new(self.config.clone()).context("Invalid planner config")?;

        let area = SurveyArea::from_polygons(self.region.iter().cloned())
            .context("Invalid survey area")?;
        let references: ReferenceSites = self.references.iter().cloned().collect();
        let exclusions = planner
            .exclusion_zones(self.exclusions.clone())
            .context("Invalid exclusion zones")?;

        let mut inputs = GeneratorInputs::new(&area, &self.slope, &self.aspect);
        if !references.is_empty() {
            inputs = inputs.with_references(&references);
        }
        if !exclusions.is_empty() {
            inputs = inputs.with_exclusions(&exclusions);
        }

        if self.criteria.is_empty() {
            if let Some(field) = self.suitability.as_source() {
                inputs = inputs.with_suitability(field, self.suitability_range);
            }
            return Ok(planner.plan(&inputs, sink)?);
        }

        if !self.suitability.is_absent() {
            tracing::warn!("Both criteria and a suitability field given; using the criteria");
        }
        let matrix = self.judgment_matrix()?;
        let surface = planner
            .suitability_surface(self.criteria.clone(), matrix.as_ref(), area.bounding_box(), sink)
            .context("Failed to build suitability surface")?;
        Ok(planner.plan_with_surface(inputs, &surface, sink)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopSink;
    use crate::planner::PlanStatus;
    use approx::assert_relative_eq;

    const SQUARE: &str = r#"[{
        "exterior": [
            {"x": 0.0, "y": 0.0}, {"x": 100.0, "y": 0.0},
            {"x": 100.0, "y": 100.0}, {"x": 0.0, "y": 100.0},
            {"x": 0.0, "y": 0.0}
        ],
        "interiors": []
    }]"#;

    fn scenario(extra: &str) -> ScenarioData {
        let json = format!(
            r#"{{
                "config": {{"count": 4}},
                "region": {},
                "slope": {{"kind": "constant", "value": 3.0}},
                "aspect": {{"kind": "constant", "value": 90.0}}
                {}
            }}"#,
            SQUARE, extra
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_minimal_scenario_runs() {
        let report = scenario("").run(&mut NoopSink).unwrap();
        assert_eq!(report.status, PlanStatus::Complete);
        assert_eq!(report.selection.len(), 4);
        assert!(report.summary.consistency_ratio.is_none());
    }

    #[test]
    fn test_criteria_with_judgments() {
        let s = scenario(
            r#",
            "criteria": [
                {"name": "a", "field": {"kind": "constant", "value": 1.0}, "observed_min": 0.0, "observed_max": 2.0},
                {"name": "b", "field": {"kind": "constant", "value": 1.0}, "observed_min": 0.0, "observed_max": 2.0}
            ],
            "judgments": ["3"]"#,
        );
        assert_eq!(s.judgment_matrix().unwrap().unwrap().size(), 2);
        let report = s.run(&mut NoopSink).unwrap();
        assert_eq!(report.summary.consistency_ratio, Some(0.0));
        // constant 0.5 composite with unknown range is used as-is
        let pick = &report.selection.picks[0].candidate;
        assert_relative_eq!(pick.scores.suitability.raw.unwrap(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_judgment_count_mismatch() {
        let s = scenario(
            r#",
            "criteria": [
                {"name": "a", "field": {"kind": "constant", "value": 1.0}, "observed_min": 0.0, "observed_max": 2.0}
            ],
            "judgments": ["3"]"#,
        );
        assert!(s.run(&mut NoopSink).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(ScenarioData::load(Path::new("/nonexistent/scenario.json")).is_err());
    }
}
