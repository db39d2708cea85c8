//! Survey Planner - coordinator for a full planning run
//!
//! Judgments → weights → suitability surface → grid scan → selection, with
//! a run summary describing what was asked for and what came out.

use crate::ahp::{solve_weights, PairwiseComparisonMatrix, WeightSolution};
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::fields::{GridField, ScalarFieldSource};
use crate::geometry::{ExclusionZones, Orientation};
use crate::metrics::FactorWeights;
use crate::observer::{EventSink, PlanEvent};
use crate::placement::{
    CandidateGenerator, CandidateSelector, GeneratorInputs, ScanStats, SelectionResult,
};
use crate::suitability::{Criterion, OutputScale, SuitabilityCompositor};
use geo::{Point, Polygon, Rect};
use serde::Serialize;

/// How a planning run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Whole grid scanned, at least one pick
    Complete,
    /// Scan stopped at `max_evaluated`; picks come from the part scanned
    Partial,
    /// No grid point produced a feasible candidate
    NoCandidates,
    /// Candidates existed but none could be accepted
    NoConflictFreeCandidates,
}

/// Parameters and counts recorded alongside the picks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub requested: usize,
    pub selected: usize,
    pub grid_step: f64,
    pub min_spacing: f64,
    pub min_inside_ratio: f64,
    pub orientation: Orientation,
    pub exclusion_buffer: f64,
    pub proximity_radius: f64,
    pub max_slope_deg: f64,
    pub weights: FactorWeights,
    pub scanned: usize,
    pub kept: usize,
    /// CR of the judgments behind the suitability surface, when derived here
    pub consistency_ratio: Option<f64>,
}

/// Everything a planning run produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub status: PlanStatus,
    pub selection: SelectionResult,
    pub stats: ScanStats,
    pub summary: RunSummary,
}

/// Composite suitability ready for sampling
///
/// When any criterion is gridded, the composite is rasterized onto that grid
/// and its range measured inside the survey extent. Otherwise the compositor
/// is sampled directly and the range is unknown.
#[derive(Debug, Clone)]
pub struct SuitabilitySurface {
    pub compositor: SuitabilityCompositor,
    pub grid: Option<GridField>,
    pub range: Option<(f64, f64)>,
    pub solution: Option<WeightSolution>,
}

impl SuitabilitySurface {
    pub fn as_source(&self) -> &dyn ScalarFieldSource {
        match &self.grid {
            Some(grid) => grid as &dyn ScalarFieldSource,
            None => &self.compositor,
        }
    }

    pub fn consistency_ratio(&self) -> Option<f64> {
        self.solution.as_ref().and_then(WeightSolution::consistency_ratio)
    }
}

/// Main planner
pub struct SurveyPlanner {
    config: PlannerConfig,
    generator: CandidateGenerator,
    selector: CandidateSelector,
}

impl SurveyPlanner {
    /// Validate the configuration and set up both stages
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        let generator = CandidateGenerator::new(config.generator_params())?;
        let selector = CandidateSelector::new(config.selection_params())?;
        Ok(Self {
            config,
            generator,
            selector,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Solve AHP weights, reporting consistency through the sink
    pub fn derive_weights(&self, matrix: &PairwiseComparisonMatrix, sink: &mut dyn EventSink) -> WeightSolution {
        announce_weights(matrix.size(), solve_weights(matrix), sink)
    }

    /// Build the suitability surface from criteria and optional judgments
    ///
    /// Without judgments, each criterion uses its own weight or `1/n`.
    pub fn suitability_surface(
        &self,
        criteria: Vec<Criterion>,
        judgments: Option<&PairwiseComparisonMatrix>,
        extent: Rect<f64>,
        sink: &mut dyn EventSink,
    ) -> Result<SuitabilitySurface> {
        let template = criteria
            .iter()
            .find_map(|c| c.field.as_grid())
            .map(|g| *g.geometry());

        let solution = judgments.map(|m| self.derive_weights(m, sink));
        let compositor = match &solution {
            Some(solution) => SuitabilityCompositor::with_solution(criteria, solution, Some(extent))?,
            None => SuitabilityCompositor::within_extent(criteria, extent)?,
        }
        .with_scale(self.config.output_scale);

        let grid = template
            .map(|geometry| compositor.evaluate_grid(&geometry))
            .transpose()?;
        let range = match &grid {
            Some(g) => g.stats(Some(&extent)).map(|s| (s.min, s.max)),
            // sampled directly: bound by the scale and the weight total
            None => match compositor.scale() {
                OutputScale::Unit => None,
                scale => Some((0.0, scale.factor() * compositor.weights().iter().sum::<f64>())),
            },
        };

        tracing::info!(
            "Suitability surface: {} criteria, range {:?}",
            compositor.len(),
            range
        );

        Ok(SuitabilitySurface {
            compositor,
            grid,
            range,
            solution,
        })
    }

    /// Exclusion zones with the configured buffer
    pub fn exclusion_zones(&self, polygons: Vec<Polygon<f64>>) -> Result<ExclusionZones> {
        ExclusionZones::new(polygons, self.config.exclusion_buffer)
    }

    /// Scan, select and summarize
    pub fn plan(&self, inputs: &GeneratorInputs<'_>, sink: &mut dyn EventSink) -> Result<PlanReport> {
        let outcome = self.generator.generate(inputs, sink)?;
        let selection = self.selector.select(&outcome.candidates, sink);
        let stats = outcome.stats;

        let status = if outcome.candidates.is_empty() {
            PlanStatus::NoCandidates
        } else if selection.no_conflict_free() {
            PlanStatus::NoConflictFreeCandidates
        } else if stats.truncated {
            PlanStatus::Partial
        } else {
            PlanStatus::Complete
        };

        let c = &self.config;
        let summary = RunSummary {
            requested: c.count,
            selected: selection.len(),
            grid_step: c.grid_step,
            min_spacing: c.min_spacing,
            min_inside_ratio: c.min_inside_ratio,
            orientation: c.orientation,
            exclusion_buffer: c.exclusion_buffer,
            proximity_radius: c.proximity_radius,
            max_slope_deg: c.max_slope_deg,
            weights: c.weights,
            scanned: stats.scanned,
            kept: stats.kept,
            consistency_ratio: None,
        };

        tracing::info!(
            "Plan {:?}: {} of {} trenches from {} candidates ({} points scanned)",
            status,
            summary.selected,
            summary.requested,
            stats.kept,
            stats.scanned
        );

        Ok(PlanReport {
            status,
            selection,
            stats,
            summary,
        })
    }

    /// `plan` with the suitability surface wired in and its CR recorded
    pub fn plan_with_surface(
        &self,
        inputs: GeneratorInputs<'_>,
        surface: &SuitabilitySurface,
        sink: &mut dyn EventSink,
    ) -> Result<PlanReport> {
        let inputs = inputs.with_suitability(surface.as_source(), surface.range);
        let mut report = self.plan(&inputs, sink)?;
        report.summary.consistency_ratio = surface.consistency_ratio();
        Ok(report)
    }
}

/// Centre of each pick, in rank order
pub fn pick_centers(report: &PlanReport) -> Vec<Point<f64>> {
    report.selection.picks.iter().map(|p| p.candidate.center).collect()
}

/// Send the weight events for a solve and hand the solution back
fn announce_weights(criteria: usize, solution: WeightSolution, sink: &mut dyn EventSink) -> WeightSolution {
    sink.send(PlanEvent::WeightsSolved {
        criteria,
        consistency_ratio: solution.consistency_ratio(),
    });
    if solution.is_degraded() {
        sink.send(PlanEvent::WeightsDegraded { criteria });
    } else if let Some(cr) = solution.consistency_ratio().filter(|_| solution.exceeds_threshold()) {
        sink.send(PlanEvent::InconsistentJudgments {
            consistency_ratio: cr,
        });
    }
    solution
}
