//! Survey Planner
//!
//! Multi-criteria decision and placement core for archaeological trench
//! surveys: derive criterion weights from pairwise judgments, combine
//! criteria into a suitability surface, then propose a ranked set of
//! non-conflicting trench footprints inside a survey area.
//!
//! Layout:
//! - `ahp/`: pairwise judgment matrix, eigenvector weights, consistency ratio
//! - `utils/`: min-max normalization
//! - `suitability/`: weighted linear combination of criteria
//! - `fields/`: sampled scalar fields (grids, constants)
//! - `geometry/`: survey area, footprints, reference and exclusion layers
//! - `metrics/`: the three candidate factors (suitability, proximity, slope)
//! - `placement/`: grid-scan generator and greedy selector
//! - `planner`, `config`, `data`: end-to-end coordination and inputs

pub mod error;
pub mod ahp;
pub mod utils;
pub mod fields;
pub mod geometry;
pub mod suitability;
pub mod metrics;
pub mod placement;
pub mod observer;
pub mod config;
pub mod planner;
pub mod data;

// Re-export commonly used types
pub use error::{PlannerError, Result};
pub use ahp::{solve_weights, ConsistencyReport, Judgment, PairwiseComparisonMatrix, WeightSolution};
pub use utils::{min_max_normalize, Direction};
pub use fields::{ConstantField, FieldSource, GridField, GridGeometry, ScalarFieldSource};
pub use geometry::{
    ExclusionGeometry, ExclusionZones, Orientation, PolygonRegion, ReferenceFeature,
    ReferenceProximityIndex, ReferenceSites, SurveyArea,
};
pub use suitability::{Criterion, OutputScale, SuitabilityCompositor};
pub use metrics::FactorWeights;
pub use placement::{
    Candidate, CandidateGenerator, CandidateSelector, GeneratorInputs, GeneratorParams,
    RankedCandidate, ScanOutcome, ScanStats, SelectionParams, SelectionResult,
};
pub use observer::{EventSink, NoopSink, PlanEvent, TracingSink, VecSink};
pub use config::PlannerConfig;
pub use planner::{PlanReport, PlanStatus, RunSummary, SurveyPlanner};
pub use data::ScenarioData;
