//! Planner events and sinks
//!
//! Progress and diagnostics flow through an `EventSink` passed into each
//! call. Nothing is global: a caller that does not care passes `NoopSink`.

use crate::placement::{RejectReason, ScanStats};
use serde::Serialize;

/// Something noteworthy happened during a planning call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlanEvent {
    /// Weights derived from a pairwise matrix
    WeightsSolved {
        criteria: usize,
        consistency_ratio: Option<f64>,
    },
    /// CR above the advisory threshold; weights are still used
    InconsistentJudgments { consistency_ratio: f64 },
    /// Eigen solve failed; uniform weights substituted
    WeightsDegraded { criteria: usize },
    ScanStarted { total_points: usize },
    CandidateRejected { scan_index: usize, reason: RejectReason },
    CandidateKept { scan_index: usize, composite_score: f64 },
    /// Scan hit `max_evaluated` before covering the grid
    ScanTruncated { scanned: usize, total_points: usize },
    ScanFinished { stats: ScanStats },
    CandidateSelected {
        rank: usize,
        scan_index: usize,
        composite_score: f64,
    },
    SelectionFinished { requested: usize, selected: usize },
}

impl PlanEvent {
    /// Per-point events that are only interesting when debugging
    pub fn is_per_point(&self) -> bool {
        matches!(
            self,
            PlanEvent::CandidateRejected { .. } | PlanEvent::CandidateKept { .. }
        )
    }
}

/// Receiver for planner events
pub trait EventSink {
    fn send(&mut self, event: PlanEvent);

    /// Cheap pre-check so emitters can skip building per-point events
    fn wants_per_point(&self) -> bool {
        true
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn send(&mut self, _event: PlanEvent) {}

    fn wants_per_point(&self) -> bool {
        false
    }
}

/// Collects events in memory (tests, post-run inspection)
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    pub events: Vec<PlanEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> Vec<PlanEvent> {
        self.events
    }
}

impl EventSink for VecSink {
    fn send(&mut self, event: PlanEvent) {
        self.events.push(event);
    }
}

/// Adapts a closure into a sink
pub struct FnSink<F: FnMut(PlanEvent)>(pub F);

impl<F: FnMut(PlanEvent)> EventSink for FnSink<F> {
    fn send(&mut self, event: PlanEvent) {
        (self.0)(event)
    }
}

/// Forwards events to `tracing`
///
/// Per-point events go out at TRACE, everything else at INFO or WARN.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn send(&mut self, event: PlanEvent) {
        match event {
            PlanEvent::WeightsSolved { criteria, consistency_ratio } => {
                tracing::info!(criteria, ?consistency_ratio, "weights solved");
            }
            PlanEvent::InconsistentJudgments { consistency_ratio } => {
                tracing::warn!(
                    "Consistency ratio {:.3} exceeds 0.10 - consider revising judgments",
                    consistency_ratio
                );
            }
            PlanEvent::WeightsDegraded { criteria } => {
                tracing::warn!(criteria, "weight solve degraded to uniform weights");
            }
            PlanEvent::ScanStarted { total_points } => {
                tracing::info!(total_points, "candidate scan started");
            }
            PlanEvent::CandidateRejected { scan_index, reason } => {
                tracing::trace!(scan_index, reason = reason.as_str(), "point rejected");
            }
            PlanEvent::CandidateKept { scan_index, composite_score } => {
                tracing::trace!(scan_index, composite_score, "candidate kept");
            }
            PlanEvent::ScanTruncated { scanned, total_points } => {
                tracing::warn!(
                    "Scan stopped after {} of {} grid points (max_evaluated reached)",
                    scanned,
                    total_points
                );
            }
            PlanEvent::ScanFinished { stats } => {
                tracing::info!(scanned = stats.scanned, kept = stats.kept, "candidate scan finished");
            }
            PlanEvent::CandidateSelected { rank, scan_index, composite_score } => {
                tracing::debug!(rank, scan_index, composite_score, "candidate selected");
            }
            PlanEvent::SelectionFinished { requested, selected } => {
                tracing::info!(requested, selected, "selection finished");
            }
        }
    }

    fn wants_per_point(&self) -> bool {
        tracing::enabled!(tracing::Level::TRACE)
    }
}
