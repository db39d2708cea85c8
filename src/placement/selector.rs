//! Candidate Selector
//!
//! Greedy spatial non-maximum suppression: walk candidates best-first and
//! accept one only if it keeps `min_spacing` from, and does not overlap,
//! everything already accepted.
//!
//! Accepted picks are bucketed on a uniform grid whose cell is at least as
//! large as any possible conflict distance, so each check only looks at the
//! 3x3 cells around the candidate.

use super::candidate::{Candidate, RankedCandidate};
use crate::error::{ensure_within, PlannerError, Result};
use crate::observer::{EventSink, PlanEvent};
use geo::Intersects;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionParams {
    /// Maximum number of picks
    pub count: usize,
    /// Minimum centre-to-centre distance between picks
    pub min_spacing: f64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            count: 12,
            min_spacing: 6.0,
        }
    }
}

impl SelectionParams {
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(PlannerError::ZeroCount);
        }
        ensure_within("min_spacing", self.min_spacing, 0.0, f64::MAX)?;
        Ok(())
    }
}

/// Ranked picks plus why the rest were skipped
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SelectionResult {
    pub picks: Vec<RankedCandidate>,
    /// Candidates offered to the selector
    pub considered: usize,
    pub skipped_spacing: usize,
    pub skipped_overlap: usize,
}

impl SelectionResult {
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// Input was non-empty but nothing could be accepted
    pub fn no_conflict_free(&self) -> bool {
        self.picks.is_empty() && self.considered > 0
    }
}

type CellKey = (i64, i64);

/// Accepted picks indexed by grid cell
struct AcceptedIndex {
    cell_size: f64,
    cells: FxHashMap<CellKey, Vec<usize>>,
}

impl AcceptedIndex {
    fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: FxHashMap::default(),
        }
    }

    fn key(&self, c: &Candidate) -> CellKey {
        (
            (c.center.x() / self.cell_size).floor() as i64,
            (c.center.y() / self.cell_size).floor() as i64,
        )
    }

    fn insert(&mut self, c: &Candidate, slot: usize) {
        let key = self.key(c);
        self.cells.entry(key).or_default().push(slot);
    }

    /// Slots of accepted picks in the 3x3 neighbourhood of `c`
    fn nearby<'s>(&'s self, c: &Candidate) -> impl Iterator<Item = usize> + 's {
        let (cx, cy) = self.key(c);
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (cx + dx, cy + dy)))
            .filter_map(move |k| self.cells.get(&k))
            .flatten()
            .copied()
    }
}

/// Why a candidate could not be accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conflict {
    Spacing,
    Overlap,
}

fn conflict(a: &Candidate, b: &Candidate, min_spacing: f64) -> Option<Conflict> {
    if a.distance_to(b) < min_spacing {
        Some(Conflict::Spacing)
    } else if a.footprint.intersects(&b.footprint) {
        Some(Conflict::Overlap)
    } else {
        None
    }
}

pub struct CandidateSelector {
    params: SelectionParams,
}

impl CandidateSelector {
    pub fn new(params: SelectionParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SelectionParams {
        &self.params
    }

    /// Pick up to `count` mutually compatible candidates, best first
    ///
    /// Ties in composite score keep their input order.
    pub fn select(&self, candidates: &[Candidate], sink: &mut dyn EventSink) -> SelectionResult {
        let SelectionParams { count, min_spacing } = self.params;

        let mut order: Vec<&Candidate> = candidates.iter().collect();
        order.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));

        // Any conflicting pair is closer than max(spacing, 2 * radius)
        let max_radius = candidates
            .iter()
            .map(Candidate::footprint_radius)
            .fold(0.0, f64::max);
        let cell_size = min_spacing.max(2.0 * max_radius);
        let mut index = (cell_size.is_finite() && cell_size > 0.0).then(|| AcceptedIndex::new(cell_size));

        let mut result = SelectionResult {
            considered: candidates.len(),
            ..SelectionResult::default()
        };
        let mut accepted: Vec<&Candidate> = Vec::with_capacity(count.min(candidates.len()));

        for candidate in order {
            if accepted.len() >= count {
                break;
            }

            let found = match &index {
                Some(idx) => idx
                    .nearby(candidate)
                    .find_map(|slot| conflict(candidate, accepted[slot], min_spacing)),
                None => accepted
                    .iter()
                    .find_map(|other| conflict(candidate, other, min_spacing)),
            };
            match found {
                Some(Conflict::Spacing) => {
                    result.skipped_spacing += 1;
                    continue;
                }
                Some(Conflict::Overlap) => {
                    result.skipped_overlap += 1;
                    continue;
                }
                None => {}
            }

            if let Some(idx) = index.as_mut() {
                idx.insert(candidate, accepted.len());
            }
            accepted.push(candidate);
            sink.send(PlanEvent::CandidateSelected {
                rank: accepted.len(),
                scan_index: candidate.scan_index,
                composite_score: candidate.composite_score,
            });
        }

        result.picks = accepted
            .into_iter()
            .enumerate()
            .map(|(i, c)| RankedCandidate {
                rank: i + 1,
                candidate: c.clone(),
            })
            .collect();

        if result.no_conflict_free() {
            tracing::warn!(
                "No conflict-free candidates among {} (spacing {} m)",
                result.considered,
                min_spacing
            );
        }
        sink.send(PlanEvent::SelectionFinished {
            requested: count,
            selected: result.picks.len(),
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{oriented_rectangle, Orientation};
    use crate::metrics::{ComponentScores, ProximityScore, SuitabilityScore};
    use crate::observer::NoopSink;
    use geo::Point;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn candidate(x: f64, y: f64, bearing: f64, score: f64, scan_index: usize) -> Candidate {
        let center = Point::new(x, y);
        Candidate {
            center,
            footprint: oriented_rectangle(center, 20.0, 2.0, bearing),
            bearing_deg: bearing,
            orientation: Orientation::Orthogonal,
            inside_ratio: 1.0,
            slope_deg: 0.0,
            aspect_deg: bearing,
            scores: ComponentScores {
                suitability: SuitabilityScore { raw: None, norm: score },
                proximity: ProximityScore { distance: None, norm: score },
                slope: score,
            },
            composite_score: score,
            scan_index,
        }
    }

    /// Pairwise reference implementation of the same rule
    fn select_exhaustive(candidates: &[Candidate], params: SelectionParams) -> Vec<usize> {
        let mut order: Vec<&Candidate> = candidates.iter().collect();
        order.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
        let mut accepted: Vec<&Candidate> = Vec::new();
        for c in order {
            if accepted.len() >= params.count {
                break;
            }
            if accepted.iter().all(|a| conflict(c, a, params.min_spacing).is_none()) {
                accepted.push(c);
            }
        }
        accepted.iter().map(|c| c.scan_index).collect()
    }

    #[test]
    fn test_params_validation() {
        assert_eq!(
            CandidateSelector::new(SelectionParams { count: 0, min_spacing: 6.0 }).err(),
            Some(PlannerError::ZeroCount)
        );
        assert!(CandidateSelector::new(SelectionParams { count: 3, min_spacing: -1.0 }).is_err());
        assert!(CandidateSelector::new(SelectionParams { count: 3, min_spacing: f64::NAN }).is_err());
        assert!(CandidateSelector::new(SelectionParams { count: 3, min_spacing: 0.0 }).is_ok());
    }

    #[test]
    fn test_best_first_with_spacing() {
        // parallel north-south trenches 4 m apart never overlap
        let cands = vec![
            candidate(0.0, 0.0, 0.0, 0.9, 0),
            candidate(4.0, 0.0, 0.0, 0.8, 1),
            candidate(8.0, 0.0, 0.0, 0.7, 2),
            candidate(12.0, 0.0, 0.0, 0.95, 3),
        ];
        let selector = CandidateSelector::new(SelectionParams { count: 10, min_spacing: 6.0 }).unwrap();
        let result = selector.select(&cands, &mut NoopSink);
        let picked: Vec<usize> = result.picks.iter().map(|p| p.candidate.scan_index).collect();
        assert_eq!(picked, vec![3, 0]);
        assert_eq!(result.picks[0].rank, 1);
        assert_eq!(result.picks[1].rank, 2);
        assert_eq!(result.skipped_spacing, 2);
    }

    #[test]
    fn test_overlap_blocks_even_when_spaced() {
        // crossing trenches 8 m apart: spacing ok, footprints intersect
        let cands = vec![
            candidate(0.0, 0.0, 0.0, 0.9, 0),
            candidate(8.0, 0.0, 90.0, 0.8, 1),
        ];
        let selector = CandidateSelector::new(SelectionParams { count: 5, min_spacing: 6.0 }).unwrap();
        let result = selector.select(&cands, &mut NoopSink);
        assert_eq!(result.len(), 1);
        assert_eq!(result.skipped_overlap, 1);
    }

    #[test]
    fn test_ties_keep_scan_order() {
        let cands: Vec<Candidate> = (0..5)
            .map(|i| candidate(i as f64 * 50.0, 0.0, 0.0, 0.5, i))
            .collect();
        let selector = CandidateSelector::new(SelectionParams { count: 3, min_spacing: 6.0 }).unwrap();
        let result = selector.select(&cands, &mut NoopSink);
        let picked: Vec<usize> = result.picks.iter().map(|p| p.candidate.scan_index).collect();
        assert_eq!(picked, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_input_is_not_a_conflict() {
        let empty = CandidateSelector::new(SelectionParams::default())
            .unwrap()
            .select(&[], &mut NoopSink);
        assert!(empty.is_empty());
        assert!(!empty.no_conflict_free());
    }

    #[test]
    fn test_bucketed_matches_exhaustive() {
        let mut rng = StdRng::seed_from_u64(42);
        for trial in 0..20 {
            let cands: Vec<Candidate> = (0..200)
                .map(|i| {
                    candidate(
                        rng.gen_range(-150.0..150.0),
                        rng.gen_range(-150.0..150.0),
                        rng.gen_range(0.0..180.0),
                        (rng.gen_range(0..20) as f64) / 20.0,
                        i,
                    )
                })
                .collect();
            let params = SelectionParams {
                count: 40,
                min_spacing: if trial % 2 == 0 { 6.0 } else { 35.0 },
            };
            let result = CandidateSelector::new(params).unwrap().select(&cands, &mut NoopSink);
            let picked: Vec<usize> = result.picks.iter().map(|p| p.candidate.scan_index).collect();
            assert_eq!(picked, select_exhaustive(&cands, params), "trial {}", trial);
        }
    }

    #[test]
    fn test_selection_properties_hold() {
        let mut rng = StdRng::seed_from_u64(7);
        let cands: Vec<Candidate> = (0..300)
            .map(|i| {
                candidate(
                    rng.gen_range(0.0..200.0),
                    rng.gen_range(0.0..200.0),
                    rng.gen_range(0.0..180.0),
                    rng.gen_range(0.0..1.0),
                    i,
                )
            })
            .collect();
        let params = SelectionParams { count: 25, min_spacing: 12.0 };
        let result = CandidateSelector::new(params).unwrap().select(&cands, &mut NoopSink);
        assert!(result.len() <= 25);
        for (i, a) in result.picks.iter().enumerate() {
            assert_eq!(a.rank, i + 1);
            for b in &result.picks[i + 1..] {
                assert!(a.candidate.composite_score >= b.candidate.composite_score);
                assert!(a.candidate.distance_to(&b.candidate) >= params.min_spacing);
                assert!(!a.candidate.footprint.intersects(&b.candidate.footprint));
            }
        }
    }
}
