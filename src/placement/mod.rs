//! Trench placement: grid-scan candidate generation and greedy selection

pub mod candidate;
pub mod generator;
pub mod selector;

pub use candidate::{Candidate, RankedCandidate};
pub use generator::{
    CandidateGenerator, GeneratorInputs, GeneratorParams, RejectReason, ScanOutcome, ScanStats,
};
pub use selector::{CandidateSelector, SelectionParams, SelectionResult};
