//! Utility modules shared across scoring stages
//!
//! - Normalization: min-max rescaling with benefit/cost direction

pub mod normalization;

// Re-export commonly used items
pub use normalization::{clamp_unit, min_max_normalize, Direction};
