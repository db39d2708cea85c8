//! Suitability surface
//!
//! Normalizes each criterion layer, weights it and sums the result into a
//! single surface the candidate scan can sample.

pub mod criterion;
pub mod compositor;

pub use compositor::{OutputScale, SuitabilityCompositor, COMPOSITE_NODATA};
pub use criterion::Criterion;
