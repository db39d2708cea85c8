//! Spatial contracts used by candidate generation and selection
//!
//! The core only talks to regions, reference features and exclusion areas
//! through these traits. `geo`-backed implementations live in the submodules.
//! All coordinates are planar, in the units of the region's projected CRS.

pub mod region;
pub mod footprint;
pub mod reference;
pub mod exclusion;

pub use region::SurveyArea;
pub use footprint::{oriented_rectangle, Orientation};
pub use reference::{ReferenceFeature, ReferenceSites};
pub use exclusion::ExclusionZones;

use geo::{Point, Polygon, Rect};

/// Area of interest that candidates must fall inside
pub trait PolygonRegion {
    fn contains(&self, point: Point<f64>) -> bool;
    fn bounding_box(&self) -> Rect<f64>;
    fn area(&self) -> f64;
    /// Area of `other` lying inside the region
    fn intersection_area(&self, other: &Polygon<f64>) -> f64;
}

/// Distance to the nearest reference feature (known sites, finds)
pub trait ReferenceProximityIndex {
    /// `None` when the index holds no usable feature
    fn nearest_distance(&self, point: Point<f64>) -> Option<f64>;
}

/// Areas a footprint must not touch
pub trait ExclusionGeometry {
    fn intersects(&self, footprint: &Polygon<f64>) -> bool;
}
