//! Hard exclusion zones (e.g. graves and their buffer)
//!
//! A footprint touching a zone, or coming within `buffer` of it, is rejected
//! outright rather than scored down. Measuring against the buffer distance is
//! equivalent to intersecting with the buffered zone.

use super::ExclusionGeometry;
use crate::error::{ensure_within, Result};
use geo::{coord, BoundingRect, EuclideanDistance, Intersects, Polygon, Rect};

#[derive(Debug, Clone)]
struct Zone {
    polygon: Polygon<f64>,
    // Extent grown by the buffer, for a cheap first rejection
    reach: Rect<f64>,
}

/// Union of areas to avoid, with an optional buffer distance
#[derive(Debug, Clone)]
pub struct ExclusionZones {
    zones: Vec<Zone>,
    buffer: f64,
}

impl ExclusionZones {
    /// Zones must not be approached closer than `buffer` (0 = touching only)
    pub fn new(polygons: Vec<Polygon<f64>>, buffer: f64) -> Result<Self> {
        let buffer = ensure_within("exclusion buffer", buffer, 0.0, f64::MAX)?;
        let zones = polygons
            .into_iter()
            .filter_map(|polygon| {
                let bbox = polygon.bounding_rect()?;
                let reach = Rect::new(
                    coord! { x: bbox.min().x - buffer, y: bbox.min().y - buffer },
                    coord! { x: bbox.max().x + buffer, y: bbox.max().y + buffer },
                );
                Some(Zone { polygon, reach })
            })
            .collect();
        Ok(Self { zones, buffer })
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn buffer(&self) -> f64 {
        self.buffer
    }
}

impl ExclusionGeometry for ExclusionZones {
    fn intersects(&self, footprint: &Polygon<f64>) -> bool {
        let Some(fp_bbox) = footprint.bounding_rect() else {
            return false;
        };
        self.zones.iter().any(|zone| {
            if !zone.reach.intersects(&fp_bbox) {
                return false;
            }
            footprint.intersects(&zone.polygon)
                || (self.buffer > 0.0 && footprint.euclidean_distance(&zone.polygon) <= self.buffer)
        })
    }
}
