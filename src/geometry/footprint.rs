//! Oriented rectangular trench footprints
//!
//! Bearings are degrees clockwise from grid north. A footprint's long axis
//! (`length`) runs along its bearing.

use geo::{coord, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

/// How the trench is laid out relative to the terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Long axis across the contours (along the slope direction)
    #[default]
    Orthogonal,
    /// Long axis along the contours
    Parallel,
}

impl Orientation {
    /// Axis bearing in [0, 180) derived from an aspect in degrees
    pub fn bearing_from_aspect(self, aspect_deg: f64) -> f64 {
        match self {
            Orientation::Orthogonal => aspect_deg.rem_euclid(180.0),
            Orientation::Parallel => (aspect_deg + 90.0).rem_euclid(180.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Orthogonal => "orthogonal",
            Orientation::Parallel => "parallel",
        }
    }
}

/// Unit vector pointing along `bearing_deg`
fn bearing_unit_vector(bearing_deg: f64) -> (f64, f64) {
    let theta = (90.0 - bearing_deg).to_radians();
    (theta.cos(), theta.sin())
}

/// `length` × `width` rectangle centred on `center`, long axis on `bearing_deg`
pub fn oriented_rectangle(center: Point<f64>, length: f64, width: f64, bearing_deg: f64) -> Polygon<f64> {
    let half_length = length * 0.5;
    let half_width = width * 0.5;
    let (ux, uy) = bearing_unit_vector(bearing_deg);
    let (vx, vy) = (-uy, ux);
    let (cx, cy) = (center.x(), center.y());

    let corner = |sl: f64, sw: f64| coord! {
        x: cx + sl * ux * half_length + sw * vx * half_width,
        y: cy + sl * uy * half_length + sw * vy * half_width
    };

    let ring = vec![
        corner(1.0, 1.0),
        corner(1.0, -1.0),
        corner(-1.0, -1.0),
        corner(-1.0, 1.0),
        corner(1.0, 1.0),
    ];
    Polygon::new(LineString::from(ring), vec![])
}
