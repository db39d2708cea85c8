//! Known reference features (recorded sites, finds, features)
//!
//! Proximity to these raises a candidate's score. The collection is small
//! enough in practice that a linear nearest-distance scan is used.

use super::ReferenceProximityIndex;
use geo::{EuclideanDistance, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

/// A single reference geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "geometry", rename_all = "snake_case")]
pub enum ReferenceFeature {
    Point(Point<f64>),
    Line(LineString<f64>),
    Area(Polygon<f64>),
}

impl ReferenceFeature {
    /// Planar distance from `point`; zero inside an area feature
    pub fn distance_to(&self, point: &Point<f64>) -> f64 {
        match self {
            ReferenceFeature::Point(p) => point.euclidean_distance(p),
            ReferenceFeature::Line(line) => point.euclidean_distance(line),
            ReferenceFeature::Area(poly) => point.euclidean_distance(poly),
        }
    }
}

/// Reference features searched for the nearest distance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSites {
    features: Vec<ReferenceFeature>,
}

impl ReferenceSites {
    pub fn new(features: Vec<ReferenceFeature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromIterator<ReferenceFeature> for ReferenceSites {
    fn from_iter<I: IntoIterator<Item = ReferenceFeature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl ReferenceProximityIndex for ReferenceSites {
    fn nearest_distance(&self, point: Point<f64>) -> Option<f64> {
        self.features
            .iter()
            .map(|f| f.distance_to(&point))
            .filter(|d| d.is_finite())
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{line_string, polygon};

    #[test]
    fn test_nearest_over_mixed_features() {
        let sites: ReferenceSites = vec![
            ReferenceFeature::Point(Point::new(100.0, 0.0)),
            ReferenceFeature::Line(line_string![(x: 0.0, y: 30.0), (x: 50.0, y: 30.0)]),
            ReferenceFeature::Area(polygon![
                (x: -20.0, y: -20.0),
                (x: -10.0, y: -20.0),
                (x: -10.0, y: -10.0),
                (x: -20.0, y: -10.0),
            ]),
        ]
        .into_iter()
        .collect();

        assert_eq!(sites.len(), 3);
        assert_relative_eq!(sites.nearest_distance(Point::new(10.0, 20.0)).unwrap(), 10.0);
        assert_relative_eq!(sites.nearest_distance(Point::new(95.0, 0.0)).unwrap(), 5.0);
        // Inside the area feature
        assert_relative_eq!(sites.nearest_distance(Point::new(-15.0, -15.0)).unwrap(), 0.0);
    }

    #[test]
    fn test_empty_index_has_no_distance() {
        let sites = ReferenceSites::default();
        assert!(sites.is_empty());
        assert_eq!(sites.nearest_distance(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_feature_json() {
        let json = r#"{"type": "point", "geometry": {"x": 3.0, "y": 4.0}}"#;
        let f: ReferenceFeature = serde_json::from_str(json).unwrap();
        assert_relative_eq!(f.distance_to(&Point::new(0.0, 0.0)), 5.0);
    }
}
