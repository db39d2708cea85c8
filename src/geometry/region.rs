//! Survey area (AOI) backed by a `geo` multipolygon

use super::PolygonRegion;
use crate::error::{PlannerError, Result};
use geo::{Area, BooleanOps, BoundingRect, Contains, MultiPolygon, Point, Polygon, Rect};

/// Polygonal area of interest with cached extent and area
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyArea {
    shape: MultiPolygon<f64>,
    bbox: Rect<f64>,
    area: f64,
}

impl SurveyArea {
    /// Wrap a multipolygon; it must be non-empty with positive area
    pub fn new(shape: MultiPolygon<f64>) -> Result<Self> {
        if shape.0.is_empty() {
            return Err(PlannerError::InvalidRegion("no polygons"));
        }
        let bbox = shape
            .bounding_rect()
            .ok_or(PlannerError::InvalidRegion("empty geometry"))?;
        let area = shape.unsigned_area();
        if !area.is_finite() || area <= 0.0 {
            return Err(PlannerError::InvalidRegion("zero area"));
        }
        Ok(Self { shape, bbox, area })
    }

    /// Union of several polygons (e.g. all selected AOI features)
    pub fn from_polygons<I>(polygons: I) -> Result<Self>
    where
        I: IntoIterator<Item = Polygon<f64>>,
    {
        let mut polygons = polygons.into_iter();
        let first = polygons
            .next()
            .ok_or(PlannerError::InvalidRegion("no polygons"))?;
        let merged = polygons.fold(MultiPolygon::new(vec![first]), |acc, p| {
            acc.union(&MultiPolygon::new(vec![p]))
        });
        Self::new(merged)
    }

    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }
}

impl From<SurveyArea> for MultiPolygon<f64> {
    fn from(area: SurveyArea) -> Self {
        area.shape
    }
}

impl PolygonRegion for SurveyArea {
    fn contains(&self, point: Point<f64>) -> bool {
        self.shape.contains(&point)
    }

    fn bounding_box(&self) -> Rect<f64> {
        self.bbox
    }

    fn area(&self) -> f64 {
        self.area
    }

    fn intersection_area(&self, other: &Polygon<f64>) -> f64 {
        let other = MultiPolygon::new(vec![other.clone()]);
        self.shape.intersection(&other).unsigned_area().max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{coord, polygon};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
            (x: x0, y: y0),
        ]
    }

    #[test]
    fn test_square_region() {
        let area = SurveyArea::new(MultiPolygon::new(vec![square(0.0, 0.0, 100.0)])).unwrap();
        assert_relative_eq!(area.area(), 10_000.0);
        assert_eq!(
            area.bounding_box(),
            Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 100.0, y: 100.0 })
        );
        assert!(area.contains(Point::new(50.0, 50.0)));
        assert!(!area.contains(Point::new(150.0, 50.0)));
    }

    #[test]
    fn test_intersection_area_of_overhanging_footprint() {
        let area = SurveyArea::new(MultiPolygon::new(vec![square(0.0, 0.0, 100.0)])).unwrap();
        let inside = square(10.0, 10.0, 10.0);
        assert_relative_eq!(area.intersection_area(&inside), 100.0, epsilon = 1e-9);

        // Half of it hangs over the east edge
        let straddling = square(95.0, 10.0, 10.0);
        assert_relative_eq!(area.intersection_area(&straddling), 50.0, epsilon = 1e-9);

        let outside = square(200.0, 200.0, 10.0);
        assert_relative_eq!(area.intersection_area(&outside), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_of_polygons() {
        let area = SurveyArea::from_polygons(vec![
            square(0.0, 0.0, 10.0),
            square(5.0, 0.0, 10.0),
            square(100.0, 100.0, 10.0),
        ])
        .unwrap();
        assert_relative_eq!(area.area(), 250.0, epsilon = 1e-9);
        assert_eq!(area.bounding_box().max(), coord! { x: 110.0, y: 110.0 });
    }

    #[test]
    fn test_degenerate_regions_rejected() {
        assert!(SurveyArea::new(MultiPolygon::new(vec![])).is_err());
        assert!(SurveyArea::from_polygons(Vec::<Polygon<f64>>::new()).is_err());
        let flat = polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 20.0, y: 0.0)];
        assert!(matches!(
            SurveyArea::new(MultiPolygon::new(vec![flat])),
            Err(PlannerError::InvalidRegion(_))
        ));
    }
}
