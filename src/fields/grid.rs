//! In-memory raster grid
//!
//! North-up grid addressed by (row, col) with row 0 at the top edge, the
//! layout terrain derivatives arrive in once the caller has resampled them.
//! Sampling returns the value of the cell containing the point.

use super::ScalarFieldSource;
use crate::error::{ensure_positive, PlannerError, Result};
use geo::{coord, Point, Rect};
use serde::{Deserialize, Serialize};

/// Placement and resolution of a grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// West edge
    pub origin_x: f64,
    /// North edge
    pub origin_y: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    pub cols: usize,
    pub rows: usize,
}

impl GridGeometry {
    /// Grid covering `extent` with square cells of `cell_size`
    pub fn covering(extent: Rect<f64>, cell_size: f64) -> Result<Self> {
        let cell_size = ensure_positive("cell_size", cell_size)?;
        let cols = (extent.width() / cell_size).ceil().max(1.0) as usize;
        let rows = (extent.height() / cell_size).ceil().max(1.0) as usize;
        Ok(Self {
            origin_x: extent.min().x,
            origin_y: extent.max().y,
            cell_width: cell_size,
            cell_height: cell_size,
            cols,
            rows,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Map extent of the whole grid
    pub fn extent(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.origin_x, y: self.origin_y - self.rows as f64 * self.cell_height },
            coord! { x: self.origin_x + self.cols as f64 * self.cell_width, y: self.origin_y },
        )
    }

    /// Centre of cell (row, col)
    pub fn cell_center(&self, row: usize, col: usize) -> Point<f64> {
        Point::new(
            self.origin_x + (col as f64 + 0.5) * self.cell_width,
            self.origin_y - (row as f64 + 0.5) * self.cell_height,
        )
    }

    /// Cell containing `point`, or `None` outside the grid
    pub fn cell_of(&self, point: Point<f64>) -> Option<(usize, usize)> {
        let col = ((point.x() - self.origin_x) / self.cell_width).floor();
        let row = ((self.origin_y - point.y()) / self.cell_height).floor();
        if !col.is_finite() || !row.is_finite() || col < 0.0 || row < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.rows && col < self.cols).then_some((row, col))
    }

    fn validate(&self) -> Result<()> {
        ensure_positive("cell_width", self.cell_width)?;
        ensure_positive("cell_height", self.cell_height)?;
        if !self.origin_x.is_finite() || !self.origin_y.is_finite() {
            return Err(PlannerError::NonPositive {
                name: "grid origin",
                value: f64::NAN,
            });
        }
        Ok(())
    }
}

/// Observed value range of a field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    /// Number of valid cells that contributed
    pub count: usize,
}

impl FieldStats {
    /// Spread is too small to normalize against
    pub fn is_degenerate(&self) -> bool {
        !(self.max - self.min).is_finite() || (self.max - self.min) <= 1e-12
    }
}

/// Serialized form, validated on the way in
#[derive(Serialize, Deserialize)]
struct RawGrid {
    #[serde(flatten)]
    geometry: GridGeometry,
    values: Vec<f64>,
    #[serde(default)]
    nodata: Option<f64>,
}

/// Row-major raster of `f64` values with an optional nodata marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid", into = "RawGrid")]
pub struct GridField {
    geometry: GridGeometry,
    values: Vec<f64>,
    nodata: Option<f64>,
}

impl GridField {
    /// Wrap row-major `values` (row 0 = north edge)
    pub fn new(geometry: GridGeometry, values: Vec<f64>) -> Result<Self> {
        geometry.validate()?;
        let expected = geometry.cell_count();
        if values.len() != expected {
            return Err(PlannerError::GridShape {
                rows: geometry.rows,
                cols: geometry.cols,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            geometry,
            values,
            nodata: None,
        })
    }

    /// Fill every cell from its centre coordinates
    pub fn from_fn<F>(geometry: GridGeometry, mut f: F) -> Result<Self>
    where
        F: FnMut(Point<f64>) -> f64,
    {
        geometry.validate()?;
        let mut values = Vec::with_capacity(geometry.cell_count());
        for row in 0..geometry.rows {
            for col in 0..geometry.cols {
                values.push(f(geometry.cell_center(row, col)));
            }
        }
        Self::new(geometry, values)
    }

    /// Treat `value` as missing data
    pub fn with_nodata(mut self, value: f64) -> Self {
        self.nodata = Some(value);
        self
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    /// Valid value at (row, col); nodata and non-finite cells are `None`
    pub fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.geometry.rows || col >= self.geometry.cols {
            return None;
        }
        let v = self.values[row * self.geometry.cols + col];
        if !v.is_finite() || self.nodata.is_some_and(|nd| v == nd) {
            None
        } else {
            Some(v)
        }
    }

    /// Min/max over valid cells, optionally only those whose centre lies in `within`
    ///
    /// Returns `None` when no valid cell contributes.
    pub fn stats(&self, within: Option<&Rect<f64>>) -> Option<FieldStats> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut count = 0;

        for row in 0..self.geometry.rows {
            for col in 0..self.geometry.cols {
                let Some(v) = self.value_at(row, col) else {
                    continue;
                };
                if let Some(rect) = within {
                    let c = self.geometry.cell_center(row, col);
                    if c.x() < rect.min().x
                        || c.x() > rect.max().x
                        || c.y() < rect.min().y
                        || c.y() > rect.max().y
                    {
                        continue;
                    }
                }
                min = min.min(v);
                max = max.max(v);
                count += 1;
            }
        }

        (count > 0).then_some(FieldStats { min, max, count })
    }
}

impl ScalarFieldSource for GridField {
    fn sample(&self, point: Point<f64>) -> Option<f64> {
        let (row, col) = self.geometry.cell_of(point)?;
        self.value_at(row, col)
    }
}

impl TryFrom<RawGrid> for GridField {
    type Error = PlannerError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        let grid = GridField::new(raw.geometry, raw.values)?;
        Ok(match raw.nodata {
            Some(nd) => grid.with_nodata(nd),
            None => grid,
        })
    }
}

impl From<GridField> for RawGrid {
    fn from(grid: GridField) -> Self {
        RawGrid {
            geometry: grid.geometry,
            values: grid.values,
            nodata: grid.nodata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn geometry_3x2() -> GridGeometry {
        GridGeometry {
            origin_x: 100.0,
            origin_y: 50.0,
            cell_width: 10.0,
            cell_height: 10.0,
            cols: 3,
            rows: 2,
        }
    }

    #[test]
    fn test_sampling_by_containing_cell() {
        let grid = GridField::new(geometry_3x2(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();

        // Top row spans y 40..50
        assert_eq!(grid.sample(Point::new(101.0, 49.0)), Some(1.0));
        assert_eq!(grid.sample(Point::new(125.0, 45.0)), Some(3.0));
        assert_eq!(grid.sample(Point::new(115.0, 35.0)), Some(5.0));

        // Outside
        assert_eq!(grid.sample(Point::new(99.0, 45.0)), None);
        assert_eq!(grid.sample(Point::new(105.0, 51.0)), None);
        assert_eq!(grid.sample(Point::new(105.0, 29.0)), None);
        assert_eq!(grid.sample(Point::new(131.0, 45.0)), None);
    }

    #[test]
    fn test_nodata_cells_are_gaps() {
        let grid = GridField::new(geometry_3x2(), vec![1.0, -9999.0, 3.0, f64::NAN, 5.0, 6.0])
            .unwrap()
            .with_nodata(-9999.0);
        assert_eq!(grid.sample(Point::new(115.0, 45.0)), None);
        assert_eq!(grid.sample(Point::new(105.0, 35.0)), None);
        assert_eq!(grid.value_at(1, 2), Some(6.0));
    }

    #[test]
    fn test_shape_mismatch() {
        let err = GridField::new(geometry_3x2(), vec![1.0; 5]).unwrap_err();
        assert!(matches!(err, PlannerError::GridShape { expected: 6, actual: 5, .. }));
    }

    #[test]
    fn test_stats_with_and_without_extent() {
        let grid = GridField::new(geometry_3x2(), vec![1.0, 2.0, 3.0, 4.0, -9999.0, 6.0])
            .unwrap()
            .with_nodata(-9999.0);

        let all = grid.stats(None).unwrap();
        assert_relative_eq!(all.min, 1.0);
        assert_relative_eq!(all.max, 6.0);
        assert_eq!(all.count, 5);

        // Only the western column (centres at x = 105)
        let west = Rect::new(coord! { x: 100.0, y: 30.0 }, coord! { x: 110.0, y: 50.0 });
        let s = grid.stats(Some(&west)).unwrap();
        assert_relative_eq!(s.min, 1.0);
        assert_relative_eq!(s.max, 4.0);
        assert_eq!(s.count, 2);

        let nowhere = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 });
        assert!(grid.stats(Some(&nowhere)).is_none());
    }

    #[test]
    fn test_from_fn_and_covering() {
        let extent = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 95.0, y: 40.0 });
        let geometry = GridGeometry::covering(extent, 10.0).unwrap();
        assert_eq!((geometry.cols, geometry.rows), (10, 4));

        let grid = GridField::from_fn(geometry, |p| p.x()).unwrap();
        assert_eq!(grid.sample(Point::new(12.0, 3.0)), Some(15.0));
        assert!(GridGeometry::covering(extent, 0.0).is_err());
    }

    #[test]
    fn test_json_is_validated() {
        let ok = r#"{"origin_x":0,"origin_y":10,"cell_width":5,"cell_height":5,
                     "cols":2,"rows":2,"values":[1,2,3,4],"nodata":-1}"#;
        let grid: GridField = serde_json::from_str(ok).unwrap();
        assert_eq!(grid.nodata(), Some(-1.0));

        let bad = r#"{"origin_x":0,"origin_y":10,"cell_width":5,"cell_height":5,
                      "cols":2,"rows":2,"values":[1,2,3]}"#;
        assert!(serde_json::from_str::<GridField>(bad).is_err());
    }
}
