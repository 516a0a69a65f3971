//! REGNIE grid geometry and coordinate transform.
//!
//! The REGNIE grid has 611 points in west/east direction and 971 points in
//! north/south direction. Longitude is sampled every 60 geographic seconds
//! (60 points per degree), latitude every 30 seconds (120 points per degree).
//!
//! Cell `R(1,1)` is the north-west corner. For any cell `R(m,n)`:
//!
//! ```text
//! lon(m,n) = ( 6 - 10·δx) + (n - 1)·δx
//! lat(m,n) = (55 + 10·δy) - (m - 1)·δy
//! ```
//!
//! Every coordinate refers to the center of the cell.

use crate::error::{RegnieError, Result};

/// Number of columns (west → east).
pub const WIDTH: usize = 611;

/// Number of rows (north → south).
pub const HEIGHT: usize = 971;

/// Longitude step in degrees (60 arc-seconds).
pub const X_DELTA: f64 = 1.0 / 60.0;

/// Latitude step in degrees (30 arc-seconds).
pub const Y_DELTA: f64 = 1.0 / 120.0;

/// A 1-based `(row, column)` position in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridIndex {
    /// Row, 1 = northern edge.
    pub row: usize,
    /// Column, 1 = western edge.
    pub column: usize,
}

impl GridIndex {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Extent of the cell centers of a grid, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

/// Fixed geometry of a row-major grid of geographic cells.
///
/// [`GridGeometry::REGNIE`] is the only geometry REGNIE files use; the struct
/// exists so the dimensions are passed to the reader and converter explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Longitude step between columns.
    pub x_delta: f64,
    /// Latitude step between rows.
    pub y_delta: f64,
    /// Latitude of the center of cell (1, 1).
    pub origin_lat: f64,
    /// Longitude of the center of cell (1, 1).
    pub origin_lon: f64,
}

impl GridGeometry {
    /// The 611×971 REGNIE grid.
    pub const REGNIE: GridGeometry = GridGeometry {
        width: WIDTH,
        height: HEIGHT,
        x_delta: X_DELTA,
        y_delta: Y_DELTA,
        origin_lat: 55.0 + 10.0 * Y_DELTA,
        origin_lon: 6.0 - 10.0 * X_DELTA,
    };

    /// Total number of cells.
    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Whether `index` lies inside the grid.
    pub fn contains(&self, index: GridIndex) -> bool {
        (1..=self.height).contains(&index.row) && (1..=self.width).contains(&index.column)
    }

    /// Geographic center `(lat, lon)` of a cell.
    ///
    /// No bounds check is performed: indices outside the grid yield
    /// extrapolated coordinates.
    pub fn cell_center(&self, index: GridIndex) -> (f64, f64) {
        let lat = self.origin_lat - (index.row as f64 - 1.0) * self.y_delta;
        let lon = self.origin_lon + (index.column as f64 - 1.0) * self.x_delta;
        (lat, lon)
    }

    /// Like [`cell_center`](Self::cell_center), but rejects indices outside the grid.
    ///
    /// # Errors
    ///
    /// Returns [`RegnieError::InvalidIndex`] if `index` is not inside the grid.
    pub fn cell_center_checked(&self, index: GridIndex) -> Result<(f64, f64)> {
        if !self.contains(index) {
            return Err(RegnieError::InvalidIndex {
                row: index.row,
                column: index.column,
            });
        }
        Ok(self.cell_center(index))
    }

    /// Find the cell whose center is nearest to `(lat, lon)`.
    ///
    /// # Errors
    ///
    /// Returns [`RegnieError::OutOfBounds`] if the nearest center lies outside
    /// the grid, i.e. the point is more than half a cell beyond the extent.
    pub fn cell_at(&self, lat: f64, lon: f64) -> Result<GridIndex> {
        let row = ((self.origin_lat - lat) / self.y_delta).round() + 1.0;
        let column = ((lon - self.origin_lon) / self.x_delta).round() + 1.0;

        let rows = 1.0..=self.height as f64;
        let columns = 1.0..=self.width as f64;
        if !rows.contains(&row) || !columns.contains(&column) {
            return Err(RegnieError::OutOfBounds { lat, lon });
        }

        Ok(GridIndex::new(row as usize, column as usize))
    }

    /// Extent spanned by the cell centers.
    pub fn extent(&self) -> Extent {
        let (north, west) = self.cell_center(GridIndex::new(1, 1));
        let (south, east) = self.cell_center(GridIndex::new(self.height, self.width));
        Extent {
            north,
            south,
            west,
            east,
        }
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::REGNIE
    }
}

/// Geographic center `(lat, lon)` of the REGNIE cell at a 1-based `(row, column)`.
///
/// # Examples
///
/// ```
/// use regnie::grid::cell_center;
///
/// let (lat, lon) = cell_center(971, 611);
/// assert!((lat - 47.0).abs() < 1e-9);
/// assert!((lon - 16.0).abs() < 1e-9);
/// ```
pub fn cell_center(row: usize, column: usize) -> (f64, f64) {
    GridGeometry::REGNIE.cell_center(GridIndex::new(row, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_first_cell() {
        let (lat, lon) = cell_center(1, 1);
        assert!((lat - (55.0 + 10.0 / 120.0)).abs() < EPS);
        assert!((lon - (6.0 - 10.0 / 60.0)).abs() < EPS);
        assert_eq!(format!("{:.6},{:.6}", lat, lon), "55.083333,5.833333");
    }

    #[test]
    fn test_south_west_corner() {
        let (lat, lon) = cell_center(971, 1);
        assert!((lat - (55.0 + 10.0 / 120.0 - 970.0 / 120.0)).abs() < EPS);
        assert!((lon - 5.833333333333333).abs() < EPS);
        assert_eq!(format!("{:.6}", lat), "47.000000");
    }

    #[test]
    fn test_matches_formula_exactly() {
        let dx = 1.0 / 60.0;
        let dy = 1.0 / 120.0;
        for (row, column) in [(1, 1), (2, 3), (485, 306), (971, 611), (700, 42)] {
            let expected_lat = (55.0 + 10.0 * dy) - ((row - 1) as f64) * dy;
            let expected_lon = (6.0 - 10.0 * dx) + ((column - 1) as f64) * dx;
            assert_eq!(cell_center(row, column), (expected_lat, expected_lon));
        }
    }

    #[test]
    fn test_monotonic() {
        for row in 1..HEIGHT {
            assert!(cell_center(row + 1, 300).0 < cell_center(row, 300).0);
        }
        for column in 1..WIDTH {
            assert!(cell_center(500, column + 1).1 > cell_center(500, column).1);
        }
    }

    #[test]
    fn test_out_of_range_extrapolates() {
        let geometry = GridGeometry::REGNIE;
        let (lat, _) = geometry.cell_center(GridIndex::new(0, 1));
        assert!((lat - (geometry.origin_lat + Y_DELTA)).abs() < EPS);

        let (_, lon) = geometry.cell_center(GridIndex::new(1, 612));
        assert!((lon - 16.0 - X_DELTA).abs() < 1e-9);
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        let geometry = GridGeometry::REGNIE;
        assert!(geometry.cell_center_checked(GridIndex::new(1, 1)).is_ok());
        assert!(geometry
            .cell_center_checked(GridIndex::new(971, 611))
            .is_ok());

        for (row, column) in [(0, 1), (1, 0), (972, 1), (1, 612)] {
            match geometry.cell_center_checked(GridIndex::new(row, column)) {
                Err(RegnieError::InvalidIndex { row: r, column: c }) => {
                    assert_eq!((r, c), (row, column));
                }
                other => panic!("Expected InvalidIndex, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_cell_at_inverts_cell_center() {
        let geometry = GridGeometry::REGNIE;
        for (row, column) in [(1, 1), (971, 611), (1, 611), (971, 1), (321, 123)] {
            let index = GridIndex::new(row, column);
            let (lat, lon) = geometry.cell_center(index);
            assert_eq!(geometry.cell_at(lat, lon).unwrap(), index);
        }
    }

    #[test]
    fn test_cell_at_nearest_center() {
        let geometry = GridGeometry::REGNIE;
        // Leipzig
        let index = geometry.cell_at(51.34, 12.37).unwrap();
        let (lat, lon) = geometry.cell_center(index);
        assert!((lat - 51.34).abs() <= Y_DELTA / 2.0);
        assert!((lon - 12.37).abs() <= X_DELTA / 2.0);
    }

    #[test]
    fn test_cell_at_out_of_bounds() {
        let geometry = GridGeometry::REGNIE;
        assert!(matches!(
            geometry.cell_at(60.0, 10.0),
            Err(RegnieError::OutOfBounds { .. })
        ));
        assert!(matches!(
            geometry.cell_at(50.0, 20.0),
            Err(RegnieError::OutOfBounds { .. })
        ));
        assert!(geometry.cell_at(f64::NAN, 10.0).is_err());
    }

    #[test]
    fn test_extent() {
        let extent = GridGeometry::REGNIE.extent();
        assert!((extent.north - 55.083333333).abs() < 1e-6);
        assert!((extent.south - 47.0).abs() < 1e-9);
        assert!((extent.west - 5.833333333).abs() < 1e-6);
        assert!((extent.east - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_geometry_dimensions() {
        let geometry = GridGeometry::default();
        assert_eq!(geometry, GridGeometry::REGNIE);
        assert_eq!(geometry.cells(), 611 * 971);
        assert!(geometry.contains(GridIndex::new(971, 611)));
        assert!(!geometry.contains(GridIndex::new(0, 0)));
    }
}
