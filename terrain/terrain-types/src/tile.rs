//! Tile geometry, waypoints, and the tile surface.

use std::ops::{Index, IndexMut};

use nalgebra::{Point2, Vector2};

use crate::error::{TerrainTypesError, TerrainTypesResult};
use crate::grid::HeightGrid;

/// Number of waypoints every tile carries.
pub const WAYPOINT_COUNT: usize = 8;

/// Physical extent and resolution of one course tile.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGeometry {
    /// Extent along X (direction of travel) in meters.
    pub length_m: f64,
    /// Extent along Y in meters.
    pub width_m: f64,
    /// Meters per grid cell.
    pub horizontal_scale: f64,
    /// Meters per elevation unit.
    pub vertical_scale: f64,
}

impl TileGeometry {
    /// Creates a tile geometry.
    #[must_use]
    pub const fn new(length_m: f64, width_m: f64, horizontal_scale: f64, vertical_scale: f64) -> Self {
        Self {
            length_m,
            width_m,
            horizontal_scale,
            vertical_scale,
        }
    }

    /// Number of rows (cells along X).
    ///
    /// # Errors
    ///
    /// Returns an error if the length is not a whole number of cells.
    pub fn rows(&self) -> TerrainTypesResult<usize> {
        whole_cells(self.length_m, self.horizontal_scale)
    }

    /// Number of columns (cells along Y).
    ///
    /// # Errors
    ///
    /// Returns an error if the width is not a whole number of cells.
    pub fn cols(&self) -> TerrainTypesResult<usize> {
        whole_cells(self.width_m, self.horizontal_scale)
    }

    /// Checks scales and extents.
    ///
    /// # Errors
    ///
    /// Returns an error if a scale is non-positive, or an extent is not a
    /// positive whole number of cells.
    pub fn validate(&self) -> TerrainTypesResult<()> {
        self.blank_grid().map(|_| ())
    }

    /// Creates a zero-elevation grid with this tile's dimensions.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TileGeometry::validate`].
    pub fn blank_grid(&self) -> TerrainTypesResult<HeightGrid> {
        for scale in [self.horizontal_scale, self.vertical_scale] {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(TerrainTypesError::InvalidScale(scale));
            }
        }
        HeightGrid::new(self.rows()?, self.cols()?, self.horizontal_scale, self.vertical_scale)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_cells(extent: f64, cell_size: f64) -> TerrainTypesResult<usize> {
    let cells = extent / cell_size;
    let rounded = cells.round();
    if !cells.is_finite() || rounded < 1.0 || (cells - rounded).abs() > 1e-6 {
        return Err(TerrainTypesError::FractionalExtent { extent, cell_size });
    }
    Ok(rounded as usize)
}

/// The ordered goal positions of a tile, in meters.
///
/// Index order is traversal order. Coordinates are tile-local until the
/// assembler translates them into the course frame.
///
/// # Example
///
/// ```
/// use terrain_types::{Point2, Waypoints};
///
/// let wps = Waypoints::from_partial(&[Point2::new(2.0, 1.0), Point2::new(4.0, 1.0)]).unwrap();
/// assert_eq!(wps[7], Point2::new(4.0, 1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoints(pub [Point2<f64>; WAYPOINT_COUNT]);

impl Waypoints {
    /// All waypoints at the tile origin.
    #[must_use]
    pub fn zeros() -> Self {
        Self([Point2::origin(); WAYPOINT_COUNT])
    }

    /// Builds a full list from up to [`WAYPOINT_COUNT`] points.
    ///
    /// Missing entries repeat the last supplied point; an empty input yields
    /// all zeros.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainTypesError::TooManyWaypoints`] for more than
    /// [`WAYPOINT_COUNT`] points.
    pub fn from_partial(points: &[Point2<f64>]) -> TerrainTypesResult<Self> {
        if points.len() > WAYPOINT_COUNT {
            return Err(TerrainTypesError::TooManyWaypoints(points.len()));
        }
        let fill = points.last().copied().unwrap_or_else(Point2::origin);
        let mut out = [fill; WAYPOINT_COUNT];
        out[..points.len()].copy_from_slice(points);
        Ok(Self(out))
    }

    /// Iterates over the waypoints in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, Point2<f64>> {
        self.0.iter()
    }

    /// Iterates mutably over the waypoints.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Point2<f64>> {
        self.0.iter_mut()
    }

    /// Returns the waypoints as a slice.
    #[must_use]
    pub const fn as_slice(&self) -> &[Point2<f64>] {
        &self.0
    }

    /// Returns a copy shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vector2<f64>) -> Self {
        Self(self.0.map(|p| p + offset))
    }
}

impl Default for Waypoints {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Index<usize> for Waypoints {
    type Output = Point2<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Waypoints {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<'a> IntoIterator for &'a Waypoints {
    type Item = &'a Point2<f64>;
    type IntoIter = std::slice::Iter<'a, Point2<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A tile's height grid together with its waypoints.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSurface {
    /// Elevation samples.
    pub grid: HeightGrid,
    /// Goals in tile-local meters.
    pub waypoints: Waypoints,
}

impl TileSurface {
    /// Creates a surface.
    #[must_use]
    pub const fn new(grid: HeightGrid, waypoints: Waypoints) -> Self {
        Self { grid, waypoints }
    }

    /// Tile extent `(length, width)` in meters.
    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        (self.grid.length(), self.grid.width())
    }
}
