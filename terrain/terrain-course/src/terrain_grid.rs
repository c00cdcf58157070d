//! The assembled course.

// Cell counts are far below 2^52
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use terrain_mesh::{MeshStrategy, TerrainMesh};
use terrain_types::{HeightGrid, Point2, Point3, TileGeometry, Vector3, Waypoints};

use crate::error::CourseResult;

/// A finished course: one border-padded grid plus per-tile spawn and goals.
///
/// World coordinates put the first tile's corner at the origin; the border
/// lies at negative X and Y. Per-tile arrays are indexed row-major,
/// `row * num_cols + col`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainGrid {
    grid: HeightGrid,
    geometry: TileGeometry,
    num_rows: usize,
    num_cols: usize,
    border_cells: usize,
    origins: Vec<Point3<f64>>,
    goals: Vec<Waypoints>,
    generator_indices: Vec<usize>,
}

impl TerrainGrid {
    #[allow(clippy::too_many_arguments)]
    pub(crate) const fn new(
        grid: HeightGrid,
        geometry: TileGeometry,
        num_rows: usize,
        num_cols: usize,
        border_cells: usize,
        origins: Vec<Point3<f64>>,
        goals: Vec<Waypoints>,
        generator_indices: Vec<usize>,
    ) -> Self {
        Self {
            grid,
            geometry,
            num_rows,
            num_cols,
            border_cells,
            origins,
            goals,
            generator_indices,
        }
    }

    /// The border-padded global height grid.
    #[must_use]
    pub const fn grid(&self) -> &HeightGrid {
        &self.grid
    }

    /// Consumes the course, returning its grid.
    #[must_use]
    pub fn into_grid(self) -> HeightGrid {
        self.grid
    }

    /// Geometry shared by every tile.
    #[must_use]
    pub const fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    /// Number of difficulty rows.
    #[must_use]
    pub const fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of variation columns.
    #[must_use]
    pub const fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Border width in cells on every side.
    #[must_use]
    pub const fn border_cells(&self) -> usize {
        self.border_cells
    }

    /// Spawn origins of every tile, in world meters.
    #[must_use]
    pub fn origins(&self) -> &[Point3<f64>] {
        &self.origins
    }

    /// Spawn origin of tile `(row, col)`.
    #[must_use]
    pub fn origin(&self, row: usize, col: usize) -> Option<Point3<f64>> {
        self.index(row, col).map(|i| self.origins[i])
    }

    /// World-frame goals of tile `(row, col)`.
    #[must_use]
    pub fn goals(&self, row: usize, col: usize) -> Option<&Waypoints> {
        self.index(row, col).map(|i| &self.goals[i])
    }

    /// Pattern index of tile `(row, col)`.
    #[must_use]
    pub fn generator_index(&self, row: usize, col: usize) -> Option<usize> {
        self.index(row, col).map(|i| self.generator_indices[i])
    }

    /// The tile `(row, col)` containing a world point, if any.
    #[must_use]
    pub fn tile_at(&self, point: &Point2<f64>) -> Option<(usize, usize)> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let row = (point.x / self.geometry.length_m).floor() as usize;
        let col = (point.y / self.geometry.width_m).floor() as usize;
        (row < self.num_rows && col < self.num_cols).then_some((row, col))
    }

    /// Elevation in meters of the cell under a world point, border included.
    #[must_use]
    pub fn height_at(&self, point: &Point2<f64>) -> Option<f64> {
        let cell = self.grid.cell_at(&self.to_grid_frame(point))?;
        self.grid.meters_at(cell)
    }

    /// Meshes the whole grid with `strategy`, in world coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::Mesh`](crate::CourseError::Mesh) if the
    /// strategy fails.
    pub fn to_mesh<S>(&self, strategy: &S) -> CourseResult<TerrainMesh>
    where
        S: MeshStrategy + ?Sized,
    {
        let mut mesh = strategy.build(&self.grid)?;
        let shift = self.border_m();
        mesh.translate(Vector3::new(-shift, -shift, 0.0));
        Ok(mesh)
    }

    fn border_m(&self) -> f64 {
        self.border_cells as f64 * self.grid.horizontal_scale()
    }

    fn to_grid_frame(&self, point: &Point2<f64>) -> Point2<f64> {
        let shift = self.border_m();
        Point2::new(point.x + shift, point.y + shift)
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.num_rows && col < self.num_cols).then_some(row * self.num_cols + col)
    }
}
