//! The pluggable generator capability and its three call conventions.

use std::fmt;
use std::sync::Arc;

use rand_chacha::ChaCha8Rng;
use terrain_types::{CellBounds, CellIndex, HeightGrid, Point2};

/// Random number generator owned by one tile's pipeline.
pub type TileRng = ChaCha8Rng;

type VariationFn = dyn Fn(&mut TileCanvas, f64, f64, &mut TileRng) -> usize + Send + Sync;
type DifficultyFn = dyn Fn(&mut TileCanvas, f64, &mut TileRng) + Send + Sync;
type PureFn = dyn Fn(&PureRequest, &mut TileRng) -> PureOutput + Send + Sync;

/// A tile under construction, painted in place by canvas generators.
///
/// The grid starts flat at zero with the tile's dimensions; waypoints start
/// empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TileCanvas {
    /// Elevation grid of the tile.
    pub grid: HeightGrid,
    /// Goals in traversal order, in meters or in cells.
    pub waypoints: Vec<Point2<f64>>,
}

impl TileCanvas {
    /// Creates a canvas over `grid`.
    #[must_use]
    pub const fn new(grid: HeightGrid) -> Self {
        Self {
            grid,
            waypoints: Vec::new(),
        }
    }

    /// Tile length along X in meters.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.grid.length()
    }

    /// Tile width along Y in meters.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.grid.width()
    }

    /// Sets every cell whose corner lies in the rectangle `[x0, x1) x [y0, y1)`
    /// (meters) to `height_m`, clipped to the tile.
    pub fn fill_rect(&mut self, x0: f64, x1: f64, y0: f64, y1: f64, height_m: f64) {
        let hs = self.grid.horizontal_scale();
        let (r0, r1) = (first_cell(x0, hs), first_cell(x1, hs).min(self.grid.rows()));
        let (c0, c1) = (first_cell(y0, hs), first_cell(y1, hs).min(self.grid.cols()));
        if r0 >= r1 || c0 >= c1 {
            return;
        }
        let value = self.grid.to_units(height_m);
        self.grid.fill(
            CellBounds::new(CellIndex::new(r0, c0), CellIndex::new(r1 - 1, c1 - 1)),
            value,
        );
    }

    /// Sets the full-width band `[x0, x1)` to `height_m`.
    pub fn fill_band(&mut self, x0: f64, x1: f64, height_m: f64) {
        let width = self.width();
        self.fill_rect(x0, x1, 0.0, width, height_m);
    }

    /// Elevation in meters at a tile-local point, clamped into the tile.
    #[must_use]
    pub fn height_at(&self, point: &Point2<f64>) -> f64 {
        let CellIndex { row, col } = self.grid.cell_at_clamped(point);
        self.grid.to_meters(self.grid.get_clamped(row, col))
    }

    /// Appends a goal.
    pub fn push_goal(&mut self, x: f64, y: f64) {
        self.waypoints.push(Point2::new(x, y));
    }
}

/// Index of the first cell whose lower corner is at or past `meters`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn first_cell(meters: f64, cell_size: f64) -> usize {
    (meters / cell_size - 1e-9).ceil().max(0.0) as usize
}

/// Input of a pure generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PureRequest {
    /// Tile length along X in meters.
    pub length_m: f64,
    /// Tile width along Y in meters.
    pub width_m: f64,
    /// Meters per cell.
    pub cell_size_m: f64,
    /// Difficulty in `[0, 1]`.
    pub difficulty: f64,
}

impl PureRequest {
    /// Cells along X, as the generator should produce them.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rows(&self) -> usize {
        (self.length_m / self.cell_size_m).round() as usize
    }

    /// Cells along Y, as the generator should produce them.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cols(&self) -> usize {
        (self.width_m / self.cell_size_m).round() as usize
    }
}

/// Output of a pure generator.
#[derive(Debug, Clone, PartialEq)]
pub struct PureOutput {
    /// Number of rows of `heights_m`.
    pub rows: usize,
    /// Number of columns of `heights_m`.
    pub cols: usize,
    /// Row-major elevations in meters.
    pub heights_m: Vec<f64>,
    /// Goals in traversal order, in meters or in cells.
    pub waypoints: Vec<Point2<f64>>,
}

impl PureOutput {
    /// A flat output of the requested size, without waypoints.
    #[must_use]
    pub fn flat(request: &PureRequest) -> Self {
        let (rows, cols) = (request.rows(), request.cols());
        Self {
            rows,
            cols,
            heights_m: vec![0.0; rows * cols],
            waypoints: Vec::new(),
        }
    }
}

/// A generator with its call convention fixed at registration.
///
/// # Example
///
/// ```
/// use terrain_course::{Generator, TileCanvas, TileRng};
///
/// let hurdle = Generator::difficulty_only(|canvas: &mut TileCanvas, difficulty, _rng: &mut TileRng| {
///     canvas.fill_band(4.0, 4.4, 0.1 + 0.3 * difficulty);
///     canvas.push_goal(3.0, 1.0);
///     canvas.push_goal(6.0, 1.0);
/// });
/// assert_eq!(hurdle.convention(), "difficulty-only");
/// ```
#[derive(Clone)]
pub enum Generator {
    /// Paints a canvas given variation and difficulty; returns the index of
    /// the pattern it chose.
    WithVariation(Arc<VariationFn>),
    /// Paints a canvas given difficulty only; reports index 0.
    DifficultyOnly(Arc<DifficultyFn>),
    /// Returns elevations and waypoints for a request; reports index 0.
    Pure(Arc<PureFn>),
}

impl Generator {
    /// Wraps a variation-aware canvas generator. Arguments are
    /// `(canvas, variation, difficulty, rng)`.
    pub fn with_variation<F>(f: F) -> Self
    where
        F: Fn(&mut TileCanvas, f64, f64, &mut TileRng) -> usize + Send + Sync + 'static,
    {
        Self::WithVariation(Arc::new(f))
    }

    /// Wraps a difficulty-only canvas generator. Arguments are
    /// `(canvas, difficulty, rng)`.
    pub fn difficulty_only<F>(f: F) -> Self
    where
        F: Fn(&mut TileCanvas, f64, &mut TileRng) + Send + Sync + 'static,
    {
        Self::DifficultyOnly(Arc::new(f))
    }

    /// Wraps a pure generator.
    pub fn pure<F>(f: F) -> Self
    where
        F: Fn(&PureRequest, &mut TileRng) -> PureOutput + Send + Sync + 'static,
    {
        Self::Pure(Arc::new(f))
    }

    /// Name of the call convention.
    #[must_use]
    pub const fn convention(&self) -> &'static str {
        match self {
            Self::WithVariation(_) => "with-variation",
            Self::DifficultyOnly(_) => "difficulty-only",
            Self::Pure(_) => "pure",
        }
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Generator").field(&self.convention()).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn canvas() -> TileCanvas {
        TileCanvas::new(HeightGrid::new(40, 20, 0.1, 0.01).unwrap())
    }

    #[test]
    fn test_fill_rect_half_open() {
        let mut c = canvas();
        c.fill_rect(1.0, 1.5, 0.0, 2.0, 0.3);
        assert_eq!(c.grid.get(CellIndex::new(9, 0)), Some(0));
        assert_eq!(c.grid.get(CellIndex::new(10, 0)), Some(30));
        assert_eq!(c.grid.get(CellIndex::new(14, 19)), Some(30));
        assert_eq!(c.grid.get(CellIndex::new(15, 0)), Some(0));
        assert_relative_eq!(c.height_at(&Point2::new(1.2, 1.0)), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_fill_empty_rect() {
        let mut c = canvas();
        c.fill_rect(2.0, 2.0, 0.0, 2.0, 0.5);
        c.fill_band(3.0, 2.5, 0.5);
        assert_eq!(c.grid.max_sample(), 0);
    }

    #[test]
    fn test_pure_request_dims() {
        let req = PureRequest {
            length_m: 8.0,
            width_m: 4.0,
            cell_size_m: 0.05,
            difficulty: 0.5,
        };
        assert_eq!((req.rows(), req.cols()), (160, 80));
        let out = PureOutput::flat(&req);
        assert_eq!(out.heights_m.len(), 160 * 80);
    }

    #[test]
    fn test_debug_names_convention() {
        let g = Generator::pure(|req: &PureRequest, _: &mut TileRng| PureOutput::flat(req));
        assert_eq!(format!("{g:?}"), "Generator(\"pure\")");
    }
}
