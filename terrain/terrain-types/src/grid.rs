//! Quantized height grid.

use nalgebra::Point2;

use crate::cell::{CellBounds, CellIndex};
use crate::error::{TerrainTypesError, TerrainTypesResult};

/// A dense, row-major grid of quantized elevation samples.
///
/// Every sample is an `i16` number of vertical units; the elevation in meters
/// is `sample * vertical_scale`. Each cell covers `horizontal_scale` meters on
/// both horizontal axes.
///
/// # Example
///
/// ```
/// use terrain_types::{HeightGrid, CellIndex, Point2};
///
/// let mut grid = HeightGrid::new(20, 10, 0.1, 0.01).unwrap();
/// grid.set_meters(CellIndex::new(3, 4), 0.5);
///
/// // World lookups floor to the containing cell
/// assert_eq!(grid.cell_at(&Point2::new(0.35, 0.41)), Some(CellIndex::new(3, 4)));
/// assert!((grid.meters_at(CellIndex::new(3, 4)).unwrap() - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeightGrid {
    rows: usize,
    cols: usize,
    horizontal_scale: f64,
    vertical_scale: f64,
    samples: Vec<i16>,
}

impl HeightGrid {
    /// Creates a grid of zero elevation.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or either scale is not a
    /// positive finite number.
    pub fn new(
        rows: usize,
        cols: usize,
        horizontal_scale: f64,
        vertical_scale: f64,
    ) -> TerrainTypesResult<Self> {
        Self::from_samples(rows, cols, horizontal_scale, vertical_scale, vec![0; rows * cols])
    }

    /// Creates a grid from row-major quantized samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions or scales are invalid, or if
    /// `samples.len() != rows * cols`.
    pub fn from_samples(
        rows: usize,
        cols: usize,
        horizontal_scale: f64,
        vertical_scale: f64,
        samples: Vec<i16>,
    ) -> TerrainTypesResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(TerrainTypesError::InvalidDimensions { rows, cols });
        }
        for scale in [horizontal_scale, vertical_scale] {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(TerrainTypesError::InvalidScale(scale));
            }
        }
        if samples.len() != rows * cols {
            return Err(TerrainTypesError::SampleCountMismatch {
                expected: rows * cols,
                actual: samples.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            horizontal_scale,
            vertical_scale,
            samples,
        })
    }

    /// Creates a grid from row-major elevations in meters.
    ///
    /// Each elevation is divided by `vertical_scale` and rounded to the nearest
    /// unit. Values beyond the `i16` range saturate.
    ///
    /// # Errors
    ///
    /// Same conditions as [`HeightGrid::from_samples`].
    pub fn from_meters(
        rows: usize,
        cols: usize,
        horizontal_scale: f64,
        vertical_scale: f64,
        meters: &[f64],
    ) -> TerrainTypesResult<Self> {
        let samples = meters
            .iter()
            .map(|&m| quantize(m, vertical_scale))
            .collect();
        Self::from_samples(rows, cols, horizontal_scale, vertical_scale, samples)
    }

    /// Number of rows (X direction).
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (Y direction).
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Meters per cell.
    #[inline]
    #[must_use]
    pub const fn horizontal_scale(&self) -> f64 {
        self.horizontal_scale
    }

    /// Meters per elevation unit.
    #[inline]
    #[must_use]
    pub const fn vertical_scale(&self) -> f64 {
        self.vertical_scale
    }

    /// Physical extent along X in meters.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn length(&self) -> f64 {
        self.rows as f64 * self.horizontal_scale
    }

    /// Physical extent along Y in meters.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.cols as f64 * self.horizontal_scale
    }

    /// Bounds covering the whole grid.
    #[must_use]
    pub const fn bounds(&self) -> CellBounds {
        CellBounds {
            min: CellIndex::new(0, 0),
            max: CellIndex::new(self.rows - 1, self.cols - 1),
        }
    }

    /// Returns the raw row-major samples.
    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Returns the raw row-major samples mutably.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }

    /// Returns one row of samples.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[i16]> {
        (row < self.rows).then(|| &self.samples[row * self.cols..(row + 1) * self.cols])
    }

    /// Checks whether a cell lies inside the grid.
    #[inline]
    #[must_use]
    pub const fn contains(&self, cell: CellIndex) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    #[inline]
    const fn offset(&self, cell: CellIndex) -> usize {
        cell.row * self.cols + cell.col
    }

    /// Gets the quantized sample at a cell.
    #[inline]
    #[must_use]
    pub fn get(&self, cell: CellIndex) -> Option<i16> {
        self.contains(cell).then(|| self.samples[self.offset(cell)])
    }

    /// Gets the sample at a cell, clamping the index into the grid.
    #[must_use]
    pub fn get_clamped(&self, row: usize, col: usize) -> i16 {
        let cell = CellIndex::new(row.min(self.rows - 1), col.min(self.cols - 1));
        self.samples[self.offset(cell)]
    }

    /// Gets the elevation at a cell in meters.
    #[must_use]
    pub fn meters_at(&self, cell: CellIndex) -> Option<f64> {
        self.get(cell).map(|v| self.to_meters(v))
    }

    /// Sets the quantized sample at a cell. Out-of-range cells are ignored.
    ///
    /// Returns `true` if the cell was inside the grid.
    pub fn set(&mut self, cell: CellIndex, value: i16) -> bool {
        if !self.contains(cell) {
            return false;
        }
        let offset = self.offset(cell);
        self.samples[offset] = value;
        true
    }

    /// Sets the elevation at a cell in meters, quantizing it.
    pub fn set_meters(&mut self, cell: CellIndex, meters: f64) -> bool {
        let value = self.to_units(meters);
        self.set(cell, value)
    }

    /// Fills every cell inside `bounds` (clipped to the grid) with `value`.
    pub fn fill(&mut self, bounds: CellBounds, value: i16) {
        let max_row = bounds.max.row.min(self.rows - 1);
        let max_col = bounds.max.col.min(self.cols - 1);
        for row in bounds.min.row..=max_row {
            for col in bounds.min.col..=max_col {
                let offset = row * self.cols + col;
                self.samples[offset] = value;
            }
        }
    }

    /// Converts meters to quantized units (round to nearest, saturating).
    #[must_use]
    pub fn to_units(&self, meters: f64) -> i16 {
        quantize(meters, self.vertical_scale)
    }

    /// Converts quantized units to meters.
    #[must_use]
    pub fn to_meters(&self, units: i16) -> f64 {
        f64::from(units) * self.vertical_scale
    }

    /// Converts a horizontal distance in meters to a whole number of cells,
    /// rounding to nearest.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn cells_for(&self, meters: f64) -> usize {
        (meters / self.horizontal_scale).round().max(0.0) as usize
    }

    /// Returns the cell containing a point in the grid's local frame.
    ///
    /// Returns `None` for points outside the grid.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn cell_at(&self, point: &Point2<f64>) -> Option<CellIndex> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let row = (point.x / self.horizontal_scale).floor() as usize;
        let col = (point.y / self.horizontal_scale).floor() as usize;
        let cell = CellIndex::new(row, col);
        self.contains(cell).then_some(cell)
    }

    /// Returns the cell containing a point, clamped into the grid.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn cell_at_clamped(&self, point: &Point2<f64>) -> CellIndex {
        let row = (point.x / self.horizontal_scale).floor().max(0.0) as usize;
        let col = (point.y / self.horizontal_scale).floor().max(0.0) as usize;
        CellIndex::new(row.min(self.rows - 1), col.min(self.cols - 1))
    }

    /// Minimum sample value.
    #[must_use]
    pub fn min_sample(&self) -> i16 {
        self.samples.iter().copied().min().unwrap_or(0)
    }

    /// Maximum sample value.
    #[must_use]
    pub fn max_sample(&self) -> i16 {
        self.samples.iter().copied().max().unwrap_or(0)
    }

    /// Maximum sample inside `bounds` (clipped to the grid).
    #[must_use]
    pub fn max_in(&self, bounds: CellBounds) -> Option<i16> {
        if !self.contains(bounds.min) {
            return None;
        }
        let max_row = bounds.max.row.min(self.rows - 1);
        let max_col = bounds.max.col.min(self.cols - 1);
        (bounds.min.row..=max_row)
            .flat_map(|row| (bounds.min.col..=max_col).map(move |col| (row, col)))
            .map(|(row, col)| self.samples[row * self.cols + col])
            .max()
    }

    /// Copies `other` into this grid with its origin at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scales differ or the region does not fit.
    pub fn paste(&mut self, other: &Self, row: usize, col: usize) -> TerrainTypesResult<()> {
        if (self.horizontal_scale - other.horizontal_scale).abs() > f64::EPSILON
            || (self.vertical_scale - other.vertical_scale).abs() > f64::EPSILON
        {
            return Err(TerrainTypesError::ScaleMismatch);
        }
        if row + other.rows > self.rows || col + other.cols > self.cols {
            return Err(TerrainTypesError::RegionOutOfBounds {
                row,
                col,
                rows: other.rows,
                cols: other.cols,
            });
        }
        for r in 0..other.rows {
            let dst = (row + r) * self.cols + col;
            let src = r * other.cols;
            self.samples[dst..dst + other.cols].copy_from_slice(&other.samples[src..src + other.cols]);
        }
        Ok(())
    }

    /// Iterates over `(cell, sample)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, i16)> + '_ {
        let cols = self.cols;
        self.samples
            .iter()
            .enumerate()
            .map(move |(i, &v)| (CellIndex::new(i / cols, i % cols), v))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn quantize(meters: f64, vertical_scale: f64) -> i16 {
    // Float-to-int casts saturate at the i16 range.
    (meters / vertical_scale).round() as i16
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_zeroed() {
        let grid = HeightGrid::new(4, 3, 0.1, 0.01).unwrap();
        assert_eq!(grid.samples().len(), 12);
        assert!(grid.samples().iter().all(|&v| v == 0));
        assert_relative_eq!(grid.length(), 0.4, epsilon = 1e-12);
        assert_relative_eq!(grid.width(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            HeightGrid::new(0, 3, 0.1, 0.01),
            Err(TerrainTypesError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            HeightGrid::new(3, 3, 0.0, 0.01),
            Err(TerrainTypesError::InvalidScale(_))
        ));
        assert!(matches!(
            HeightGrid::new(3, 3, 0.1, f64::NAN),
            Err(TerrainTypesError::InvalidScale(_))
        ));
        assert!(matches!(
            HeightGrid::from_samples(2, 2, 0.1, 0.01, vec![0; 3]),
            Err(TerrainTypesError::SampleCountMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_from_meters_rounds() {
        let grid = HeightGrid::from_meters(1, 3, 0.1, 0.005, &[0.5, 0.0024, -0.0026]).unwrap();
        assert_eq!(grid.samples(), &[100, 0, -1]);
    }

    #[test]
    fn test_quantize_saturates() {
        let grid = HeightGrid::from_meters(1, 2, 0.1, 0.001, &[1.0e6, -1.0e6]).unwrap();
        assert_eq!(grid.samples(), &[i16::MAX, i16::MIN]);
    }

    #[test]
    fn test_set_out_of_bounds_ignored() {
        let mut grid = HeightGrid::new(2, 2, 0.1, 0.01).unwrap();
        assert!(!grid.set(CellIndex::new(2, 0), 5));
        assert!(grid.set(CellIndex::new(1, 1), 5));
        assert_eq!(grid.get(CellIndex::new(1, 1)), Some(5));
        assert_eq!(grid.get(CellIndex::new(5, 5)), None);
    }

    #[test]
    fn test_cell_at() {
        let grid = HeightGrid::new(10, 10, 0.5, 0.01).unwrap();
        assert_eq!(grid.cell_at(&Point2::new(0.0, 0.0)), Some(CellIndex::new(0, 0)));
        assert_eq!(grid.cell_at(&Point2::new(4.99, 0.6)), Some(CellIndex::new(9, 1)));
        assert_eq!(grid.cell_at(&Point2::new(5.0, 0.0)), None);
        assert_eq!(grid.cell_at(&Point2::new(-0.1, 0.0)), None);
        assert_eq!(grid.cell_at_clamped(&Point2::new(7.0, -3.0)), CellIndex::new(9, 0));
    }

    #[test]
    fn test_fill_and_max_in() {
        let mut grid = HeightGrid::new(5, 5, 0.1, 0.01).unwrap();
        grid.fill(CellBounds::new(CellIndex::new(1, 1), CellIndex::new(2, 9)), 7);
        assert_eq!(grid.get(CellIndex::new(2, 4)), Some(7));
        assert_eq!(grid.get(CellIndex::new(3, 4)), Some(0));
        assert_eq!(grid.max_sample(), 7);
        assert_eq!(grid.min_sample(), 0);
        let window = CellBounds::new(CellIndex::new(3, 0), CellIndex::new(4, 4));
        assert_eq!(grid.max_in(window), Some(0));
    }

    #[test]
    fn test_paste() {
        let mut big = HeightGrid::new(6, 6, 0.1, 0.01).unwrap();
        let small = HeightGrid::from_samples(2, 3, 0.1, 0.01, vec![1, 2, 3, 4, 5, 6]).unwrap();
        big.paste(&small, 3, 2).unwrap();
        assert_eq!(big.row(3).unwrap(), &[0, 0, 1, 2, 3, 0]);
        assert_eq!(big.row(4).unwrap(), &[0, 0, 4, 5, 6, 0]);

        assert!(matches!(
            big.paste(&small, 5, 0),
            Err(TerrainTypesError::RegionOutOfBounds { .. })
        ));
        let other_scale = HeightGrid::new(1, 1, 0.2, 0.01).unwrap();
        assert!(matches!(
            big.paste(&other_scale, 0, 0),
            Err(TerrainTypesError::ScaleMismatch)
        ));
    }

    #[test]
    fn test_iter_row_major() {
        let grid = HeightGrid::from_samples(2, 2, 0.1, 0.01, vec![1, 2, 3, 4]).unwrap();
        let cells: Vec<_> = grid.iter().collect();
        assert_eq!(cells[2], (CellIndex::new(1, 0), 3));
    }
}
