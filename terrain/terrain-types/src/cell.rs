//! Discrete cell addressing.

/// A row/column index into a [`HeightGrid`](crate::HeightGrid).
///
/// Rows advance along the tile length (X), columns along its width (Y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellIndex {
    /// Row index (X direction).
    pub row: usize,
    /// Column index (Y direction).
    pub col: usize,
}

impl CellIndex {
    /// Creates a new cell index.
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the 4-connected neighbors that lie inside a `rows x cols` grid.
    ///
    /// # Example
    ///
    /// ```
    /// use terrain_types::CellIndex;
    ///
    /// let corner = CellIndex::new(0, 0);
    /// assert_eq!(corner.neighbors4(3, 3).count(), 2);
    ///
    /// let center = CellIndex::new(1, 1);
    /// assert_eq!(center.neighbors4(3, 3).count(), 4);
    /// ```
    pub fn neighbors4(self, rows: usize, cols: usize) -> impl Iterator<Item = Self> {
        let up = self.row.checked_sub(1).map(|r| Self::new(r, self.col));
        let down = (self.row + 1 < rows).then(|| Self::new(self.row + 1, self.col));
        let left = self.col.checked_sub(1).map(|c| Self::new(self.row, c));
        let right = (self.col + 1 < cols).then(|| Self::new(self.row, self.col + 1));
        [up, down, left, right].into_iter().flatten()
    }
}

impl From<(usize, usize)> for CellIndex {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

/// Inclusive rectangular bounds in cell space.
///
/// # Example
///
/// ```
/// use terrain_types::{CellBounds, CellIndex};
///
/// let mut bounds = CellBounds::from_cell(CellIndex::new(4, 4));
/// bounds.expand_to_include(CellIndex::new(6, 5));
///
/// assert_eq!(bounds.size(), (3, 2));
/// assert_eq!(bounds.area(), 6);
/// assert!(bounds.contains(CellIndex::new(5, 5)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellBounds {
    /// Minimum corner (inclusive).
    pub min: CellIndex,
    /// Maximum corner (inclusive).
    pub max: CellIndex,
}

impl CellBounds {
    /// Creates bounds from two corners, ordering them so `min <= max` on each axis.
    #[must_use]
    pub fn new(a: CellIndex, b: CellIndex) -> Self {
        Self {
            min: CellIndex::new(a.row.min(b.row), a.col.min(b.col)),
            max: CellIndex::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Creates bounds covering a single cell.
    #[must_use]
    pub const fn from_cell(cell: CellIndex) -> Self {
        Self {
            min: cell,
            max: cell,
        }
    }

    /// Returns the size as `(rows, cols)`. Each dimension is at least 1.
    #[must_use]
    pub const fn size(&self) -> (usize, usize) {
        (
            self.max.row - self.min.row + 1,
            self.max.col - self.min.col + 1,
        )
    }

    /// Returns the number of cells covered.
    #[must_use]
    pub const fn area(&self) -> usize {
        let (rows, cols) = self.size();
        rows * cols
    }

    /// Checks if the bounds contain a cell.
    #[must_use]
    pub const fn contains(&self, cell: CellIndex) -> bool {
        cell.row >= self.min.row
            && cell.row <= self.max.row
            && cell.col >= self.min.col
            && cell.col <= self.max.col
    }

    /// Expands the bounds to include a cell.
    pub fn expand_to_include(&mut self, cell: CellIndex) {
        self.min = CellIndex::new(self.min.row.min(cell.row), self.min.col.min(cell.col));
        self.max = CellIndex::new(self.max.row.max(cell.row), self.max.col.max(cell.col));
    }

    /// Iterates over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellIndex> + use<> {
        let (min, max) = (self.min, self.max);
        (min.row..=max.row).flat_map(move |row| (min.col..=max.col).map(move |col| CellIndex::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_orders_corners() {
        let bounds = CellBounds::new(CellIndex::new(5, 1), CellIndex::new(2, 7));
        assert_eq!(bounds.min, CellIndex::new(2, 1));
        assert_eq!(bounds.max, CellIndex::new(5, 7));
        assert_eq!(bounds.size(), (4, 7));
    }

    #[test]
    fn test_bounds_iter_row_major() {
        let bounds = CellBounds::new(CellIndex::new(0, 0), CellIndex::new(1, 2));
        let cells: Vec<_> = bounds.iter().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], CellIndex::new(0, 0));
        assert_eq!(cells[1], CellIndex::new(0, 1));
        assert_eq!(cells[3], CellIndex::new(1, 0));
    }

    #[test]
    fn test_neighbors_edges() {
        let cell = CellIndex::new(2, 0);
        let neighbors: Vec<_> = cell.neighbors4(3, 1).collect();
        assert_eq!(neighbors, vec![CellIndex::new(1, 0)]);
    }
}
