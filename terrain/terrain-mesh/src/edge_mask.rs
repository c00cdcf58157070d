//! Cliff edge mask.

use terrain_types::CellIndex;

/// Grid cells adjacent to a detected cliff.
///
/// Same dimensions as the source height grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeMask {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl EdgeMask {
    /// Creates an empty mask.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Whether a cell is marked. Cells outside the mask are not.
    #[must_use]
    pub fn is_set(&self, cell: CellIndex) -> bool {
        cell.row < self.rows && cell.col < self.cols && self.cells[cell.row * self.cols + cell.col]
    }

    /// Marks a cell. Cells outside the mask are ignored.
    pub fn set(&mut self, cell: CellIndex) {
        if cell.row < self.rows && cell.col < self.cols {
            self.cells[cell.row * self.cols + cell.col] = true;
        }
    }

    /// Number of marked cells.
    #[must_use]
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Row-major cell flags.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.cells
    }

    /// Grows the mask by `margin` cells using 4-connectivity.
    #[must_use]
    pub fn dilate(&self, margin: usize) -> Self {
        let mut current = self.clone();
        for _ in 0..margin {
            let mut next = current.clone();
            for (i, _) in current.cells.iter().enumerate().filter(|&(_, &c)| c) {
                let cell = CellIndex::new(i / self.cols, i % self.cols);
                for neighbor in cell.neighbors4(self.rows, self.cols) {
                    next.set(neighbor);
                }
            }
            current = next;
        }
        current
    }
}
