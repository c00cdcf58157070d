//! Line rasterization in cell space.

use terrain_types::CellIndex;

/// An iterator over the cells of a Bresenham line, both endpoints included.
///
/// # Example
///
/// ```
/// use terrain_types::CellIndex;
/// use terrain_feasibility::CellLine;
///
/// let cells: Vec<_> = CellLine::new(CellIndex::new(0, 0), CellIndex::new(3, 1)).collect();
/// assert_eq!(cells.len(), 4);
/// assert_eq!(cells[0], CellIndex::new(0, 0));
/// assert_eq!(cells[3], CellIndex::new(3, 1));
/// ```
#[derive(Debug, Clone)]
pub struct CellLine {
    /// Current position.
    row: i64,
    col: i64,
    /// Final position.
    end_row: i64,
    end_col: i64,
    /// Step direction along each axis (-1, 0 or 1).
    step_row: i64,
    step_col: i64,
    /// Absolute deltas; `delta_col` is stored negated.
    delta_row: i64,
    delta_col: i64,
    error: i64,
    done: bool,
}

impl CellLine {
    /// Creates a line from `start` to `end`.
    #[allow(clippy::cast_possible_wrap)]
    #[must_use]
    pub fn new(start: CellIndex, end: CellIndex) -> Self {
        let (row, col) = (start.row as i64, start.col as i64);
        let (end_row, end_col) = (end.row as i64, end.col as i64);
        let delta_row = (end_row - row).abs();
        let delta_col = -(end_col - col).abs();
        Self {
            row,
            col,
            end_row,
            end_col,
            step_row: (end_row - row).signum(),
            step_col: (end_col - col).signum(),
            delta_row,
            delta_col,
            error: delta_row + delta_col,
            done: false,
        }
    }
}

impl Iterator for CellLine {
    type Item = CellIndex;

    #[allow(clippy::cast_sign_loss)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = CellIndex::new(self.row as usize, self.col as usize);
        if self.row == self.end_row && self.col == self.end_col {
            self.done = true;
            return Some(current);
        }

        let doubled = 2 * self.error;
        if doubled >= self.delta_col {
            self.error += self.delta_col;
            self.row += self.step_row;
        }
        if doubled <= self.delta_row {
            self.error += self.delta_row;
            self.col += self.step_col;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(a: (usize, usize), b: (usize, usize)) -> Vec<CellIndex> {
        CellLine::new(a.into(), b.into()).collect()
    }

    #[test]
    fn test_single_cell() {
        assert_eq!(line((3, 3), (3, 3)), vec![CellIndex::new(3, 3)]);
    }

    #[test]
    fn test_axis_aligned() {
        let cells = line((0, 2), (4, 2));
        assert_eq!(cells.len(), 5);
        assert!(cells.iter().all(|c| c.col == 2));
        assert_eq!(cells[4], CellIndex::new(4, 2));
    }

    #[test]
    fn test_reverse_direction() {
        let cells = line((5, 1), (0, 1));
        assert_eq!(cells.first(), Some(&CellIndex::new(5, 1)));
        assert_eq!(cells.last(), Some(&CellIndex::new(0, 1)));
        assert_eq!(cells.len(), 6);
    }

    #[test]
    fn test_diagonal() {
        let cells = line((0, 0), (3, 3));
        assert_eq!(
            cells,
            vec![
                CellIndex::new(0, 0),
                CellIndex::new(1, 1),
                CellIndex::new(2, 2),
                CellIndex::new(3, 3)
            ]
        );
    }

    #[test]
    fn test_shallow_line_visits_each_row_once() {
        let cells = line((0, 0), (10, 3));
        assert_eq!(cells.len(), 11);
        for pair in cells.windows(2) {
            assert_eq!(pair[1].row, pair[0].row + 1);
            assert!(pair[1].col - pair[0].col <= 1);
        }
    }
}
