//! Obstacle detection and footprint repair.
//!
//! An obstacle is a maximal 4-connected region of cells rising more than a
//! threshold above the tile minimum. Components are found with a BFS over a
//! dense visited array.

use std::collections::VecDeque;

use terrain_types::{CellBounds, CellIndex, HeightGrid};
use tracing::{debug, warn};

use crate::params::RepairParams;
use crate::result::{RepairAction, RepairLog};

const SIZE_TOLERANCE: f64 = 1e-9;
const MAX_SWEEPS: usize = 8;

/// A connected region of raised cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obstacle {
    /// Bounding box in cell space.
    pub bounds: CellBounds,
    /// Cells belonging to the region, in discovery order.
    pub cells: Vec<CellIndex>,
}

impl Obstacle {
    /// Number of cells in the region.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Bounding-box footprint `(along X, along Y)` in meters.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn footprint_m(&self, horizontal_scale: f64) -> (f64, f64) {
        let (rows, cols) = self.bounds.size();
        (rows as f64 * horizontal_scale, cols as f64 * horizontal_scale)
    }
}

/// Finds every obstacle in `grid`.
///
/// A cell is raised when `sample - min > threshold` (in elevation units).
/// Obstacles are returned in row-major order of their first cell.
///
/// # Example
///
/// ```
/// use terrain_types::{CellBounds, CellIndex, HeightGrid};
/// use terrain_repair::find_obstacles;
///
/// let mut grid = HeightGrid::new(20, 20, 0.1, 0.01).unwrap();
/// grid.fill(CellBounds::new(CellIndex::new(2, 2), CellIndex::new(4, 3)), 50);
/// grid.fill(CellBounds::new(CellIndex::new(10, 10), CellIndex::new(10, 10)), 50);
///
/// let obstacles = find_obstacles(&grid, 5);
/// assert_eq!(obstacles.len(), 2);
/// assert_eq!(obstacles[0].cell_count(), 6);
/// ```
#[must_use]
pub fn find_obstacles(grid: &HeightGrid, threshold: i16) -> Vec<Obstacle> {
    let rows = grid.rows();
    let cols = grid.cols();
    let baseline = i32::from(grid.min_sample());
    let threshold = i32::from(threshold);
    let samples = grid.samples();
    let raised = |cell: CellIndex| i32::from(samples[cell.row * cols + cell.col]) - baseline > threshold;

    let mut visited = vec![false; rows * cols];
    let mut obstacles = Vec::new();
    let mut queue = VecDeque::new();

    for (seed, _) in grid.iter() {
        let offset = seed.row * cols + seed.col;
        if visited[offset] || !raised(seed) {
            continue;
        }

        visited[offset] = true;
        queue.push_back(seed);
        let mut bounds = CellBounds::from_cell(seed);
        let mut cells = Vec::new();

        while let Some(cell) = queue.pop_front() {
            bounds.expand_to_include(cell);
            cells.push(cell);
            for next in cell.neighbors4(rows, cols) {
                let next_offset = next.row * cols + next.col;
                if !visited[next_offset] && raised(next) {
                    visited[next_offset] = true;
                    queue.push_back(next);
                }
            }
        }

        obstacles.push(Obstacle { bounds, cells });
    }

    obstacles
}

/// Erases or widens undersized obstacles.
///
/// Rows below `protected_rows` are never written. Sweeps repeat until one
/// leaves the grid unchanged, since widening one obstacle can clip another.
pub(crate) fn repair_obstacles(
    grid: &mut HeightGrid,
    params: &RepairParams,
    protected_rows: usize,
    log: &mut RepairLog,
) {
    for sweep in 0..MAX_SWEEPS {
        let before = log.len();
        sweep_obstacles(grid, params, protected_rows, log);
        if log.len() == before {
            return;
        }
        debug!(sweep, actions = log.len() - before, "Obstacle sweep changed tile");
    }
    warn!(sweeps = MAX_SWEEPS, "Obstacle repair did not settle");
}

fn sweep_obstacles(
    grid: &mut HeightGrid,
    params: &RepairParams,
    protected_rows: usize,
    log: &mut RepairLog,
) {
    let hs = grid.horizontal_scale();
    let threshold = grid.to_units(params.obstacle_step_threshold_m).max(1);
    let baseline = grid.min_sample();
    let obstacles = find_obstacles(grid, threshold);
    let level = Level {
        baseline: i32::from(baseline),
        threshold: i32::from(threshold),
    };

    for obstacle in obstacles {
        let (along_x, along_y) = obstacle.footprint_m(hs);
        let long = along_x.max(along_y);
        let short = along_x.min(along_y);
        let long_small = long + SIZE_TOLERANCE < params.min_obstacle_long_m;
        let short_small = short + SIZE_TOLERANCE < params.min_obstacle_short_m;

        if long_small && short_small {
            let mut changed = 0;
            for &cell in &obstacle.cells {
                if cell.row >= protected_rows && grid.get(cell) != Some(baseline) {
                    grid.set(cell, baseline);
                    changed += 1;
                }
            }
            if changed > 0 {
                log.push(RepairAction::ObstacleErased {
                    bounds: obstacle.bounds,
                    cells: changed,
                });
            }
        } else if short_small && !long_small && long / short > params.sliver_aspect_ratio {
            let target = cells_at_least(params.min_obstacle_short_m, hs);
            let before = obstacle.bounds;
            let after = if along_x <= along_y {
                widen_rows(grid, before, target, protected_rows, level)
            } else {
                widen_cols(grid, before, target, level)
            };
            if after != before {
                log.push(RepairAction::ObstacleExtended { before, after });
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cells_at_least(meters: f64, cell_size: f64) -> usize {
    (meters / cell_size - SIZE_TOLERANCE).ceil().max(1.0) as usize
}

/// Raised-cell test fixed at the start of a sweep.
#[derive(Debug, Clone, Copy)]
struct Level {
    baseline: i32,
    threshold: i32,
}

impl Level {
    fn raised(self, value: i16) -> bool {
        i32::from(value) - self.baseline > self.threshold
    }
}

/// Grows the bounds along X by copying the boundary row segment outward,
/// alternating low then high, until `target` rows are covered.
fn widen_rows(
    grid: &mut HeightGrid,
    mut bounds: CellBounds,
    target: usize,
    protected_rows: usize,
    level: Level,
) -> CellBounds {
    let rows = grid.rows();
    while bounds.size().0 < target {
        let mut grew = false;
        if bounds.min.row > protected_rows {
            copy_row_segment(grid, bounds.min.row, bounds.min.row - 1, bounds, level);
            bounds.min.row -= 1;
            grew = true;
        }
        if bounds.size().0 < target && bounds.max.row + 1 < rows {
            copy_row_segment(grid, bounds.max.row, bounds.max.row + 1, bounds, level);
            bounds.max.row += 1;
            grew = true;
        }
        if !grew {
            break;
        }
    }
    bounds
}

/// Column counterpart of [`widen_rows`]. Spawn rows are uniformly flat, so
/// copying across them leaves them unchanged.
fn widen_cols(grid: &mut HeightGrid, mut bounds: CellBounds, target: usize, level: Level) -> CellBounds {
    let cols = grid.cols();
    while bounds.size().1 < target {
        let mut grew = false;
        if bounds.min.col > 0 {
            copy_col_segment(grid, bounds.min.col, bounds.min.col - 1, bounds, level);
            bounds.min.col -= 1;
            grew = true;
        }
        if bounds.size().1 < target && bounds.max.col + 1 < cols {
            copy_col_segment(grid, bounds.max.col, bounds.max.col + 1, bounds, level);
            bounds.max.col += 1;
            grew = true;
        }
        if !grew {
            break;
        }
    }
    bounds
}

/// Copies raised cells of row `from` into row `to`, leaving cells that are
/// already raised alone so neighbouring obstacles keep their heights.
fn copy_row_segment(grid: &mut HeightGrid, from: usize, to: usize, bounds: CellBounds, level: Level) {
    for col in bounds.min.col..=bounds.max.col {
        copy_cell(grid, CellIndex::new(from, col), CellIndex::new(to, col), level);
    }
}

fn copy_col_segment(grid: &mut HeightGrid, from: usize, to: usize, bounds: CellBounds, level: Level) {
    for row in bounds.min.row..=bounds.max.row {
        copy_cell(grid, CellIndex::new(row, from), CellIndex::new(row, to), level);
    }
}

fn copy_cell(grid: &mut HeightGrid, from: CellIndex, to: CellIndex, level: Level) {
    let (Some(value), Some(current)) = (grid.get(from), grid.get(to)) else {
        return;
    };
    if level.raised(value) && !level.raised(current) {
        grid.set(to, value);
    }
}
