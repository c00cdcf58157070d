//! The repair pass.

use terrain_types::{CellBounds, CellIndex, HeightGrid, TileSurface};
use tracing::{debug, warn};

use crate::error::RepairResult;
use crate::obstacles::repair_obstacles;
use crate::params::RepairParams;
use crate::result::{RepairAction, RepairLog};
use crate::waypoints::{clamp_waypoints, normalize_units, repair_waypoints};

/// A tile that passed the repair pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepairedTile {
    /// The sanitized grid and waypoints.
    pub surface: TileSurface,
    /// Repairs that fired, empty if the tile was already clean.
    pub log: RepairLog,
}

/// Sanitizes a freshly generated tile.
///
/// Steps run in order:
///
/// 1. Waypoints given in cells are rescaled to meters
/// 2. Elevations below the depth floor are raised to it
/// 3. Out-of-tile waypoints are copied from valid neighbors
/// 4. Waypoints are clamped inside the edge margin and the spawn strip is flattened
/// 5. Undersized obstacles are erased or widened
///
/// Each step only writes when it changes something, so repairing a repaired
/// tile yields an empty log.
///
/// # Errors
///
/// Returns [`RepairError`](crate::RepairError) if the parameters are invalid,
/// too many waypoints needed repair, or a waypoint is still outside the tile.
///
/// # Example
///
/// ```
/// use terrain_types::{HeightGrid, Point2, TileSurface, Waypoints};
/// use terrain_repair::{RepairParams, repair_tile};
///
/// let grid = HeightGrid::new(200, 80, 0.05, 0.005).unwrap();
/// let points: Vec<_> = (0..8).map(|i| Point2::new(2.0 + f64::from(i), 2.0)).collect();
/// let surface = TileSurface::new(grid, Waypoints::from_partial(&points).unwrap());
///
/// let repaired = repair_tile(surface, &RepairParams::default()).unwrap();
/// assert!(repaired.log.is_empty());
/// ```
pub fn repair_tile(surface: TileSurface, params: &RepairParams) -> RepairResult<RepairedTile> {
    params.validate()?;

    let TileSurface {
        mut grid,
        mut waypoints,
    } = surface;
    let extent = (grid.length(), grid.width());
    let mut log = RepairLog::new();

    normalize_units(&mut waypoints, extent, grid.horizontal_scale(), &mut log);
    clamp_depth(&mut grid, params.depth_floor_m, &mut log);
    repair_waypoints(&mut waypoints, extent, params, &mut log)?;
    clamp_waypoints(&mut waypoints, extent, params, &mut log);

    let spawn_rows = grid.cells_for(params.spawn_flat_length_m).min(grid.rows());
    flatten_spawn(&mut grid, spawn_rows, &mut log);

    if params.repair_obstacles {
        repair_obstacles(&mut grid, params, spawn_rows, &mut log);
    }

    for action in &log {
        warn!(%action, "Tile repaired");
    }
    debug!(actions = log.len(), "Repair pass complete");

    Ok(RepairedTile {
        surface: TileSurface::new(grid, waypoints),
        log,
    })
}

fn clamp_depth(grid: &mut HeightGrid, floor_m: f64, log: &mut RepairLog) {
    let floor = grid.to_units(floor_m);
    let mut cells = 0;
    for v in grid.samples_mut() {
        if *v < floor {
            *v = floor;
            cells += 1;
        }
    }
    if cells > 0 {
        log.push(RepairAction::DepthClamped { cells });
    }
}

fn flatten_spawn(grid: &mut HeightGrid, spawn_rows: usize, log: &mut RepairLog) {
    if spawn_rows == 0 {
        return;
    }
    let strip = CellBounds::new(
        CellIndex::new(0, 0),
        CellIndex::new(spawn_rows - 1, grid.cols() - 1),
    );
    let cells = strip.iter().filter(|&c| grid.get(c) != Some(0)).count();
    if cells > 0 {
        grid.fill(strip, 0);
        log.push(RepairAction::SpawnFlattened { cells });
    }
}
