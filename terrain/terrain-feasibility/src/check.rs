//! Path feasibility check.

use terrain_types::{HeightGrid, Point2, Waypoints};
use tracing::debug;

use crate::error::{FeasibilityError, FeasibilityResult};
use crate::params::FeasibilityParams;
use crate::profile::{jump_reduce, max_step, sample_profile};
use crate::result::FeasibilityReport;

// Guards the meter comparisons against quantization noise
const SCORE_TOLERANCE: f64 = 1e-9;

/// Worst jump-reduced step along the path `spawn -> waypoints[0] -> ... -> waypoints[7]`,
/// in elevation units.
///
/// Points are mapped to cells by flooring and clamping into the grid. Each
/// segment is rasterized, sampled, and reduced with a window of
/// `skip_window_m` rounded to whole cells.
#[must_use]
pub fn feasibility_score(
    grid: &HeightGrid,
    spawn: &Point2<f64>,
    waypoints: &Waypoints,
    skip_window_m: f64,
) -> i32 {
    let window = grid.cells_for(skip_window_m);
    let path: Vec<_> = std::iter::once(spawn)
        .chain(waypoints.iter())
        .map(|p| grid.cell_at_clamped(p))
        .collect();

    path.windows(2)
        .map(|segment| {
            let profile = sample_profile(grid, segment[0], segment[1]);
            max_step(&jump_reduce(&profile, window))
        })
        .max()
        .unwrap_or(0)
}

/// Proves a tile is traversable from `spawn` through every waypoint.
///
/// # Errors
///
/// - [`FeasibilityError::HeightCeilingExceeded`] if any cell is above `max_height_m`
/// - [`FeasibilityError::ScoreTooHigh`] if the score exceeds `max_score_m`
/// - [`FeasibilityError::FlatTerrain`] if the score is zero and flat paths are not allowed
/// - [`FeasibilityError::InvalidParams`] for unusable parameters
///
/// # Example
///
/// ```
/// use terrain_types::{CellBounds, CellIndex, HeightGrid, Point2, Waypoints};
/// use terrain_feasibility::{FeasibilityParams, check_feasibility};
///
/// // 10 m tile with a 0.3 m step at x = 5 m
/// let mut grid = HeightGrid::new(100, 40, 0.1, 0.005).unwrap();
/// grid.fill(CellBounds::new(CellIndex::new(50, 0), CellIndex::new(99, 39)), 60);
///
/// let points: Vec<_> = (0..8).map(|i| Point2::new(2.0 + f64::from(i), 2.0)).collect();
/// let waypoints = Waypoints::from_partial(&points).unwrap();
///
/// let report = check_feasibility(&grid, &Point2::new(1.0, 2.0), &waypoints, &FeasibilityParams::default())
///     .unwrap();
/// assert_eq!(report.score_units, 60);
/// ```
pub fn check_feasibility(
    grid: &HeightGrid,
    spawn: &Point2<f64>,
    waypoints: &Waypoints,
    params: &FeasibilityParams,
) -> FeasibilityResult<FeasibilityReport> {
    params.validate()?;

    let max_height_m = grid.to_meters(grid.max_sample());
    if max_height_m > params.max_height_m + SCORE_TOLERANCE {
        return Err(FeasibilityError::HeightCeilingExceeded {
            height_m: max_height_m,
            bound_m: params.max_height_m,
        });
    }

    let score_units = feasibility_score(grid, spawn, waypoints, params.skip_window_m);
    let score_m = f64::from(score_units) * grid.vertical_scale();
    debug!(score_units, score_m, max_height_m, "Feasibility score");

    if score_m > params.max_score_m + SCORE_TOLERANCE {
        return Err(FeasibilityError::ScoreTooHigh {
            score_m,
            bound_m: params.max_score_m,
        });
    }
    if score_units == 0 && !params.allow_flat {
        return Err(FeasibilityError::FlatTerrain { score_m });
    }

    Ok(FeasibilityReport {
        score_units,
        score_m,
        max_height_m,
        segments: waypoints.as_slice().len(),
    })
}
