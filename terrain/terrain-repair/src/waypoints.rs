//! Waypoint normalization, repair, and clamping.

use terrain_types::{Point2, WAYPOINT_COUNT, Waypoints};

use crate::error::{RepairError, RepairResult};
use crate::params::RepairParams;
use crate::result::{RepairAction, RepairLog};

/// Rescales waypoints given in grid cells to meters.
///
/// Any coordinate beyond the tile extent means the whole list is in cells.
pub(crate) fn normalize_units(
    waypoints: &mut Waypoints,
    extent: (f64, f64),
    horizontal_scale: f64,
    log: &mut RepairLog,
) {
    let (length, width) = extent;
    if waypoints.iter().any(|p| p.x > length || p.y > width) {
        for p in waypoints.iter_mut() {
            *p = Point2::new(p.x * horizontal_scale, p.y * horizontal_scale);
        }
        log.push(RepairAction::WaypointsRescaled {
            factor: horizontal_scale,
        });
    }
}

fn is_inside(p: &Point2<f64>, (length, width): (f64, f64)) -> bool {
    p.x > 0.0 && p.x < length && p.y > 0.0 && p.y < width
}

/// Copies valid neighbors into invalid waypoints, forward then backward.
///
/// # Errors
///
/// Fails if more than `max_repaired_fraction` of the waypoints were copied,
/// or if one remains outside the tile.
pub(crate) fn repair_waypoints(
    waypoints: &mut Waypoints,
    extent: (f64, f64),
    params: &RepairParams,
    log: &mut RepairLog,
) -> RepairResult<()> {
    let mut repaired = [false; WAYPOINT_COUNT];

    for i in 1..WAYPOINT_COUNT {
        if !is_inside(&waypoints[i], extent) && is_inside(&waypoints[i - 1], extent) {
            waypoints[i] = waypoints[i - 1];
            repaired[i] = true;
            log.push(RepairAction::WaypointCopied { index: i, from: i - 1 });
        }
    }
    for i in (0..WAYPOINT_COUNT - 1).rev() {
        if !is_inside(&waypoints[i], extent) && is_inside(&waypoints[i + 1], extent) {
            waypoints[i] = waypoints[i + 1];
            repaired[i] = true;
            log.push(RepairAction::WaypointCopied { index: i, from: i + 1 });
        }
    }

    let count = repaired.iter().filter(|&&r| r).count();
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let allowed = (params.max_repaired_fraction * WAYPOINT_COUNT as f64).floor() as usize;
    if count > allowed {
        return Err(RepairError::TooManyRepairs {
            repaired: count,
            total: WAYPOINT_COUNT,
            allowed,
            log: log.clone(),
        });
    }

    if let Some((index, point)) = waypoints
        .iter()
        .enumerate()
        .find(|(_, p)| !is_inside(p, extent))
    {
        return Err(RepairError::InvalidWaypoint {
            index,
            point: *point,
            log: log.clone(),
        });
    }
    Ok(())
}

/// Pulls waypoints inside the edge margin and past the spawn clearance.
///
/// Bounds are inclusive: a goal exactly `edge_margin_m` from an edge is kept.
pub(crate) fn clamp_waypoints(
    waypoints: &mut Waypoints,
    (length, width): (f64, f64),
    params: &RepairParams,
    log: &mut RepairLog,
) {
    let x_lo = params.edge_margin_m.max(params.min_goal_x_m);
    let x_hi = length - params.edge_margin_m;
    let y_lo = params.edge_margin_m;
    let y_hi = width - params.edge_margin_m;

    for (index, p) in waypoints.iter_mut().enumerate() {
        // max then min, so an undersized tile settles on the far bound
        let clamped = Point2::new(p.x.max(x_lo).min(x_hi), p.y.max(y_lo).min(y_hi));
        if clamped != *p {
            *p = clamped;
            log.push(RepairAction::WaypointClamped { index });
        }
    }
}
