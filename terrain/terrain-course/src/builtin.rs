//! Reference generators, one or more per call convention.
//!
//! Each keeps its output traversable by construction for tiles at least 6 m
//! long: gaps stay narrower than a 1 m jump and every climb stays under 0.5 m.
//! Difficulty scales obstacle size.

// Counts are tiny
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use rand::Rng;
use terrain_types::{Point2, WAYPOINT_COUNT};

use crate::generator::{Generator, PureOutput, PureRequest, TileCanvas, TileRng};

// Obstacles start past the flattened spawn strip
const COURSE_START_M: f64 = 2.5;
const PIT_DEPTH_M: f64 = -1.0;
const HURDLE_THICKNESS_M: f64 = 0.4;
const STAIR_TREAD_M: f64 = 0.5;
const STAIR_COUNT: usize = 4;

/// Evenly spaced goals along the tile's center line, from just past the
/// spawn strip to 1 m before the far edge.
fn centerline_goals(length: f64, width: f64) -> Vec<Point2<f64>> {
    let (start, end) = (2.2, length - 1.0);
    let step = (end - start) / (WAYPOINT_COUNT - 1) as f64;
    (0..WAYPOINT_COUNT)
        .map(|i| Point2::new(start + step * i as f64, width / 2.0))
        .collect()
}

/// Flat ground with goals on the center line. Pure.
#[must_use]
pub fn flat() -> Generator {
    Generator::pure(|request: &PureRequest, _rng: &mut TileRng| {
        let mut out = PureOutput::flat(request);
        out.waypoints = centerline_goals(request.length_m, request.width_m);
        out
    })
}

/// A single full-width step up halfway along the tile, 0.1 m to 0.5 m high.
/// Pure.
#[must_use]
pub fn single_step() -> Generator {
    Generator::pure(|request: &PureRequest, _rng: &mut TileRng| {
        let mut out = PureOutput::flat(request);
        let height = 0.1 + 0.4 * request.difficulty;
        let first = out.rows / 2;
        for h in &mut out.heights_m[first * out.cols..] {
            *h = height;
        }
        out.waypoints = centerline_goals(request.length_m, request.width_m);
        out
    })
}

/// Pits across the full width, each followed by a slightly higher platform.
/// Difficulty only.
#[must_use]
pub fn gaps() -> Generator {
    Generator::difficulty_only(paint_gaps)
}

/// Full-width hurdles, 0.1 m to 0.4 m high. Difficulty only.
#[must_use]
pub fn hurdles() -> Generator {
    Generator::difficulty_only(paint_hurdles)
}

/// Stairs (index 0) for the first half of the variation range, gaps
/// (index 1) for the second.
#[must_use]
pub fn stairs_or_gaps() -> Generator {
    Generator::with_variation(
        |canvas: &mut TileCanvas, variation: f64, difficulty: f64, rng: &mut TileRng| {
            if variation < 0.5 {
                paint_stairs(canvas, difficulty);
                0
            } else {
                paint_gaps(canvas, difficulty, rng);
                1
            }
        },
    )
}

fn paint_gaps(canvas: &mut TileCanvas, difficulty: f64, rng: &mut TileRng) {
    let (length, width) = (canvas.length(), canvas.width());
    let count = ((length - COURSE_START_M) / 1.7).floor().clamp(1.0, 3.0) as usize;
    let segment = (length - COURSE_START_M - 0.5) / count as f64;
    let rise = 0.05 + 0.1 * difficulty;

    canvas.push_goal(2.2, width / 2.0);
    let mut x = COURSE_START_M;
    for k in 1..=count {
        let gap = (0.2 + 0.5 * difficulty + rng.gen_range(0.0..0.1)).min(segment / 2.0);
        canvas.fill_band(x + gap, length, k as f64 * rise);
        canvas.fill_band(x, x + gap, PIT_DEPTH_M);
        let platform_end = if k == count { length - 0.5 } else { x + segment };
        canvas.push_goal((x + gap + platform_end) / 2.0, width / 2.0);
        x += segment;
    }
}

fn paint_hurdles(canvas: &mut TileCanvas, difficulty: f64, rng: &mut TileRng) {
    let (length, width) = (canvas.length(), canvas.width());
    let height = 0.1 + 0.3 * difficulty;
    let spacing = (length - COURSE_START_M - 1.5) / 3.0;
    for k in 0..3 {
        let x = COURSE_START_M + 0.5 + spacing * k as f64 + rng.gen_range(-0.1..0.1);
        canvas.fill_band(x, x + HURDLE_THICKNESS_M, height);
    }
    canvas.waypoints = centerline_goals(length, width);
}

fn paint_stairs(canvas: &mut TileCanvas, difficulty: f64) {
    let (length, width) = (canvas.length(), canvas.width());
    let rise = 0.05 + 0.15 * difficulty;
    for k in 0..STAIR_COUNT {
        let x = COURSE_START_M + STAIR_TREAD_M * k as f64;
        canvas.fill_band(x, length, rise * (k + 1) as f64);
    }
    canvas.waypoints = centerline_goals(length, width);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use terrain_types::HeightGrid;

    fn canvas() -> TileCanvas {
        TileCanvas::new(HeightGrid::new(160, 80, 0.05, 0.005).unwrap())
    }

    fn rng() -> TileRng {
        TileRng::seed_from_u64(7)
    }

    #[test]
    fn test_centerline_goals() {
        let goals = centerline_goals(8.0, 4.0);
        assert_eq!(goals.len(), WAYPOINT_COUNT);
        assert_relative_eq!(goals[0].x, 2.2);
        assert_relative_eq!(goals[7].x, 7.0, epsilon = 1e-12);
        assert!(goals.iter().all(|g| (g.y - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_single_step_height() {
        let Generator::Pure(f) = single_step() else {
            panic!("single_step is pure");
        };
        let request = PureRequest {
            length_m: 8.0,
            width_m: 4.0,
            cell_size_m: 0.05,
            difficulty: 1.0,
        };
        let out = f(&request, &mut rng());
        assert_eq!(out.heights_m.len(), 160 * 80);
        assert_relative_eq!(out.heights_m[79 * 80], 0.0);
        assert_relative_eq!(out.heights_m[80 * 80], 0.5);
    }

    #[test]
    fn test_gaps_goals_on_platforms() {
        let mut c = canvas();
        paint_gaps(&mut c, 1.0, &mut rng());
        assert_eq!(c.waypoints.len(), 4);
        for goal in &c.waypoints {
            assert!(c.height_at(goal) >= 0.0);
        }
        assert_relative_eq!(c.grid.to_meters(c.grid.min_sample()), PIT_DEPTH_M);
        assert_relative_eq!(c.grid.to_meters(c.grid.max_sample()), 0.45, epsilon = 1e-9);
    }

    #[test]
    fn test_stairs_climb() {
        let mut c = canvas();
        paint_stairs(&mut c, 0.0);
        assert_relative_eq!(c.height_at(&Point2::new(2.0, 2.0)), 0.0);
        assert_relative_eq!(c.height_at(&Point2::new(2.6, 2.0)), 0.05, epsilon = 1e-9);
        assert_relative_eq!(c.height_at(&Point2::new(7.0, 2.0)), 0.2, epsilon = 1e-9);
    }

    #[test]
    fn test_hurdles_deterministic() {
        let mut a = canvas();
        let mut b = canvas();
        paint_hurdles(&mut a, 0.5, &mut rng());
        paint_hurdles(&mut b, 0.5, &mut rng());
        assert_eq!(a, b);
        assert_relative_eq!(a.grid.to_meters(a.grid.max_sample()), 0.25, epsilon = 1e-9);
    }
}
