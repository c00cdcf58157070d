//! Repair pass for freshly generated terrain tiles.
//!
//! Generators are written quickly and make the same mistakes over and over:
//! waypoints in cells instead of meters, goals off the edge of the tile,
//! bottomless pits, and obstacles too thin for the robot to land on. This
//! crate fixes those mistakes and reports what it changed.
//!
//! # Features
//!
//! - **Unit normalization**: waypoints in grid cells are rescaled to meters
//! - **Depth clamp**: pits are floored at a configurable depth
//! - **Waypoint repair**: out-of-tile goals copy a valid neighbor
//! - **Spawn clearance**: goals are kept off the edges and the spawn strip is flattened
//! - **Obstacle repair**: connected-component analysis erases specks and widens slivers
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use terrain_types::{CellBounds, CellIndex, HeightGrid, Point2, TileSurface, Waypoints};
//! use terrain_repair::{RepairParams, repair_tile};
//!
//! // 10 m x 4 m tile with a 0.3 m x 0.3 m speck at x = 5 m
//! let mut grid = HeightGrid::new(200, 80, 0.05, 0.005).unwrap();
//! grid.fill(CellBounds::new(CellIndex::new(100, 40), CellIndex::new(105, 45)), 60);
//!
//! let points: Vec<_> = (0..8).map(|i| Point2::new(2.0 + f64::from(i), 2.0)).collect();
//! let surface = TileSurface::new(grid, Waypoints::from_partial(&points).unwrap());
//!
//! let repaired = repair_tile(surface, &RepairParams::default()).unwrap();
//! assert_eq!(repaired.log.obstacles_erased(), 1);
//! println!("{}", repaired.log);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod obstacles;
mod params;
mod repair;
mod result;
mod waypoints;

pub use error::{RepairError, RepairResult};
pub use obstacles::{Obstacle, find_obstacles};
pub use params::RepairParams;
pub use repair::{RepairedTile, repair_tile};
pub use result::{RepairAction, RepairLog};
