//! Path feasibility checking for terrain tiles.
//!
//! A tile is only useful for training if the robot can actually get from the
//! spawn through every waypoint. This crate rasterizes the straight path
//! between consecutive goals, samples the elevation profile, and reduces it
//! the way a jumping robot would move: gaps narrower than the jump window are
//! cleared, walls are climbed. The worst remaining step is the feasibility
//! score.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use terrain_types::{HeightGrid, Point2, Waypoints};
//! use terrain_feasibility::{FeasibilityError, FeasibilityParams, check_feasibility};
//!
//! let grid = HeightGrid::new(200, 80, 0.05, 0.005).unwrap();
//! let points: Vec<_> = (0..8).map(|i| Point2::new(2.0 + f64::from(i), 2.0)).collect();
//! let waypoints = Waypoints::from_partial(&points).unwrap();
//!
//! // A perfectly flat tile teaches nothing
//! let result = check_feasibility(&grid, &Point2::new(1.0, 2.0), &waypoints, &FeasibilityParams::default());
//! assert!(matches!(result, Err(FeasibilityError::FlatTerrain { .. })));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod check;
mod error;
mod line;
mod params;
mod profile;
mod result;

pub use check::{check_feasibility, feasibility_score};
pub use error::{FeasibilityError, FeasibilityResult};
pub use line::CellLine;
pub use params::FeasibilityParams;
pub use profile::{jump_reduce, max_step, sample_profile};
pub use result::FeasibilityReport;
