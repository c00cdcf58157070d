//! Core types for parkour terrain synthesis.
//!
//! This crate provides the data model shared by every stage of the terrain
//! pipeline:
//!
//! - [`HeightGrid`] - Quantized 2D elevation samples with explicit unit scales
//! - [`CellIndex`] and [`CellBounds`] - Discrete grid addressing
//! - [`TileGeometry`] - Physical extent and resolution of one course tile
//! - [`Waypoints`] - The fixed-size ordered goal list of a tile
//! - [`TileSurface`] - A height grid paired with its waypoints
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - Training pipelines
//! - Offline course baking tools
//! - Physics host bindings
//!
//! # Coordinate Systems
//!
//! Rows run along the tile's **length** (world X, the direction of travel) and
//! columns along its **width** (world Y). Elevation is world Z.
//!
//! - World coordinates are continuous `f64` meters.
//! - Grid coordinates are discrete `usize` row/column indices.
//! - Elevations are stored as quantized `i16` units; meters = `units * vertical_scale`.
//!
//! # Example
//!
//! ```
//! use terrain_types::{HeightGrid, CellIndex};
//!
//! // A 4 m x 2 m tile at 5 cm resolution, 5 mm elevation quantum
//! let mut grid = HeightGrid::new(80, 40, 0.05, 0.005).unwrap();
//!
//! grid.set_meters(CellIndex::new(10, 20), 0.25);
//! assert_eq!(grid.get(CellIndex::new(10, 20)), Some(50));
//! assert!((grid.length() - 4.0).abs() < 1e-9);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cell;
mod error;
mod grid;
mod tile;

pub use cell::{CellBounds, CellIndex};
pub use error::{TerrainTypesError, TerrainTypesResult};
pub use grid::HeightGrid;
pub use tile::{TileGeometry, TileSurface, WAYPOINT_COUNT, Waypoints};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};
