//! Parkour course assembly from pluggable tile generators.
//!
//! A course is a grid of tiles: rows run from easiest to hardest, columns
//! vary the obstacle pattern. Each tile goes through the same pipeline:
//!
//! 1. A seed derived from its difficulty and variation seeds a private RNG
//! 2. Its [`Generator`] is invoked in whichever convention it was registered
//!    with ([`invoke_generator`])
//! 3. The repair pass sanitizes the output
//! 4. The feasibility check proves a path through its waypoints
//! 5. A wall is raised around its edges
//!
//! Tiles are built in parallel with rayon and pasted into one border-padded
//! [`HeightGrid`](terrain_types::HeightGrid). The first failing tile aborts the
//! whole course. A roughness overlay and per-tile spawn origins finish the
//! [`TerrainGrid`], which can then be meshed with any
//! [`MeshStrategy`](terrain_mesh::MeshStrategy).
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - Training pipelines
//! - Offline course baking tools
//! - Physics host bindings
//!
//! # Example
//!
//! ```
//! use terrain_course::{CourseParams, GeneratorRegistry, assemble_course};
//! use terrain_mesh::GridMesher;
//!
//! let registry = GeneratorRegistry::with_reference_generators();
//! let params = CourseParams::small().with_generators(["stairs_or_gaps", "hurdles"]);
//!
//! let course = assemble_course(params, &registry).unwrap();
//! let goals = course.goals(1, 2).unwrap();
//! assert!(goals[0].x > 8.0);
//!
//! let mesh = course.to_mesh(&GridMesher::default()).unwrap();
//! assert!(!mesh.is_empty());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod adapter;
mod assemble;
pub mod builtin;
mod curriculum;
mod error;
mod generator;
mod params;
mod pipeline;
mod registry;
mod roughness;
mod terrain_grid;

// Re-export main types and functions
pub use adapter::{GeneratedTile, invoke_generator};
pub use assemble::{CourseAssembler, assemble_course};
pub use curriculum::{difficulty_for, tile_seed, variation_for};
pub use error::{CourseError, CourseResult};
pub use generator::{Generator, PureOutput, PureRequest, TileCanvas, TileRng};
pub use params::{CourseParams, OriginHeight, RoughnessParams};
pub use pipeline::Tile;
pub use registry::GeneratorRegistry;
pub use terrain_grid::TerrainGrid;
