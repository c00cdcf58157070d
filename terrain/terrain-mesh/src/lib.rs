//! Height grid to triangle mesh conversion.
//!
//! Two strategies turn a [`HeightGrid`](terrain_types::HeightGrid) into a
//! [`TerrainMesh`]:
//!
//! - **Grid**: one vertex per sample, two triangles per cell. Steps steeper
//!   than a slope threshold are turned into vertical cliff faces by pulling the
//!   lower vertex under the higher one, and the affected cells are reported in
//!   an [`EdgeMask`].
//! - **Adaptive**: a right-triangulated irregular network (RTIN) that only
//!   refines where the surface deviates from a plane by more than a vertical
//!   error bound, optionally followed by quadric error metric simplification.
//!
//! Both place vertices at `(row * hs, col * hs, elevation)` and wind triangles
//! counter-clockwise seen from +Z.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use terrain_types::{CellBounds, CellIndex, HeightGrid};
//! use terrain_mesh::{AdaptiveParams, MeshMethod, MeshStrategy};
//!
//! let mut grid = HeightGrid::new(33, 17, 0.1, 0.005).unwrap();
//! grid.fill(CellBounds::new(CellIndex::new(10, 0), CellIndex::new(14, 16)), 40);
//!
//! let grid_mesh = MeshMethod::default().build(&grid).unwrap();
//! let adaptive = MeshMethod::Adaptive(AdaptiveParams::default()).build(&grid).unwrap();
//! assert!(adaptive.triangle_count() < grid_mesh.triangle_count());
//! println!("{}", adaptive.stats());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod adaptive;
mod edge_mask;
mod error;
mod grid;
mod mesh;
mod params;
mod quadric;
mod result;
mod simplify;
mod strategy;

// Re-export main types and functions
pub use adaptive::{AdaptiveMesher, adaptive_mesh};
pub use edge_mask::EdgeMask;
pub use error::{MeshError, MeshResult};
pub use grid::{GridMesher, grid_to_mesh};
pub use mesh::{MeshStats, TerrainMesh};
pub use params::{AdaptiveParams, GridMeshParams, SimplifyParams};
pub use result::SimplifyResult;
pub use simplify::simplify_mesh;
pub use strategy::{MeshMethod, MeshStrategy};
