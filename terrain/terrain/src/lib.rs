//! Procedural parkour terrain for legged-robot training.
//!
//! This umbrella crate re-exports all terrain-* crates, providing a unified
//! API from tile generation to the collision mesh. All crates are Layer 0
//! (zero Bevy dependencies) and can be used in training pipelines, offline
//! baking tools, or physics host bindings.
//!
//! # Quick Start
//!
//! ```
//! use terrain::prelude::*;
//!
//! // Rows get harder, columns alternate stairs and gaps
//! let registry = GeneratorRegistry::with_reference_generators();
//! let params = CourseParams::small().with_seed(7);
//! let course = assemble_course(params, &registry).unwrap();
//!
//! // Spawn and goals of the hardest, last tile
//! let origin = course.origin(1, 2).unwrap();
//! let goals = course.goals(1, 2).unwrap();
//! assert!(goals[7].x > origin.x);
//!
//! // Collision mesh for the physics host
//! let mesh = course
//!     .to_mesh(&MeshMethod::Adaptive(AdaptiveParams::default()))
//!     .unwrap();
//! println!("{}", mesh.stats());
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - `HeightGrid`, cell addressing, tile geometry and waypoints
//! - [`repair`] - Sanitizes generator output: waypoints, depth, spawn strip, obstacles
//! - [`feasibility`] - Jump-aware traversability check along the waypoint path
//! - [`mesh`] - Grid and adaptive triangulation, QEM simplification
//! - [`course`] - Generators, per-tile pipeline, course assembly
//!
//! # Feature Flags
//!
//! - `serde` - `Serialize`/`Deserialize` on params, grids, meshes and courses

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Height grid, cells, tile geometry and waypoints.
pub use terrain_types as types;

/// Tile repair pass.
pub use terrain_repair as repair;

/// Path feasibility check.
pub use terrain_feasibility as feasibility;

/// Height grid to mesh conversion.
pub use terrain_mesh as mesh;

/// Generators and course assembly.
pub use terrain_course as course;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for course building.
///
/// # Usage
///
/// ```
/// use terrain::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use terrain_types::{CellIndex, HeightGrid, Point2, Point3, TileGeometry, TileSurface, Waypoints};

    // Per-tile stages
    pub use terrain_feasibility::{FeasibilityParams, FeasibilityReport, check_feasibility};
    pub use terrain_repair::{RepairParams, repair_tile};

    // Meshing
    pub use terrain_mesh::{
        AdaptiveParams, GridMeshParams, MeshMethod, MeshStrategy, SimplifyParams, TerrainMesh,
    };

    // Course assembly (main use case)
    pub use terrain_course::{
        CourseAssembler, CourseError, CourseParams, Generator, GeneratorRegistry, TerrainGrid,
        assemble_course,
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use prelude::*;

        let params = CourseParams::default();
        assert_eq!(params.tile_count(), 200);
        let grid = HeightGrid::new(2, 2, 0.1, 0.01).unwrap_or_else(|e| panic!("{e}"));
        assert!(MeshMethod::default().build(&grid).is_ok());
    }

    #[test]
    fn test_module_reexports() {
        let _ = repair::RepairParams::default();
        let _ = feasibility::FeasibilityParams::default();
        let _ = mesh::GridMeshParams::default();
        let _ = course::GeneratorRegistry::new();
        assert_eq!(types::WAYPOINT_COUNT, 8);
    }
}
