//! Pluggable mesh strategies.

use terrain_types::HeightGrid;

use crate::adaptive::{AdaptiveMesher, adaptive_mesh};
use crate::error::MeshResult;
use crate::grid::{GridMesher, grid_to_mesh};
use crate::mesh::TerrainMesh;
use crate::params::{AdaptiveParams, GridMeshParams};

/// Converts a height grid into a triangle mesh.
///
/// Implementations must wind triangles counter-clockwise seen from +Z and
/// place vertices at `(row * hs, col * hs, elevation)`.
pub trait MeshStrategy {
    /// Builds the mesh of `grid`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid cannot be triangulated.
    fn build(&self, grid: &HeightGrid) -> MeshResult<TerrainMesh>;
}

impl MeshStrategy for GridMesher {
    fn build(&self, grid: &HeightGrid) -> MeshResult<TerrainMesh> {
        grid_to_mesh(grid, &self.params)
    }
}

impl MeshStrategy for AdaptiveMesher {
    fn build(&self, grid: &HeightGrid) -> MeshResult<TerrainMesh> {
        adaptive_mesh(grid, &self.params)
    }
}

/// Strategy selection by value, for configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeshMethod {
    /// Direct grid triangulation.
    Grid(GridMeshParams),
    /// Adaptive triangulation.
    Adaptive(AdaptiveParams),
}

impl Default for MeshMethod {
    fn default() -> Self {
        Self::Grid(GridMeshParams::default())
    }
}

impl MeshStrategy for MeshMethod {
    fn build(&self, grid: &HeightGrid) -> MeshResult<TerrainMesh> {
        match self {
            Self::Grid(params) => grid_to_mesh(grid, params),
            Self::Adaptive(params) => adaptive_mesh(grid, params),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn build_with(strategy: &dyn MeshStrategy, grid: &HeightGrid) -> TerrainMesh {
        strategy.build(grid).unwrap()
    }

    #[test]
    fn test_strategies_agree_on_outline() {
        let grid = HeightGrid::new(9, 9, 0.25, 0.01).unwrap();
        let grid_mesh = build_with(&GridMesher::default(), &grid);
        let adaptive = build_with(&AdaptiveMesher::default(), &grid);
        assert_eq!(grid_mesh.triangle_count(), 128);
        assert_eq!(adaptive.triangle_count(), 2);
        let extent = |m: &TerrainMesh| m.vertices.iter().map(|v| v.x).fold(0.0, f64::max);
        assert!((extent(&grid_mesh) - extent(&adaptive)).abs() < 1e-12);
    }

    #[test]
    fn test_method_dispatch() {
        let grid = HeightGrid::new(5, 5, 0.1, 0.01).unwrap();
        let method = MeshMethod::default();
        assert!(method.build(&grid).unwrap().edge_mask.is_some());
        let method = MeshMethod::Adaptive(AdaptiveParams::default());
        assert!(method.build(&grid).unwrap().edge_mask.is_none());
    }
}
