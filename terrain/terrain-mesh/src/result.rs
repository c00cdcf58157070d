//! Result of mesh simplification.

// Triangle counts don't overflow in practice
#![allow(clippy::cast_precision_loss)]

use std::fmt;

use crate::mesh::TerrainMesh;

/// Result of [`simplify_mesh`](crate::simplify_mesh).
#[derive(Debug, Clone)]
pub struct SimplifyResult {
    /// The simplified mesh. Simplification drops any edge mask.
    pub mesh: TerrainMesh,

    /// Number of triangles in the input mesh.
    pub original_triangles: usize,

    /// Number of triangles in the simplified mesh.
    pub final_triangles: usize,

    /// Number of edge collapses performed.
    pub collapses_performed: usize,

    /// Number of edge collapses rejected (topology, error bound, or flipped faces).
    pub collapses_rejected: usize,
}

impl SimplifyResult {
    /// Final over original triangle count.
    #[must_use]
    pub fn reduction_ratio(&self) -> f64 {
        if self.original_triangles == 0 {
            1.0
        } else {
            self.final_triangles as f64 / self.original_triangles as f64
        }
    }

    /// Percentage of triangles removed.
    #[must_use]
    pub fn reduction_percent(&self) -> f64 {
        (1.0 - self.reduction_ratio()) * 100.0
    }

    /// Whether any collapse happened.
    #[must_use]
    pub const fn was_simplified(&self) -> bool {
        self.collapses_performed > 0
    }
}

impl fmt::Display for SimplifyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Simplify: {} → {} triangles ({:.1}% reduction, {} collapses)",
            self.original_triangles,
            self.final_triangles,
            self.reduction_percent(),
            self.collapses_performed
        )
    }
}
