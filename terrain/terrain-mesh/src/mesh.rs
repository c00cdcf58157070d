//! The terrain mesh produced by every strategy.

use std::fmt;

use nalgebra::{Point3, Vector3};

use crate::edge_mask::EdgeMask;
use crate::error::{MeshError, MeshResult};

/// An indexed triangle mesh of a terrain surface.
///
/// Triangles wind counter-clockwise seen from +Z.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainMesh {
    /// Vertex positions in meters.
    pub vertices: Vec<Point3<f64>>,
    /// Triangles as vertex index triples.
    pub triangles: Vec<[u32; 3]>,
    /// Cells next to a cliff, for strategies that detect them.
    pub edge_mask: Option<EdgeMask>,
}

impl TerrainMesh {
    /// Creates a mesh without an edge mask.
    #[must_use]
    pub const fn new(vertices: Vec<Point3<f64>>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
            edge_mask: None,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Checks that every index is in range and no triangle repeats a vertex.
    ///
    /// # Errors
    ///
    /// Returns the first [`MeshError::IndexOutOfRange`] or
    /// [`MeshError::DegenerateTriangle`] found.
    pub fn validate(&self) -> MeshResult<()> {
        let vertices = self.vertices.len();
        for (triangle, tri) in self.triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertices) {
                return Err(MeshError::IndexOutOfRange {
                    triangle,
                    index,
                    vertices,
                });
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return Err(MeshError::DegenerateTriangle(triangle));
            }
        }
        Ok(())
    }

    /// Shifts every vertex by `offset`.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Unnormalized normal of a triangle (twice its area in length).
    #[must_use]
    pub fn triangle_normal(&self, triangle: usize) -> Option<Vector3<f64>> {
        let [a, b, c] = *self.triangles.get(triangle)?;
        let a = self.vertices.get(a as usize)?;
        let b = self.vertices.get(b as usize)?;
        let c = self.vertices.get(c as usize)?;
        Some((b - a).cross(&(c - a)))
    }

    /// Summary statistics.
    #[must_use]
    pub fn stats(&self) -> MeshStats {
        let (min_z, max_z) = self
            .vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.z), hi.max(v.z))
            });
        MeshStats {
            vertices: self.vertices.len(),
            triangles: self.triangles.len(),
            edge_cells: self.edge_mask.as_ref().map_or(0, EdgeMask::count),
            min_z: if self.vertices.is_empty() { 0.0 } else { min_z },
            max_z: if self.vertices.is_empty() { 0.0 } else { max_z },
        }
    }
}

/// Summary of a [`TerrainMesh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStats {
    /// Number of vertices.
    pub vertices: usize,
    /// Number of triangles.
    pub triangles: usize,
    /// Number of cells in the edge mask, 0 without one.
    pub edge_cells: usize,
    /// Lowest vertex elevation.
    pub min_z: f64,
    /// Highest vertex elevation.
    pub max_z: f64,
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mesh: {} vertices, {} triangles, {} edge cells, z in [{:.3}, {:.3}] m",
            self.vertices, self.triangles, self.edge_cells, self.min_z, self.max_z
        )
    }
}
