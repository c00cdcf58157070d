//! Error types for mesh conversion.

use thiserror::Error;

/// Errors that can occur while building or validating a terrain mesh.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeshError {
    /// The grid needs at least two rows and two columns to span a surface.
    #[error("grid of {rows}x{cols} samples is too small to triangulate")]
    GridTooSmall {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// The grid has more samples than a `u32` index can address.
    #[error("grid of {0} samples exceeds the u32 index range")]
    GridTooLarge(usize),

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertices} vertices")]
    IndexOutOfRange {
        /// Offending triangle.
        triangle: usize,
        /// Out-of-range vertex index.
        index: u32,
        /// Number of vertices.
        vertices: usize,
    },

    /// A triangle repeats a vertex.
    #[error("triangle {0} is degenerate")]
    DegenerateTriangle(usize),

    /// The mesh parameters are unusable.
    #[error("invalid mesh parameters: {0}")]
    InvalidParams(String),
}

/// Result type for mesh operations.
pub type MeshResult<T> = std::result::Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::GridTooSmall { rows: 1, cols: 5 };
        assert_eq!(format!("{err}"), "grid of 1x5 samples is too small to triangulate");

        let err = MeshError::IndexOutOfRange {
            triangle: 3,
            index: 99,
            vertices: 10,
        };
        assert!(format!("{err}").contains("vertex 99"));
    }
}
