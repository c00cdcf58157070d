//! Direct grid triangulation with cliff detection.

// Grid dimensions are bounded by the u32 check below
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use nalgebra::Point3;
use rayon::prelude::*;
use terrain_types::{CellIndex, HeightGrid};
use tracing::debug;

use crate::edge_mask::EdgeMask;
use crate::error::{MeshError, MeshResult};
use crate::mesh::TerrainMesh;
use crate::params::GridMeshParams;

// Row count above which vertices are built in parallel
const PARALLEL_ROWS: usize = 256;

/// Horizontal cliff displacement of one vertex, in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Moves {
    x: i8,
    y: i8,
    corner: i8,
}

impl Moves {
    const fn is_moved(self) -> bool {
        self.x != 0 || self.y != 0 || self.corner != 0
    }

    /// Displacement applied to the vertex. The diagonal move only applies on
    /// axes with no straight move.
    fn offset(self) -> (f64, f64) {
        let dx = if self.x == 0 { self.corner } else { self.x };
        let dy = if self.y == 0 { self.corner } else { self.y };
        (f64::from(dx), f64::from(dy))
    }
}

/// Triangulates every grid cell into two triangles.
///
/// One vertex per sample at `(row * hs, col * hs, sample * vs)`. With a slope
/// threshold, the lower vertex of every step steeper than the threshold is
/// pulled one cell toward the higher sample, so the step renders as a
/// vertical wall; the moved vertices form the edge mask. Elevations are never
/// changed.
///
/// # Errors
///
/// Returns an error if the grid has fewer than two rows or columns, more
/// samples than `u32` indices address, or the parameters are invalid.
///
/// # Example
///
/// ```
/// use terrain_types::{CellBounds, CellIndex, HeightGrid};
/// use terrain_mesh::{GridMeshParams, grid_to_mesh};
///
/// let mut grid = HeightGrid::new(10, 10, 0.1, 0.01).unwrap();
/// grid.fill(CellBounds::new(CellIndex::new(5, 0), CellIndex::new(9, 9)), 50);
///
/// let mesh = grid_to_mesh(&grid, &GridMeshParams::default()).unwrap();
/// assert_eq!(mesh.triangle_count(), 2 * 9 * 9);
/// assert_eq!(mesh.edge_mask.unwrap().count(), 10);
/// ```
pub fn grid_to_mesh(grid: &HeightGrid, params: &GridMeshParams) -> MeshResult<TerrainMesh> {
    params.validate()?;
    let rows = grid.rows();
    let cols = grid.cols();
    if rows < 2 || cols < 2 {
        return Err(MeshError::GridTooSmall { rows, cols });
    }
    if u32::try_from(rows * cols).is_err() {
        return Err(MeshError::GridTooLarge(rows * cols));
    }

    let moves = params
        .slope_threshold
        .map(|slope| detect_cliffs(grid, slope * grid.horizontal_scale() / grid.vertical_scale()));

    let hs = grid.horizontal_scale();
    let vs = grid.vertical_scale();
    let vertex = |i: usize| {
        let (row, col) = (i / cols, i % cols);
        let (dx, dy) = moves.as_ref().map_or((0.0, 0.0), |m| m[i].offset());
        Point3::new(
            (row as f64 + dx) * hs,
            (col as f64 + dy) * hs,
            f64::from(grid.samples()[i]) * vs,
        )
    };
    let vertices: Vec<_> = if rows > PARALLEL_ROWS {
        (0..rows * cols).into_par_iter().map(vertex).collect()
    } else {
        (0..rows * cols).map(vertex).collect()
    };

    let mut triangles = Vec::with_capacity(2 * (rows - 1) * (cols - 1));
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let ind0 = (i * cols + j) as u32;
            let ind1 = ind0 + 1;
            let ind2 = ind0 + cols as u32;
            let ind3 = ind2 + 1;
            triangles.push([ind0, ind3, ind1]);
            triangles.push([ind0, ind2, ind3]);
        }
    }

    let edge_mask = moves.map(|moves| {
        let mut mask = EdgeMask::new(rows, cols);
        for (i, _) in moves.iter().enumerate().filter(|(_, m)| m.is_moved()) {
            mask.set(CellIndex::new(i / cols, i % cols));
        }
        mask.dilate(params.edge_margin_cells)
    });

    debug!(
        vertices = vertices.len(),
        triangles = triangles.len(),
        edge_cells = edge_mask.as_ref().map_or(0, EdgeMask::count),
        "Grid mesh built"
    );

    Ok(TerrainMesh {
        vertices,
        triangles,
        edge_mask,
    })
}

/// Marks, per vertex, the direction toward any neighbor more than
/// `threshold` units higher.
fn detect_cliffs(grid: &HeightGrid, threshold: f64) -> Vec<Moves> {
    let rows = grid.rows();
    let cols = grid.cols();
    let h = |r: usize, c: usize| f64::from(grid.samples()[r * cols + c]);
    let mut moves = vec![Moves::default(); rows * cols];

    for r in 0..rows {
        for c in 0..cols {
            let here = h(r, c);
            let m = &mut moves[r * cols + c];
            if r + 1 < rows && h(r + 1, c) - here > threshold {
                m.x += 1;
            }
            if r > 0 && h(r - 1, c) - here > threshold {
                m.x -= 1;
            }
            if c + 1 < cols && h(r, c + 1) - here > threshold {
                m.y += 1;
            }
            if c > 0 && h(r, c - 1) - here > threshold {
                m.y -= 1;
            }
            if r + 1 < rows && c + 1 < cols && h(r + 1, c + 1) - here > threshold {
                m.corner += 1;
            }
            if r > 0 && c > 0 && h(r - 1, c - 1) - here > threshold {
                m.corner -= 1;
            }
        }
    }
    moves
}

/// Mesh strategy that triangulates the grid directly.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMesher {
    /// Triangulation parameters.
    pub params: GridMeshParams,
}

impl GridMesher {
    /// Creates a grid mesher.
    #[must_use]
    pub const fn new(params: GridMeshParams) -> Self {
        Self { params }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use terrain_types::CellBounds;

    fn step_grid() -> HeightGrid {
        let mut grid = HeightGrid::new(6, 4, 0.1, 0.01).unwrap();
        grid.fill(CellBounds::new(CellIndex::new(3, 0), CellIndex::new(5, 3)), 50);
        grid
    }

    #[test]
    fn test_counts_and_indices() {
        let grid = HeightGrid::new(3, 4, 0.5, 0.01).unwrap();
        let mesh = grid_to_mesh(&grid, &GridMeshParams::plain()).unwrap();
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.triangles[0], [0, 5, 1]);
        assert_eq!(mesh.triangles[1], [0, 4, 5]);
        assert!(mesh.validate().is_ok());
        assert!(mesh.edge_mask.is_none());
    }

    #[test]
    fn test_elevations_round_trip() {
        let grid = HeightGrid::from_samples(2, 3, 0.2, 0.005, vec![0, 10, -40, 7, 200, 3]).unwrap();
        let mesh = grid_to_mesh(&grid, &GridMeshParams::default()).unwrap();
        for (v, &s) in mesh.vertices.iter().zip(grid.samples()) {
            assert_relative_eq!(v.z, f64::from(s) * 0.005);
        }
    }

    #[test]
    fn test_winding_up() {
        let mesh = grid_to_mesh(&step_grid(), &GridMeshParams::plain()).unwrap();
        for t in 0..mesh.triangle_count() {
            assert!(mesh.triangle_normal(t).unwrap().z > 0.0);
        }
    }

    #[test]
    fn test_cliff_moves_lower_vertex() {
        let grid = step_grid();
        let mesh = grid_to_mesh(&grid, &GridMeshParams::default()).unwrap();
        // Row 2 sits at the foot of the step and is pulled under row 3. The
        // diagonal neighbor is higher too, and with no straight Y move the
        // corner move shifts it along Y as well.
        let foot = &mesh.vertices[2 * 4 + 1];
        assert_relative_eq!(foot.x, 0.3, epsilon = 1e-12);
        assert_relative_eq!(foot.y, 0.2, epsilon = 1e-12);
        assert_relative_eq!(foot.z, 0.0);
        // The last column has no diagonal neighbor
        let corner = &mesh.vertices[2 * 4 + 3];
        assert_relative_eq!(corner.y, 0.3, epsilon = 1e-12);
        // The top of the step stays put
        let top = &mesh.vertices[3 * 4 + 1];
        assert_relative_eq!(top.x, 0.3, epsilon = 1e-12);
        assert_relative_eq!(top.z, 0.5);

        let mask = mesh.edge_mask.unwrap();
        assert_eq!(mask.count(), 4);
        assert!(mask.is_set(CellIndex::new(2, 0)));
        assert!(!mask.is_set(CellIndex::new(3, 0)));
    }

    #[test]
    fn test_gentle_slope_not_a_cliff() {
        // 0.05 m rise over 0.1 m is slope 0.5
        let grid = HeightGrid::from_samples(2, 2, 0.1, 0.01, vec![0, 0, 5, 5]).unwrap();
        let mesh = grid_to_mesh(&grid, &GridMeshParams::default()).unwrap();
        assert_eq!(mesh.edge_mask.unwrap().count(), 0);
        assert_relative_eq!(mesh.vertices[0].x, 0.0);
    }

    #[test]
    fn test_edge_margin_dilates() {
        let params = GridMeshParams::default().with_edge_margin(1);
        let mesh = grid_to_mesh(&step_grid(), &params).unwrap();
        // Row 2 plus rows 1 and 3
        assert_eq!(mesh.edge_mask.unwrap().count(), 12);
    }

    #[test]
    fn test_too_small() {
        let grid = HeightGrid::new(1, 5, 0.1, 0.01).unwrap();
        assert!(matches!(
            grid_to_mesh(&grid, &GridMeshParams::default()),
            Err(MeshError::GridTooSmall { .. })
        ));
    }
}
