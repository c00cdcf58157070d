//! Adaptive triangulation with a right-triangulated irregular network (RTIN).
//!
//! The grid is embedded in a virtual square of `2^k + 1` samples, padded by
//! repeating the last row and column. Every right isosceles triangle of the
//! implicit binary tree gets the vertical error of its hypotenuse midpoint,
//! propagated up from its children so that neighboring triangles always agree
//! on a split and the result has no T-junctions. Triangles straddling the real
//! grid border are always split, which keeps the padding out of the result.

// Grid dimensions are bounded by the u32 check below
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use nalgebra::Point3;
use terrain_types::HeightGrid;
use tracing::{debug, info};

use crate::error::{MeshError, MeshResult};
use crate::mesh::TerrainMesh;
use crate::params::AdaptiveParams;
use crate::simplify::simplify_mesh;

const UNASSIGNED: u32 = u32::MAX;

/// Virtual square embedding of a grid.
struct Rtin<'a> {
    grid: &'a HeightGrid,
    /// Edge length of the virtual square in cells (a power of two).
    tile: usize,
    /// Samples per side of the virtual square, `tile + 1`.
    size: usize,
    /// Last real row and column index.
    max_row: usize,
    max_col: usize,
    /// Per-sample split error in meters.
    errors: Vec<f32>,
}

impl<'a> Rtin<'a> {
    fn new(grid: &'a HeightGrid) -> Self {
        let max_row = grid.rows() - 1;
        let max_col = grid.cols() - 1;
        let tile = max_row.max(max_col).next_power_of_two();
        let size = tile + 1;
        let mut rtin = Self {
            grid,
            tile,
            size,
            max_row,
            max_col,
            errors: vec![0.0; size * size],
        };
        rtin.compute_errors();
        rtin
    }

    /// Elevation in meters at a virtual sample, edge-replicated.
    fn height(&self, row: usize, col: usize) -> f64 {
        self.grid.to_meters(self.grid.get_clamped(row, col))
    }

    /// Corners `(a, b, c)` of triangle `id` in the implicit tree, as
    /// `(row, col)` pairs. `a`-`b` is the hypotenuse. Ids start at 2.
    fn corners(&self, mut id: usize) -> [(usize, usize); 3] {
        let t = self.tile;
        let (mut a, mut b, mut c) = if id & 1 == 1 {
            ((0, 0), (t, t), (t, 0))
        } else {
            ((t, t), (0, 0), (0, t))
        };
        id >>= 1;
        while id > 1 {
            let m = midpoint(a, b);
            if id & 1 == 1 {
                b = a;
                a = c;
            } else {
                a = b;
                b = c;
            }
            c = m;
            id >>= 1;
        }
        [a, b, c]
    }

    fn straddles_border(&self, pts: [(usize, usize); 3]) -> bool {
        let (r_lo, r_hi) = min_max(pts.map(|p| p.0));
        let (c_lo, c_hi) = min_max(pts.map(|p| p.1));
        (r_lo < self.max_row && r_hi > self.max_row) || (c_lo < self.max_col && c_hi > self.max_col)
    }

    /// Bottom-up error pass over every triangle, finest level first.
    fn compute_errors(&mut self) {
        // A single cell is the two root triangles, which never split
        if self.tile < 2 {
            return;
        }
        let cells = self.tile * self.tile;
        let triangles = cells * 2 - 2;
        let parents = triangles - cells;

        for i in (0..triangles).rev() {
            let [a, b, c] = self.corners(i + 2);
            let m = midpoint(a, b);

            let interpolated = (self.height(a.0, a.1) + self.height(b.0, b.1)) / 2.0;
            let middle = m.0 * self.size + m.1;
            let mut error = if self.straddles_border([a, b, c]) {
                f32::INFINITY
            } else {
                (interpolated - self.height(m.0, m.1)).abs() as f32
            };
            error = error.max(self.errors[middle]);

            if i < parents {
                let left = midpoint(a, c);
                let right = midpoint(b, c);
                error = error
                    .max(self.errors[left.0 * self.size + left.1])
                    .max(self.errors[right.0 * self.size + right.1]);
            }
            self.errors[middle] = error;
        }
    }

    /// Emits the triangles whose error is within `max_error`, clipped to the
    /// real grid.
    fn extract(&self, max_error: f64) -> TerrainMesh {
        let t = self.tile;
        let mut index = vec![UNASSIGNED; self.size * self.size];
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();

        let mut stack = vec![((0, 0), (t, t), (t, 0)), ((t, t), (0, 0), (0, t))];
        while let Some((a, b, c)) = stack.pop() {
            let m = midpoint(a, b);
            let splittable = a.0.abs_diff(c.0) + a.1.abs_diff(c.1) > 1;
            if splittable && f64::from(self.errors[m.0 * self.size + m.1]) > max_error {
                stack.push((b, c, m));
                stack.push((c, a, m));
                continue;
            }

            let corners = [a, b, c].map(|p| (p.0.min(self.max_row), p.1.min(self.max_col)));
            if corners[0] == corners[1] || corners[1] == corners[2] || corners[0] == corners[2] {
                continue;
            }
            let mut tri = corners.map(|(row, col)| {
                let slot = &mut index[row * self.size + col];
                if *slot == UNASSIGNED {
                    *slot = vertices.len() as u32;
                    vertices.push(Point3::new(
                        row as f64 * self.grid.horizontal_scale(),
                        col as f64 * self.grid.horizontal_scale(),
                        self.height(row, col),
                    ));
                }
                *slot
            });

            // Rows map to X and columns to Y; fix orientation to face +Z
            let (p0, p1, p2) = (corners[0], corners[1], corners[2]);
            let cross = (p1.0 as f64 - p0.0 as f64) * (p2.1 as f64 - p0.1 as f64)
                - (p1.1 as f64 - p0.1 as f64) * (p2.0 as f64 - p0.0 as f64);
            if cross == 0.0 {
                continue;
            }
            if cross < 0.0 {
                tri.swap(1, 2);
            }
            triangles.push(tri);
        }

        TerrainMesh::new(vertices, triangles)
    }
}

const fn midpoint(a: (usize, usize), b: (usize, usize)) -> (usize, usize) {
    ((a.0 + b.0) / 2, (a.1 + b.1) / 2)
}

fn min_max([x, y, z]: [usize; 3]) -> (usize, usize) {
    (x.min(y).min(z), x.max(y).max(z))
}

/// Triangulates a grid adaptively, then optionally simplifies the result.
///
/// Every vertex lies on a grid sample, and the surface deviates from the grid
/// by at most `max_vertical_error_m` before simplification.
///
/// # Errors
///
/// Returns an error if the grid has fewer than two rows or columns, is too
/// large to index, or the parameters are invalid.
///
/// # Example
///
/// ```
/// use terrain_types::HeightGrid;
/// use terrain_mesh::{AdaptiveParams, adaptive_mesh};
///
/// // A flat 2^k + 1 square needs only two triangles
/// let grid = HeightGrid::new(17, 17, 0.1, 0.01).unwrap();
/// let mesh = adaptive_mesh(&grid, &AdaptiveParams::default()).unwrap();
/// assert_eq!(mesh.triangle_count(), 2);
/// ```
pub fn adaptive_mesh(grid: &HeightGrid, params: &AdaptiveParams) -> MeshResult<TerrainMesh> {
    params.validate()?;
    let rows = grid.rows();
    let cols = grid.cols();
    if rows < 2 || cols < 2 {
        return Err(MeshError::GridTooSmall { rows, cols });
    }
    let side = (rows - 1).max(cols - 1).next_power_of_two() + 1;
    if u32::try_from(side * side).is_err() {
        return Err(MeshError::GridTooLarge(side * side));
    }

    info!(rows, cols, max_error = params.max_vertical_error_m, "Starting adaptive triangulation");
    let rtin = Rtin::new(grid);
    let mesh = rtin.extract(params.max_vertical_error_m);
    debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "RTIN extracted"
    );

    match &params.simplify {
        Some(simplify) => Ok(simplify_mesh(&mesh, simplify)?.mesh),
        None => Ok(mesh),
    }
}

/// Mesh strategy that triangulates adaptively.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptiveMesher {
    /// Triangulation parameters.
    pub params: AdaptiveParams,
}

impl AdaptiveMesher {
    /// Creates an adaptive mesher.
    #[must_use]
    pub const fn new(params: AdaptiveParams) -> Self {
        Self { params }
    }
}
