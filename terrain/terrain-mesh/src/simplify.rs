//! Mesh simplification by edge collapse with quadric error metrics (QEM).

// Mesh indices and counts don't overflow in practice
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet};
use nalgebra::{Point3, Vector3};
use tracing::{debug, info};

use crate::error::MeshResult;
use crate::mesh::TerrainMesh;
use crate::params::SimplifyParams;
use crate::quadric::Quadric;
use crate::result::SimplifyResult;

/// An edge collapse candidate in the priority queue.
#[derive(Debug, Clone)]
struct EdgeCollapse {
    /// Surviving vertex.
    keep: u32,
    /// Vertex merged into `keep`.
    remove: u32,
    /// Vertex versions when the candidate was computed.
    stamps: (u32, u32),
    cost: f64,
    target: Point3<f64>,
}

impl PartialEq for EdgeCollapse {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal
    }
}

impl Eq for EdgeCollapse {}

impl PartialOrd for EdgeCollapse {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCollapse {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior
        other.cost.total_cmp(&self.cost)
    }
}

/// Working state of one simplification run.
struct Simplifier<'a> {
    params: &'a SimplifyParams,
    positions: Vec<Point3<f64>>,
    quadrics: Vec<Quadric>,
    boundary: Vec<bool>,
    stamps: Vec<u32>,
    alive: Vec<bool>,
    faces: Vec<Option<[u32; 3]>>,
    vertex_faces: Vec<Vec<usize>>,
    active_faces: usize,
}

impl<'a> Simplifier<'a> {
    fn new(mesh: &TerrainMesh, params: &'a SimplifyParams) -> Self {
        let n = mesh.vertices.len();
        let mut quadrics = vec![Quadric::default(); n];
        let mut vertex_faces = vec![Vec::new(); n];
        let mut edge_faces: HashMap<(u32, u32), u32> = HashMap::new();

        for (f, tri) in mesh.triangles.iter().enumerate() {
            let [p0, p1, p2] = tri.map(|i| &mesh.vertices[i as usize]);
            let q = Quadric::from_triangle(p0, p1, p2);
            for k in 0..3 {
                let v = tri[k] as usize;
                vertex_faces[v].push(f);
                if let Some(q) = &q {
                    quadrics[v].add(q);
                }
                *edge_faces.entry(edge_key(tri[k], tri[(k + 1) % 3])).or_default() += 1;
            }
        }

        let mut boundary = vec![false; n];
        for (&(a, b), _) in edge_faces.iter().filter(|&(_, &count)| count == 1) {
            boundary[a as usize] = true;
            boundary[b as usize] = true;
        }

        Self {
            params,
            positions: mesh.vertices.clone(),
            quadrics,
            boundary,
            stamps: vec![0; n],
            alive: vec![true; n],
            faces: mesh.triangles.iter().copied().map(Some).collect(),
            vertex_faces,
            active_faces: mesh.triangles.len(),
        }
    }

    fn neighbors(&self, v: u32) -> HashSet<u32> {
        self.vertex_faces[v as usize]
            .iter()
            .filter_map(|&f| self.faces[f])
            .flatten()
            .filter(|&u| u != v)
            .collect()
    }

    /// Collapse candidate for edge `(a, b)`, or `None` if the edge is pinned.
    fn candidate(&self, a: u32, b: u32) -> Option<EdgeCollapse> {
        let (ba, bb) = (self.boundary[a as usize], self.boundary[b as usize]);
        let mut combined = self.quadrics[a as usize];
        combined.add(&self.quadrics[b as usize]);
        let pa = self.positions[a as usize];
        let pb = self.positions[b as usize];

        let (keep, remove, target) = if self.params.preserve_boundary && (ba || bb) {
            if ba && bb {
                return None;
            }
            // The boundary vertex stays where it is
            if ba { (a, b, pa) } else { (b, a, pb) }
        } else {
            let mid = Point3::from((pa.coords + pb.coords) / 2.0);
            let reach = (pb - pa).norm();
            let target = combined
                .optimal_point()
                .filter(|p| (p - mid).norm() <= reach)
                .unwrap_or_else(|| {
                    [pa, pb, mid]
                        .into_iter()
                        .min_by(|p, q| combined.evaluate(p).total_cmp(&combined.evaluate(q)))
                        .unwrap_or(mid)
                });
            (a, b, target)
        };

        Some(EdgeCollapse {
            keep,
            remove,
            stamps: (self.stamps[keep as usize], self.stamps[remove as usize]),
            cost: combined.evaluate(&target),
            target,
        })
    }

    fn is_current(&self, c: &EdgeCollapse) -> bool {
        self.alive[c.keep as usize]
            && self.alive[c.remove as usize]
            && self.stamps[c.keep as usize] == c.stamps.0
            && self.stamps[c.remove as usize] == c.stamps.1
    }

    /// Whether the collapse keeps the mesh manifold and every face upright.
    fn is_valid(&self, c: &EdgeCollapse) -> bool {
        // Link condition
        let shared = self
            .neighbors(c.keep)
            .intersection(&self.neighbors(c.remove))
            .count();
        if shared > 2 {
            return false;
        }

        for v in [c.keep, c.remove] {
            for &f in &self.vertex_faces[v as usize] {
                let Some(tri) = self.faces[f] else { continue };
                if tri.contains(&c.keep) && tri.contains(&c.remove) {
                    continue;
                }
                let before = self.normal(tri, None);
                let after = self.normal(tri, Some((v, c.target)));
                if after.norm() <= f64::EPSILON || after.dot(&before) <= 0.0 {
                    return false;
                }
                if before.z > 0.0 && after.z <= 0.0 {
                    return false;
                }
            }
        }
        true
    }

    fn normal(&self, tri: [u32; 3], moved: Option<(u32, Point3<f64>)>) -> Vector3<f64> {
        let [p0, p1, p2] = tri.map(|i| match moved {
            Some((v, p)) if v == i => p,
            _ => self.positions[i as usize],
        });
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Merges `remove` into `keep`.
    fn collapse(&mut self, c: &EdgeCollapse) {
        let (keep, remove) = (c.keep as usize, c.remove as usize);
        self.positions[keep] = c.target;
        let q = self.quadrics[remove];
        self.quadrics[keep].add(&q);
        self.boundary[keep] |= self.boundary[remove];
        self.alive[remove] = false;
        self.stamps[keep] += 1;
        self.stamps[remove] += 1;

        for f in std::mem::take(&mut self.vertex_faces[remove]) {
            let Some(mut tri) = self.faces[f] else { continue };
            if tri.contains(&c.keep) {
                self.faces[f] = None;
                self.active_faces -= 1;
                for v in tri {
                    self.vertex_faces[v as usize].retain(|&g| g != f);
                }
            } else {
                for v in &mut tri {
                    if *v == c.remove {
                        *v = c.keep;
                    }
                }
                self.faces[f] = Some(tri);
                self.vertex_faces[keep].push(f);
            }
        }
    }

    fn into_mesh(self) -> TerrainMesh {
        let mut remap = vec![u32::MAX; self.positions.len()];
        let mut vertices = Vec::new();
        let triangles = self
            .faces
            .into_iter()
            .flatten()
            .map(|tri| {
                tri.map(|v| {
                    let slot = &mut remap[v as usize];
                    if *slot == u32::MAX {
                        *slot = vertices.len() as u32;
                        vertices.push(self.positions[v as usize]);
                    }
                    *slot
                })
            })
            .collect();
        TerrainMesh::new(vertices, triangles)
    }
}

const fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Simplifies a mesh by collapsing its cheapest edges first.
///
/// Stops at `ceil(original * target_ratio)` triangles or when no valid
/// collapse remains. A collapse is rejected if it breaks the link condition,
/// exceeds `max_error`, or turns any face over or away from +Z. With
/// `preserve_boundary`, border vertices never move and an edge between two
/// border vertices never collapses, so the mesh outline is kept.
///
/// # Errors
///
/// Returns an error if the parameters or the mesh indices are invalid.
///
/// # Example
///
/// ```
/// use terrain_types::HeightGrid;
/// use terrain_mesh::{GridMeshParams, SimplifyParams, grid_to_mesh, simplify_mesh};
///
/// let grid = HeightGrid::new(9, 9, 0.1, 0.01).unwrap();
/// let mesh = grid_to_mesh(&grid, &GridMeshParams::plain()).unwrap();
/// let result = simplify_mesh(&mesh, &SimplifyParams::default()).unwrap();
/// assert!(result.final_triangles <= 64);
/// println!("{result}");
/// ```
pub fn simplify_mesh(mesh: &TerrainMesh, params: &SimplifyParams) -> MeshResult<SimplifyResult> {
    params.validate()?;
    mesh.validate()?;

    let original_triangles = mesh.triangle_count();
    let target = (original_triangles as f64 * params.target_ratio).ceil() as usize;
    if original_triangles <= target {
        return Ok(SimplifyResult {
            mesh: TerrainMesh::new(mesh.vertices.clone(), mesh.triangles.clone()),
            original_triangles,
            final_triangles: original_triangles,
            collapses_performed: 0,
            collapses_rejected: 0,
        });
    }

    info!(
        original = original_triangles,
        target = target,
        "Starting mesh simplification"
    );

    let mut state = Simplifier::new(mesh, params);
    let mut heap = BinaryHeap::new();
    let mut seen = HashSet::new();
    for tri in &mesh.triangles {
        for k in 0..3 {
            let (a, b) = edge_key(tri[k], tri[(k + 1) % 3]);
            if seen.insert((a, b)) {
                heap.extend(state.candidate(a, b));
            }
        }
    }

    let mut collapses_performed = 0;
    let mut collapses_rejected = 0;

    while state.active_faces > target {
        let Some(collapse) = heap.pop() else {
            break;
        };
        if !state.is_current(&collapse) {
            continue;
        }
        if params.max_error.is_some_and(|max| collapse.cost > max) || !state.is_valid(&collapse) {
            collapses_rejected += 1;
            continue;
        }

        state.collapse(&collapse);
        collapses_performed += 1;

        for n in state.neighbors(collapse.keep) {
            heap.extend(state.candidate(collapse.keep, n));
        }
    }

    let final_triangles = state.active_faces;
    debug!(rejected = collapses_rejected, "Simplification queue drained");
    info!(
        final_triangles,
        collapses = collapses_performed,
        "Simplification complete"
    );

    Ok(SimplifyResult {
        mesh: state.into_mesh(),
        original_triangles,
        final_triangles,
        collapses_performed,
        collapses_rejected,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::grid_to_mesh;
    use crate::params::GridMeshParams;
    use approx::assert_relative_eq;
    use terrain_types::{CellBounds, CellIndex, HeightGrid};

    fn flat_mesh(n: usize) -> TerrainMesh {
        let grid = HeightGrid::new(n, n, 0.1, 0.01).unwrap();
        grid_to_mesh(&grid, &GridMeshParams::plain()).unwrap()
    }

    fn area_xy(mesh: &TerrainMesh) -> f64 {
        (0..mesh.triangle_count())
            .map(|t| mesh.triangle_normal(t).unwrap().z / 2.0)
            .sum()
    }

    #[test]
    fn test_empty_mesh() {
        let result = simplify_mesh(&TerrainMesh::default(), &SimplifyParams::default()).unwrap();
        assert_eq!(result.final_triangles, 0);
        assert!(!result.was_simplified());
    }

    #[test]
    fn test_ratio_one_is_identity() {
        let mesh = flat_mesh(5);
        let result = simplify_mesh(&mesh, &SimplifyParams::with_target_ratio(1.0)).unwrap();
        assert_eq!(result.mesh.triangles, mesh.triangles);
        assert_eq!(result.collapses_performed, 0);
    }

    #[test]
    fn test_flat_reduces_and_keeps_outline() {
        let mesh = flat_mesh(9);
        let result = simplify_mesh(&mesh, &SimplifyParams::default()).unwrap();
        assert!(result.final_triangles < result.original_triangles);
        assert!(result.final_triangles >= 64);
        assert_eq!(result.final_triangles, result.mesh.triangle_count());
        assert!(result.mesh.validate().is_ok());
        assert_relative_eq!(area_xy(&result.mesh), 0.8 * 0.8, epsilon = 1e-9);
        for v in &result.mesh.vertices {
            assert_relative_eq!(v.z, 0.0);
        }
        for t in 0..result.mesh.triangle_count() {
            assert!(result.mesh.triangle_normal(t).unwrap().z > 0.0);
        }
    }

    #[test]
    fn test_max_error_protects_features() {
        let mut grid = HeightGrid::new(9, 9, 0.1, 0.01).unwrap();
        grid.fill(CellBounds::new(CellIndex::new(3, 3), CellIndex::new(5, 5)), 20);
        let mesh = grid_to_mesh(&grid, &GridMeshParams::plain()).unwrap();
        let params = SimplifyParams::aggressive().with_max_error(0.0);
        let result = simplify_mesh(&mesh, &params).unwrap();
        let peak = result.mesh.vertices.iter().map(|v| v.z).fold(f64::MIN, f64::max);
        assert_relative_eq!(peak, 0.2, epsilon = 1e-9);
        assert!(result.mesh.validate().is_ok());
    }

    #[test]
    fn test_invalid_mesh_rejected() {
        let mut mesh = flat_mesh(3);
        mesh.triangles.push([0, 1, 99]);
        assert!(simplify_mesh(&mesh, &SimplifyParams::default()).is_err());
    }
}
