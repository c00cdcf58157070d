//! Property-based tests for grid to mesh conversion.
//!
//! Run with: cargo test -p terrain-mesh -- proptest

// Test grids are tiny
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use proptest::prelude::*;
use terrain_mesh::{
    AdaptiveParams, GridMeshParams, SimplifyParams, TerrainMesh, adaptive_mesh, grid_to_mesh,
    simplify_mesh,
};
use terrain_types::HeightGrid;

const HS: f64 = 0.1;
const VS: f64 = 0.01;

// =============================================================================
// Strategies
// =============================================================================

/// Small grids of terraced terrain: flat runs with occasional steps.
fn arb_grid() -> impl Strategy<Value = HeightGrid> {
    (2..20usize, 2..20usize).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop_oneof![3 => Just(0i16), 1 => -20..60i16], rows * cols).prop_map(
            move |samples| HeightGrid::from_samples(rows, cols, HS, VS, samples).unwrap(),
        )
    })
}

// =============================================================================
// Helpers
// =============================================================================

fn xy_area(mesh: &TerrainMesh) -> f64 {
    (0..mesh.triangle_count())
        .map(|t| mesh.triangle_normal(t).unwrap().z / 2.0)
        .sum()
}

fn grid_area(grid: &HeightGrid) -> f64 {
    (grid.rows() - 1) as f64 * (grid.cols() - 1) as f64 * HS * HS
}

/// Elevation of the mesh above a sample, found by barycentric lookup.
fn mesh_height_at(mesh: &TerrainMesh, x: f64, y: f64) -> Option<f64> {
    mesh.triangles.iter().find_map(|tri| {
        let [a, b, c] = tri.map(|i| mesh.vertices[i as usize]);
        let det = (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y);
        let u = ((b.x - x) * (c.y - y) - (c.x - x) * (b.y - y)) / det;
        let v = ((c.x - x) * (a.y - y) - (a.x - x) * (c.y - y)) / det;
        let w = 1.0 - u - v;
        (u >= -1e-9 && v >= -1e-9 && w >= -1e-9).then(|| u * a.z + v * b.z + w * c.z)
    })
}

// =============================================================================
// Grid triangulation
// =============================================================================

proptest! {
    #[test]
    fn proptest_grid_mesh_reproduces_samples(grid in arb_grid()) {
        let mesh = grid_to_mesh(&grid, &GridMeshParams::plain()).unwrap();
        prop_assert_eq!(mesh.vertex_count(), grid.rows() * grid.cols());
        prop_assert_eq!(mesh.triangle_count(), 2 * (grid.rows() - 1) * (grid.cols() - 1));
        prop_assert!(mesh.validate().is_ok());
        for (v, &s) in mesh.vertices.iter().zip(grid.samples()) {
            prop_assert!((v.z - f64::from(s) * VS).abs() < 1e-12);
        }
        prop_assert!((xy_area(&mesh) - grid_area(&grid)).abs() < 1e-9);
    }

    #[test]
    fn proptest_cliff_moves_stay_within_one_cell(grid in arb_grid()) {
        let mesh = grid_to_mesh(&grid, &GridMeshParams::default()).unwrap();
        let mask = mesh.edge_mask.as_ref().unwrap();
        for (i, v) in mesh.vertices.iter().enumerate() {
            let (row, col) = (i / grid.cols(), i % grid.cols());
            let dx = v.x - row as f64 * HS;
            let dy = v.y - col as f64 * HS;
            prop_assert!(dx.abs() <= HS + 1e-12 && dy.abs() <= HS + 1e-12);
            let moved = dx.abs() > 1e-12 || dy.abs() > 1e-12;
            if moved {
                prop_assert!(mask.as_slice()[i]);
            }
            prop_assert!((v.z - f64::from(grid.samples()[i]) * VS).abs() < 1e-12);
        }
    }
}

// =============================================================================
// Adaptive triangulation
// =============================================================================

proptest! {
    #[test]
    fn proptest_adaptive_covers_grid(grid in arb_grid(), err in 0.0..0.3f64) {
        let mesh = adaptive_mesh(&grid, &AdaptiveParams::default().with_max_vertical_error(err))
            .unwrap();
        prop_assert!(mesh.validate().is_ok());
        prop_assert!((xy_area(&mesh) - grid_area(&grid)).abs() < 1e-9);
        for t in 0..mesh.triangle_count() {
            prop_assert!(mesh.triangle_normal(t).unwrap().z > 0.0);
        }
        // Every vertex sits on a sample
        for v in &mesh.vertices {
            let row = (v.x / HS).round() as usize;
            let col = (v.y / HS).round() as usize;
            prop_assert!(row < grid.rows() && col < grid.cols());
            let sample = grid.samples()[row * grid.cols() + col];
            prop_assert!((v.z - f64::from(sample) * VS).abs() < 1e-12);
        }
    }

    #[test]
    fn proptest_adaptive_zero_error_is_exact(grid in arb_grid()) {
        let params = AdaptiveParams::default().with_max_vertical_error(0.0);
        let mesh = adaptive_mesh(&grid, &params).unwrap();
        for r in 0..grid.rows() {
            for c in 0..grid.cols() {
                let z = mesh_height_at(&mesh, r as f64 * HS, c as f64 * HS).unwrap();
                let expected = f64::from(grid.samples()[r * grid.cols() + c]) * VS;
                prop_assert!((z - expected).abs() < 1e-9, "({}, {}): {} vs {}", r, c, z, expected);
            }
        }
    }
}

// =============================================================================
// Simplification
// =============================================================================

proptest! {
    #[test]
    fn proptest_simplify_keeps_outline(grid in arb_grid(), ratio in 0.1..1.0f64) {
        let mesh = grid_to_mesh(&grid, &GridMeshParams::plain()).unwrap();
        let result = simplify_mesh(&mesh, &SimplifyParams::with_target_ratio(ratio)).unwrap();
        prop_assert!(result.final_triangles <= result.original_triangles);
        prop_assert_eq!(result.final_triangles, result.mesh.triangle_count());
        prop_assert!(result.mesh.validate().is_ok());
        for t in 0..result.mesh.triangle_count() {
            prop_assert!(result.mesh.triangle_normal(t).unwrap().z > 0.0);
        }
        prop_assert!((xy_area(&result.mesh) - grid_area(&grid)).abs() < 1e-9);
    }
}
