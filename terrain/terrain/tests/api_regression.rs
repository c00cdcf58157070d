//! API Regression Tests for the Terrain Crate Ecosystem
//!
//! These tests serve as a regression suite to ensure the public API remains
//! stable and consistent across the terrain crates. They are organized in 5
//! tiers following the pipeline:
//!
//! - Tier 1: Foundation (terrain-types)
//! - Tier 2: Per-Tile Stages (terrain-repair, terrain-feasibility)
//! - Tier 3: Meshing (terrain-mesh)
//! - Tier 4: Course Assembly (terrain-course)
//! - Tier 5: End to End (custom generators, logging, meshing a course)
//!
//! If any of these tests fail after API changes, it indicates a breaking change
//! that needs documentation in CHANGELOG.md and a version bump.

// Allow test-specific patterns
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]

use terrain::{course, feasibility, mesh, prelude::*, repair, types};

fn centerline(xs: [f64; 8], y: f64) -> Waypoints {
    Waypoints(xs.map(|x| Point2::new(x, y)))
}

// =============================================================================
// TIER 1: Foundation - Grids, Cells, Tiles
// =============================================================================

mod tier1_foundation {
    use super::*;

    #[test]
    fn height_grid_units_and_meters() {
        let mut grid = HeightGrid::new(80, 40, 0.05, 0.005).unwrap();
        assert!((grid.length() - 4.0).abs() < 1e-9);
        assert!((grid.width() - 2.0).abs() < 1e-9);

        grid.set_meters(CellIndex::new(10, 20), 0.25);
        assert_eq!(grid.get(CellIndex::new(10, 20)), Some(50));
        assert_eq!(grid.get(CellIndex::new(80, 0)), None);
        assert_eq!(grid.max_sample(), 50);
    }

    #[test]
    fn height_grid_rejects_bad_samples() {
        let err = HeightGrid::from_samples(2, 2, 0.1, 0.01, vec![0; 3]).unwrap_err();
        assert!(matches!(err, types::TerrainTypesError::SampleCountMismatch { .. }));
    }

    #[test]
    fn tile_geometry_cells() {
        let tile = TileGeometry::new(8.0, 4.0, 0.05, 0.005);
        assert_eq!(tile.rows().unwrap(), 160);
        assert_eq!(tile.cols().unwrap(), 80);
        assert!(TileGeometry::new(8.03, 4.0, 0.05, 0.005).validate().is_err());
    }

    #[test]
    fn waypoints_fixed_size() {
        let wps = Waypoints::from_partial(&[Point2::new(1.0, 2.0)]).unwrap();
        assert_eq!(wps.as_slice().len(), types::WAYPOINT_COUNT);
        assert!(wps.iter().all(|p| *p == Point2::new(1.0, 2.0)));

        let too_many = vec![Point2::new(1.0, 1.0); 9];
        assert!(matches!(
            Waypoints::from_partial(&too_many),
            Err(types::TerrainTypesError::TooManyWaypoints(9))
        ));

        let moved = wps.translated(types::Vector2::new(8.0, 4.0));
        assert_eq!(moved[0], Point2::new(9.0, 6.0));
    }
}

// =============================================================================
// TIER 2: Per-Tile Stages - Repair and Feasibility
// =============================================================================

mod tier2_tile_stages {
    use super::*;
    use types::CellBounds;

    fn tile_grid() -> HeightGrid {
        // 10 m x 4 m at 5 cm
        HeightGrid::new(200, 80, 0.05, 0.005).unwrap()
    }

    #[test]
    fn repair_clean_tile_untouched() {
        let surface = TileSurface::new(
            tile_grid(),
            centerline([2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0], 2.0),
        );
        let repaired = repair_tile(surface.clone(), &RepairParams::default()).unwrap();
        assert!(repaired.log.is_empty());
        assert_eq!(repaired.surface, surface);
    }

    #[test]
    fn repair_presets() {
        assert_eq!(RepairParams::strict().max_repaired_fraction, 0.25);
        assert!(!RepairParams::lenient().repair_obstacles);
        assert!(RepairParams::default().with_spawn_flat_length(-1.0).validate().is_err());
    }

    #[test]
    fn repair_failure_carries_log() {
        let surface = TileSurface::new(tile_grid(), centerline([-1.0; 8], 2.0));
        let err = repair_tile(surface, &RepairParams::default()).unwrap_err();
        assert!(err.log().is_some());
        assert!(matches!(err, repair::RepairError::InvalidWaypoint { .. }));
    }

    #[test]
    fn obstacles_inspected_without_repair() {
        let mut grid = tile_grid();
        grid.fill(
            CellBounds::new(CellIndex::new(100, 20), CellIndex::new(105, 25)),
            100,
        );
        let obstacles = repair::find_obstacles(&grid, 10);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].cell_count(), 36);
    }

    #[test]
    fn feasibility_scores_a_step() {
        let mut grid = HeightGrid::new(100, 40, 0.1, 0.005).unwrap();
        grid.fill(
            CellBounds::new(CellIndex::new(50, 0), CellIndex::new(99, 39)),
            60,
        );
        let points: Vec<_> = (0..8).map(|i| Point2::new(2.0 + f64::from(i), 2.0)).collect();
        let waypoints = Waypoints::from_partial(&points).unwrap();

        let report = check_feasibility(
            &grid,
            &Point2::new(1.0, 2.0),
            &waypoints,
            &FeasibilityParams::default(),
        )
        .unwrap();
        assert_eq!(report.score_units, 60);
        assert!(!report.is_flat());
    }

    #[test]
    fn feasibility_flat_policy() {
        let grid = tile_grid();
        let waypoints = centerline([2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0], 2.0);
        let spawn = Point2::new(1.0, 2.0);

        let err = check_feasibility(&grid, &spawn, &waypoints, &FeasibilityParams::default())
            .unwrap_err();
        assert!(matches!(err, feasibility::FeasibilityError::FlatTerrain { .. }));

        let params = FeasibilityParams::default().with_allow_flat(true);
        assert!(check_feasibility(&grid, &spawn, &waypoints, &params).unwrap().is_flat());
    }

    #[test]
    fn jump_reduction_clears_gaps() {
        assert_eq!(feasibility::jump_reduce(&[0, 0, -200, -200, 0, 0], 3), vec![0, 0, 0, 0]);
        assert_eq!(feasibility::max_step(&[0, 10, 40]), 30);
    }
}

// =============================================================================
// TIER 3: Meshing - Grid, Adaptive, Simplify
// =============================================================================

mod tier3_meshing {
    use super::*;

    #[test]
    fn grid_mesh_counts() {
        let grid = HeightGrid::new(3, 3, 0.1, 0.01).unwrap();
        let m = mesh::grid_to_mesh(&grid, &GridMeshParams::plain()).unwrap();
        assert_eq!(m.vertex_count(), 9);
        assert_eq!(m.triangle_count(), 8);
        assert!(m.validate().is_ok());
        assert!(m.edge_mask.is_none());
    }

    #[test]
    fn strategies_are_object_safe() {
        let grid = HeightGrid::new(9, 9, 0.1, 0.01).unwrap();
        let strategies: Vec<Box<dyn MeshStrategy>> = vec![
            Box::new(mesh::GridMesher::default()),
            Box::new(mesh::AdaptiveMesher::new(AdaptiveParams::default())),
        ];
        let counts: Vec<_> = strategies
            .iter()
            .map(|s| s.build(&grid).unwrap().triangle_count())
            .collect();
        assert_eq!(counts, vec![128, 2]);
    }

    #[test]
    fn simplify_identity_at_full_ratio() {
        let grid = HeightGrid::new(5, 5, 0.1, 0.01).unwrap();
        let m = mesh::grid_to_mesh(&grid, &GridMeshParams::plain()).unwrap();
        let result = mesh::simplify_mesh(&m, &SimplifyParams::with_target_ratio(1.0)).unwrap();
        assert_eq!(result.final_triangles, result.original_triangles);
        assert!(!result.was_simplified());
    }
}

// =============================================================================
// TIER 4: Course Assembly - Registry, Adapter, Assembler
// =============================================================================

mod tier4_course {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn registry_reference_set() {
        let registry = GeneratorRegistry::with_reference_generators();
        for name in ["flat", "single_step", "gaps", "hurdles", "stairs_or_gaps"] {
            assert!(registry.contains(name), "{name} missing");
        }
        let err = registry.resolve("spiral").unwrap_err();
        assert!(matches!(err, CourseError::Configuration(_)));
    }

    #[test]
    fn adapter_reports_pattern_index() {
        let registry = GeneratorRegistry::with_reference_generators();
        let geometry = TileGeometry::new(8.0, 4.0, 0.05, 0.005);
        let mut rng = course::TileRng::seed_from_u64(1);
        let generator = registry.resolve("stairs_or_gaps").unwrap();

        let tile = course::invoke_generator(generator, &geometry, 0.5, 0.0, &mut rng).unwrap();
        assert_eq!(tile.generator_index, 0);
        let tile = course::invoke_generator(generator, &geometry, 0.5, 0.75, &mut rng).unwrap();
        assert_eq!(tile.generator_index, 1);
    }

    #[test]
    fn curriculum_and_seeds() {
        assert_eq!(course::difficulty_for(0, 1), 0.5);
        assert_eq!(course::variation_for(1, 4), 0.25);
        assert_eq!(course::tile_seed(0.5, 0.25, 0), 500_250);
    }

    #[test]
    fn assembler_layout() {
        let registry = GeneratorRegistry::with_reference_generators();
        let assembler = CourseAssembler::new(CourseParams::small(), &registry).unwrap();
        let course = assembler.assemble().unwrap();

        assert_eq!(course.num_rows(), 2);
        assert_eq!(course.num_cols(), 3);
        assert_eq!(course.origins().len(), 6);
        assert_eq!(course.generator_index(0, 0), Some(0));
        assert_eq!(course.generator_index(0, 2), Some(1));
        assert_eq!(course.tile_at(&Point2::new(9.0, 1.0)), Some((1, 0)));
    }

    #[test]
    fn invalid_layout_is_configuration_error() {
        let registry = GeneratorRegistry::with_reference_generators();
        let err = CourseAssembler::new(CourseParams::small().with_layout(0, 3), &registry)
            .unwrap_err();
        assert!(matches!(err, CourseError::Configuration(_)));
        assert!(err.tile().is_none());
    }
}

// =============================================================================
// TIER 5: End to End
// =============================================================================

mod tier5_end_to_end {
    use super::*;
    use course::{PureOutput, PureRequest, TileCanvas, TileRng};
    use rand::Rng;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn custom_generators_in_every_convention() {
        init_logging();
        let mut registry = GeneratorRegistry::new();
        registry.register(
            "ramp",
            Generator::pure(|request: &PureRequest, _: &mut TileRng| {
                let mut out = PureOutput::flat(request);
                let cols = out.cols;
                for (i, h) in out.heights_m.iter_mut().enumerate() {
                    let row = i / cols;
                    if row >= 40 {
                        *h = 0.2;
                    }
                }
                out.waypoints = (0..8).map(|i| Point2::new(2.5 + 0.6 * f64::from(i), 2.0)).collect();
                out
            }),
        );
        registry.register(
            "ledge",
            Generator::difficulty_only(|canvas: &mut TileCanvas, difficulty, rng: &mut TileRng| {
                let x = 4.0 + rng.gen_range(0.0..0.5);
                canvas.fill_band(x, canvas.length(), 0.1 + 0.2 * difficulty);
                for i in 0..8 {
                    canvas.push_goal(2.5 + 0.6 * f64::from(i), 2.0);
                }
            }),
        );

        let params = CourseParams::small().with_generators(["ramp", "ledge"]);
        let course = assemble_course(params, &registry).unwrap();
        assert_eq!(course.generator_index(1, 2), Some(0));
        assert!(course.height_at(&Point2::new(6.0, 10.0)).unwrap() > 0.05);
    }

    #[test]
    fn course_to_mesh() {
        init_logging();
        let registry = GeneratorRegistry::with_reference_generators();
        let course = assemble_course(CourseParams::small(), &registry).unwrap();
        let (rows, cols) = (course.grid().rows(), course.grid().cols());

        let grid_mesh = course.to_mesh(&MeshMethod::default()).unwrap();
        assert_eq!(grid_mesh.triangle_count(), 2 * (rows - 1) * (cols - 1));
        assert!(grid_mesh.edge_mask.is_some());

        let adaptive = course
            .to_mesh(&MeshMethod::Adaptive(AdaptiveParams::default()))
            .unwrap();
        assert!(adaptive.triangle_count() < grid_mesh.triangle_count());
        assert!(adaptive.validate().is_ok());
    }
}
