//! Calls a generator in its registered convention and normalizes the output.

use terrain_types::{HeightGrid, Point2, TileGeometry, TileSurface, WAYPOINT_COUNT, Waypoints};
use tracing::debug;

use crate::error::{CourseError, CourseResult};
use crate::generator::{Generator, PureRequest, TileCanvas, TileRng};

/// A tile straight out of its generator: waypoints are tile-local and
/// unrepaired, possibly still in cells.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTile {
    /// Elevations and raw waypoints.
    pub surface: TileSurface,
    /// Pattern index reported by the generator, 0 unless it reports one.
    pub generator_index: usize,
}

/// Invokes `generator` for one tile.
///
/// Canvas generators paint a zeroed grid of the tile's dimensions. Pure
/// generators return elevations in meters, which are quantized by the tile's
/// vertical scale. Fewer than eight waypoints are padded by repeating the last
/// one.
///
/// # Errors
///
/// Returns [`CourseError::Configuration`] if the geometry is unusable, the
/// generator's grid does not match the tile's cell dimensions and scales, or
/// more than eight waypoints are returned.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use terrain_course::{GeneratorRegistry, TileRng, invoke_generator};
/// use terrain_types::TileGeometry;
///
/// let registry = GeneratorRegistry::with_reference_generators();
/// let geometry = TileGeometry::new(8.0, 4.0, 0.05, 0.005);
/// let mut rng = TileRng::seed_from_u64(1);
///
/// let tile = invoke_generator(registry.resolve("stairs_or_gaps").unwrap(), &geometry, 0.5, 0.75, &mut rng)
///     .unwrap();
/// assert_eq!(tile.generator_index, 1);
/// assert_eq!(tile.surface.grid.rows(), 160);
/// ```
pub fn invoke_generator(
    generator: &Generator,
    geometry: &TileGeometry,
    difficulty: f64,
    variation: f64,
    rng: &mut TileRng,
) -> CourseResult<GeneratedTile> {
    let blank = geometry
        .blank_grid()
        .map_err(|e| CourseError::Configuration(format!("invalid tile geometry: {e}")))?;
    let expected = (blank.rows(), blank.cols());

    let (grid, points, generator_index) = match generator {
        Generator::WithVariation(paint) => {
            let mut canvas = TileCanvas::new(blank);
            let index = paint(&mut canvas, variation, difficulty, rng);
            (canvas.grid, canvas.waypoints, index)
        }
        Generator::DifficultyOnly(paint) => {
            let mut canvas = TileCanvas::new(blank);
            paint(&mut canvas, difficulty, rng);
            (canvas.grid, canvas.waypoints, 0)
        }
        Generator::Pure(generate) => {
            let request = PureRequest {
                length_m: geometry.length_m,
                width_m: geometry.width_m,
                cell_size_m: geometry.horizontal_scale,
                difficulty,
            };
            let out = generate(&request, rng);
            if (out.rows, out.cols) != expected || out.heights_m.len() != out.rows * out.cols {
                return Err(CourseError::Configuration(format!(
                    "pure generator returned a {}x{} grid with {} samples, tile needs {}x{}",
                    out.rows,
                    out.cols,
                    out.heights_m.len(),
                    expected.0,
                    expected.1
                )));
            }
            let grid = HeightGrid::from_meters(
                out.rows,
                out.cols,
                geometry.horizontal_scale,
                geometry.vertical_scale,
                &out.heights_m,
            )?;
            (grid, out.waypoints, 0)
        }
    };

    check_canvas(&grid, expected, geometry)?;
    let waypoints = pad_waypoints(&points)?;
    debug!(
        convention = generator.convention(),
        generator_index,
        supplied_waypoints = points.len(),
        "Generator invoked"
    );

    Ok(GeneratedTile {
        surface: TileSurface::new(grid, waypoints),
        generator_index,
    })
}

/// Canvas generators own their grid and may swap it out; the result must
/// still match the tile slot it is pasted into.
fn check_canvas(grid: &HeightGrid, expected: (usize, usize), geometry: &TileGeometry) -> CourseResult<()> {
    const SCALE_TOLERANCE: f64 = 1e-12;
    let same_scale = (grid.horizontal_scale() - geometry.horizontal_scale).abs() < SCALE_TOLERANCE
        && (grid.vertical_scale() - geometry.vertical_scale).abs() < SCALE_TOLERANCE;
    if (grid.rows(), grid.cols()) != expected || !same_scale {
        return Err(CourseError::Configuration(format!(
            "generator returned a {}x{} grid at {} m/{} m, tile needs {}x{} at {} m/{} m",
            grid.rows(),
            grid.cols(),
            grid.horizontal_scale(),
            grid.vertical_scale(),
            expected.0,
            expected.1,
            geometry.horizontal_scale,
            geometry.vertical_scale
        )));
    }
    Ok(())
}

fn pad_waypoints(points: &[Point2<f64>]) -> CourseResult<Waypoints> {
    if points.len() > WAYPOINT_COUNT {
        return Err(CourseError::Configuration(format!(
            "generator returned {} waypoints, a tile holds {WAYPOINT_COUNT}",
            points.len()
        )));
    }
    Ok(Waypoints::from_partial(points)?)
}
