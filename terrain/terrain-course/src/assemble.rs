//! Course assembly: every tile in parallel, then one global grid.

// Tile counts are far below 2^52
#![allow(clippy::cast_precision_loss)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use terrain_types::{CellBounds, CellIndex, HeightGrid, Point2, Point3, Vector2};
use tracing::{debug, info};

use crate::error::{CourseError, CourseResult};
use crate::generator::Generator;
use crate::params::{CourseParams, OriginHeight};
use crate::pipeline::{Tile, build_tile};
use crate::registry::GeneratorRegistry;
use crate::roughness::apply_roughness;
use crate::terrain_grid::TerrainGrid;

/// Builds courses from validated params and a generator registry.
///
/// Every generator name is resolved up front, so an unknown name fails
/// before any tile is generated.
///
/// # Example
///
/// ```
/// use terrain_course::{CourseAssembler, CourseParams, GeneratorRegistry};
///
/// let registry = GeneratorRegistry::with_reference_generators();
/// let assembler = CourseAssembler::new(CourseParams::small(), &registry).unwrap();
///
/// let course = assembler.assemble().unwrap();
/// assert_eq!(course.origins().len(), 6);
/// // 2 x 80 tile rows plus a 10-cell border on each side
/// assert_eq!(course.grid().rows(), 180);
/// ```
#[derive(Debug, Clone)]
pub struct CourseAssembler {
    params: CourseParams,
    generators: Vec<Generator>,
}

impl CourseAssembler {
    /// Validates `params` and resolves its generators in `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::Configuration`] for invalid params or an
    /// unknown generator name.
    pub fn new(params: CourseParams, registry: &GeneratorRegistry) -> CourseResult<Self> {
        params.validate()?;
        let generators = params
            .generators
            .iter()
            .map(|name| registry.resolve(name).cloned())
            .collect::<CourseResult<Vec<_>>>()?;
        Ok(Self { params, generators })
    }

    /// The course parameters.
    #[must_use]
    pub const fn params(&self) -> &CourseParams {
        &self.params
    }

    /// Generates, repairs and checks the single tile `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::Configuration`] for a tile outside the layout,
    /// or the tile's repair or feasibility failure.
    pub fn build_tile(&self, row: usize, col: usize) -> CourseResult<Tile> {
        if row >= self.params.num_rows || col >= self.params.num_cols {
            return Err(CourseError::Configuration(format!(
                "tile ({row}, {col}) outside the {}x{} layout",
                self.params.num_rows, self.params.num_cols
            )));
        }
        let slot = col * self.generators.len() / self.params.num_cols;
        let generator = self.generators.get(slot).ok_or_else(|| {
            CourseError::Configuration(format!("no generator for column {col}"))
        })?;
        build_tile(&self.params, generator, row, col)
    }

    /// Builds every tile and places it in one border-padded grid.
    ///
    /// Tiles are built in parallel, each from its own seed; the first
    /// failing tile aborts the course. Roughness is overlaid after
    /// placement, then spawn origins are measured on the final grid.
    ///
    /// # Errors
    ///
    /// Returns the first tile failure, or a grid error if the course does
    /// not fit in memory-addressable dimensions.
    pub fn assemble(&self) -> CourseResult<TerrainGrid> {
        let p = &self.params;
        let cols = p.num_cols;
        info!(
            rows = p.num_rows,
            cols,
            seed = p.seed,
            generators = ?p.generators,
            "Assembling course"
        );

        let tiles = (0..p.tile_count())
            .into_par_iter()
            .map(|i| self.build_tile(i / cols, i % cols))
            .collect::<CourseResult<Vec<_>>>()?;

        let template = p.tile.blank_grid()?;
        let (tile_rows, tile_cols) = (template.rows(), template.cols());
        let border = template.cells_for(p.border_m);
        let mut grid = HeightGrid::new(
            2 * border + p.num_rows * tile_rows,
            2 * border + cols * tile_cols,
            p.tile.horizontal_scale,
            p.tile.vertical_scale,
        )?;
        for tile in &tiles {
            grid.paste(
                &tile.surface.grid,
                border + tile.row * tile_rows,
                border + tile.col * tile_cols,
            )?;
        }

        if let Some(roughness) = &p.roughness {
            let mut rng = ChaCha8Rng::seed_from_u64(p.seed);
            apply_roughness(&mut grid, roughness, border, tile_rows, p.num_rows, &mut rng);
            debug!(easy_m = roughness.easy_m, hard_m = roughness.hard_m, "Roughness applied");
        }

        let spawn = p.spawn_point();
        let mut origins = Vec::with_capacity(tiles.len());
        let mut goals = Vec::with_capacity(tiles.len());
        for tile in &tiles {
            let offset = Vector2::new(
                tile.row as f64 * p.tile.length_m,
                tile.col as f64 * p.tile.width_m,
            );
            let spawn_world = spawn + offset;
            let z = origin_height(&grid, &p.origin_height, &spawn_world, border);
            origins.push(Point3::new(spawn_world.x, spawn_world.y, z));
            goals.push(tile.surface.waypoints.translated(offset));
        }
        let generator_indices = tiles.iter().map(|t| t.generator_index).collect();
        let repairs: usize = tiles.iter().map(|t| t.repair_log.len()).sum();

        info!(
            tiles = tiles.len(),
            grid_rows = grid.rows(),
            grid_cols = grid.cols(),
            repairs,
            "Course assembled"
        );

        Ok(TerrainGrid::new(
            grid,
            p.tile,
            p.num_rows,
            cols,
            border,
            origins,
            goals,
            generator_indices,
        ))
    }
}

/// Assembles a course in one call.
///
/// # Errors
///
/// Same conditions as [`CourseAssembler::new`] and
/// [`CourseAssembler::assemble`].
pub fn assemble_course(params: CourseParams, registry: &GeneratorRegistry) -> CourseResult<TerrainGrid> {
    CourseAssembler::new(params, registry)?.assemble()
}

/// Spawn height at a world-frame spawn point.
fn origin_height(grid: &HeightGrid, rule: &OriginHeight, spawn: &Point2<f64>, border: usize) -> f64 {
    match *rule {
        OriginHeight::Fixed(z) => z,
        OriginHeight::SpawnMax { radius_m } => {
            let shift = border as f64 * grid.horizontal_scale();
            let center = grid.cell_at_clamped(&Point2::new(spawn.x + shift, spawn.y + shift));
            let r = grid.cells_for(radius_m);
            let footprint = CellBounds::new(
                CellIndex::new(center.row.saturating_sub(r), center.col.saturating_sub(r)),
                CellIndex::new(center.row + r, center.col + r),
            );
            grid.max_in(footprint).map_or(0.0, |units| grid.to_meters(units))
        }
    }
}
