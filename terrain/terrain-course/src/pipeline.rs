//! Per-tile pipeline: generate, repair, verify, wall in.

use rand::SeedableRng;
use terrain_feasibility::{FeasibilityReport, check_feasibility};
use terrain_repair::{RepairLog, RepairedTile, repair_tile};
use terrain_types::{HeightGrid, TileSurface};
use tracing::debug;

use crate::adapter::{GeneratedTile, invoke_generator};
use crate::curriculum::{difficulty_for, tile_seed, variation_for};
use crate::error::{CourseError, CourseResult};
use crate::generator::{Generator, TileRng};
use crate::params::CourseParams;

/// A finished tile, ready to be placed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    /// Difficulty row.
    pub row: usize,
    /// Variation column.
    pub col: usize,
    /// Difficulty in `[0, 1]`.
    pub difficulty: f64,
    /// Variation in `[0, 1)`.
    pub variation: f64,
    /// Pattern index reported by the generator.
    pub generator_index: usize,
    /// Walled grid and tile-local waypoints.
    pub surface: TileSurface,
    /// Repairs applied to the generator output.
    pub repair_log: RepairLog,
    /// Feasibility result, if tiles are checked.
    pub feasibility: Option<FeasibilityReport>,
}

/// Runs one tile through the pipeline with its own RNG.
pub(crate) fn build_tile(
    params: &CourseParams,
    generator: &Generator,
    row: usize,
    col: usize,
) -> CourseResult<Tile> {
    let difficulty = difficulty_for(row, params.num_rows);
    let variation = variation_for(col, params.num_cols);
    let seed = tile_seed(difficulty, variation, params.seed);
    let mut rng = TileRng::seed_from_u64(seed);

    let GeneratedTile {
        surface,
        generator_index,
    } = invoke_generator(generator, &params.tile, difficulty, variation, &mut rng)?;

    let RepairedTile { mut surface, log } = repair_tile(surface, &params.repair)
        .map_err(|source| CourseError::Repair { row, col, source })?;

    let feasibility = params
        .feasibility_for(difficulty)
        .map(|limits| {
            check_feasibility(&surface.grid, &params.spawn_point(), &surface.waypoints, &limits)
                .map_err(|source| CourseError::Feasibility { row, col, source })
        })
        .transpose()?;

    let wall_cells = surface.grid.cells_for(params.wall_width_m);
    let wall_height = surface.grid.to_units(params.wall_height_m);
    raise_walls(&mut surface.grid, wall_cells, wall_height);

    debug!(
        row,
        col,
        difficulty,
        seed,
        generator_index,
        repairs = log.len(),
        score_m = feasibility.as_ref().map(|f| f.score_m),
        "Tile built"
    );

    Ok(Tile {
        row,
        col,
        difficulty,
        variation,
        generator_index,
        surface,
        repair_log: log,
        feasibility,
    })
}

/// Raises the outermost `width` cells on every side to at least `height`.
fn raise_walls(grid: &mut HeightGrid, width: usize, height: i16) {
    if width == 0 {
        return;
    }
    let (rows, cols) = (grid.rows(), grid.cols());
    for (i, sample) in grid.samples_mut().iter_mut().enumerate() {
        let (r, c) = (i / cols, i % cols);
        let edge = r < width || r + width >= rows || c < width || c + width >= cols;
        if edge && *sample < height {
            *sample = height;
        }
    }
}
