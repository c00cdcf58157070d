//! Uniform roughness overlay for the assembled course.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use terrain_types::HeightGrid;

use crate::curriculum::difficulty_for;
use crate::params::RoughnessParams;

/// Adds uniform integer noise in `[-a, a]` units to every cell of `grid`.
///
/// `a` is the roughness amplitude at the difficulty of the tile row a cell
/// falls in; border rows take the nearest tile row. Rows are visited in
/// order, so the result depends only on the RNG state.
pub(crate) fn apply_roughness(
    grid: &mut HeightGrid,
    roughness: &RoughnessParams,
    border_cells: usize,
    tile_rows: usize,
    num_rows: usize,
    rng: &mut ChaCha8Rng,
) {
    let amplitudes: Vec<i16> = (0..num_rows)
        .map(|row| grid.to_units(roughness.amplitude(difficulty_for(row, num_rows))).max(0))
        .collect();
    let cols = grid.cols();
    let last_row = num_rows.saturating_sub(1);

    for (r, row) in grid.samples_mut().chunks_mut(cols).enumerate() {
        let tile_row = (r.saturating_sub(border_cells) / tile_rows.max(1)).min(last_row);
        let amplitude = amplitudes.get(tile_row).copied().unwrap_or(0);
        if amplitude == 0 {
            continue;
        }
        for sample in row {
            *sample = sample.saturating_add(rng.gen_range(-amplitude..=amplitude));
        }
    }
}
