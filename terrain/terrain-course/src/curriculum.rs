//! Difficulty, variation and seed of each tile.

// Layouts are far below 2^52 tiles
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

/// Difficulty of tile row `row` out of `rows`: `row / (rows - 1)`, or 0.5
/// for a single row.
#[must_use]
pub fn difficulty_for(row: usize, rows: usize) -> f64 {
    if rows <= 1 {
        0.5
    } else {
        row as f64 / (rows - 1) as f64
    }
}

/// Variation of tile column `col` out of `cols`: `col / cols`, in `[0, 1)`.
#[must_use]
pub fn variation_for(col: usize, cols: usize) -> f64 {
    col as f64 / cols.max(1) as f64
}

/// Seed of a tile's private RNG: `variation * 1e3 + difficulty * 1e6`,
/// rounded, plus the course seed.
///
/// # Example
///
/// ```
/// use terrain_course::tile_seed;
///
/// assert_eq!(tile_seed(0.5, 0.25, 0), 500_250);
/// assert_eq!(tile_seed(0.5, 0.25, 7), 500_257);
/// ```
#[must_use]
pub fn tile_seed(difficulty: f64, variation: f64, course_seed: u64) -> u64 {
    let base = variation.mul_add(1e3, difficulty * 1e6).round().max(0.0) as u64;
    base.wrapping_add(course_seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_difficulty_range() {
        assert_relative_eq!(difficulty_for(0, 5), 0.0);
        assert_relative_eq!(difficulty_for(4, 5), 1.0);
        assert_relative_eq!(difficulty_for(2, 5), 0.5);
        assert_relative_eq!(difficulty_for(0, 1), 0.5);
    }

    #[test]
    fn test_variation_below_one() {
        assert_relative_eq!(variation_for(0, 4), 0.0);
        assert_relative_eq!(variation_for(3, 4), 0.75);
        assert_relative_eq!(variation_for(0, 0), 0.0);
    }

    #[test]
    fn test_seeds_distinct_per_tile() {
        let mut seeds: Vec<_> = (0..10)
            .flat_map(|r| (0..20).map(move |c| tile_seed(difficulty_for(r, 10), variation_for(c, 20), 0)))
            .collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), 200);
    }
}
