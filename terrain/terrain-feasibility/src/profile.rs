//! Elevation profiles and jump-aware reduction.

use terrain_types::{CellIndex, HeightGrid};

use crate::line::CellLine;

/// Samples the grid at every cell of the line from `start` to `end`.
///
/// Cells outside the grid are skipped.
#[must_use]
pub fn sample_profile(grid: &HeightGrid, start: CellIndex, end: CellIndex) -> Vec<i16> {
    CellLine::new(start, end).filter_map(|cell| grid.get(cell)).collect()
}

/// Reduces a profile to the points a jumping robot would touch.
///
/// From position `i`, every offset `k` in `1..=window` costs
/// `|max(profile[i+1..=i+k]) - profile[i]|`. The cheapest offset wins, the
/// nearest on ties, and its sample is kept. Gaps narrower than the window are
/// jumped; walls are not, since the window maximum includes them.
///
/// # Example
///
/// ```
/// use terrain_feasibility::jump_reduce;
///
/// // A two-cell pit is cleared with a window of three cells
/// let reduced = jump_reduce(&[0, 0, -200, -200, 0, 0], 3);
/// assert_eq!(reduced, vec![0, 0, 0, 0]);
///
/// // A wall is climbed
/// let reduced = jump_reduce(&[0, 0, 100, 100], 3);
/// assert_eq!(reduced, vec![0, 0, 100, 100]);
/// ```
#[must_use]
pub fn jump_reduce(profile: &[i16], window: usize) -> Vec<i16> {
    let Some(&first) = profile.first() else {
        return Vec::new();
    };
    let window = window.max(1);
    let last = profile.len() - 1;

    let mut reduced = vec![first];
    let mut i = 0;
    while i < last {
        let here = i32::from(profile[i]);
        let reach = window.min(last - i);
        let mut best = (1, i32::MAX);
        let mut window_max = i32::MIN;
        for k in 1..=reach {
            window_max = window_max.max(i32::from(profile[i + k]));
            let cost = (window_max - here).abs();
            if cost < best.1 {
                best = (k, cost);
            }
        }
        i += best.0;
        reduced.push(profile[i]);
    }
    reduced
}

/// Largest absolute difference between adjacent samples, 0 for fewer than two.
#[must_use]
pub fn max_step(profile: &[i16]) -> i32 {
    profile
        .windows(2)
        .map(|pair| (i32::from(pair[1]) - i32::from(pair[0])).abs())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_single() {
        assert!(jump_reduce(&[], 5).is_empty());
        assert_eq!(jump_reduce(&[7], 5), vec![7]);
        assert_eq!(max_step(&[7]), 0);
    }

    #[test]
    fn test_flat_keeps_every_sample() {
        let reduced = jump_reduce(&[0; 6], 4);
        assert_eq!(reduced.len(), 6);
        assert_eq!(max_step(&reduced), 0);
    }

    #[test]
    fn test_wide_pit_is_entered() {
        let profile = [0, -200, -200, -200, -200, 0];
        let reduced = jump_reduce(&profile, 3);
        assert_eq!(max_step(&reduced), 200);
    }

    #[test]
    fn test_pit_cleared_to_higher_ledge() {
        let profile = [0, -200, -200, 40, 40];
        let reduced = jump_reduce(&profile, 4);
        assert_eq!(reduced, vec![0, 40, 40]);
        assert_eq!(max_step(&reduced), 40);
    }

    #[test]
    fn test_step_score_exact() {
        let mut profile = vec![0i16; 20];
        profile.extend(std::iter::repeat_n(100, 20));
        let reduced = jump_reduce(&profile, 20);
        assert_eq!(max_step(&reduced), 100);
    }

    #[test]
    fn test_reduction_never_exceeds_raw_step() {
        let profile = [0, 35, -80, 20, 20, -150, -150, 60, 10];
        for window in 1..6 {
            assert!(max_step(&jump_reduce(&profile, window)) <= max_step(&profile));
        }
    }

    #[test]
    fn test_window_one_is_identity() {
        let profile = [0, 35, -80, 20];
        assert_eq!(jump_reduce(&profile, 1), profile.to_vec());
    }

    #[test]
    fn test_sample_profile() {
        let mut grid = HeightGrid::new(10, 10, 0.1, 0.01).unwrap();
        grid.set(CellIndex::new(3, 0), 9);
        let profile = sample_profile(&grid, CellIndex::new(0, 0), CellIndex::new(5, 0));
        assert_eq!(profile, vec![0, 0, 0, 9, 0, 0]);
    }
}
