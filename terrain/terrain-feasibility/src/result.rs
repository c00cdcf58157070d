//! Result of a successful feasibility check.

use std::fmt;

/// Scores of a tile that passed the check.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeasibilityReport {
    /// Worst jump-reduced step, in elevation units.
    pub score_units: i32,
    /// Worst jump-reduced step, in meters.
    pub score_m: f64,
    /// Highest elevation on the tile, in meters.
    pub max_height_m: f64,
    /// Number of path segments checked, spawn segment included.
    pub segments: usize,
}

impl FeasibilityReport {
    /// Whether the path had no elevation change.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.score_units == 0
    }
}

impl fmt::Display for FeasibilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Feasibility: score {:.3} m ({} units) over {} segments, max height {:.3} m",
            self.score_m, self.score_units, self.segments, self.max_height_m
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let report = FeasibilityReport {
            score_units: 100,
            score_m: 0.5,
            max_height_m: 0.5,
            segments: 8,
        };
        let display = format!("{report}");
        assert!(display.contains("0.500 m"));
        assert!(display.contains("100 units"));
        assert!(!report.is_flat());
    }
}
