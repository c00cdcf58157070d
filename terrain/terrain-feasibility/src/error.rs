//! Error types for the feasibility check.

/// Reasons a tile is rejected as untraversable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum FeasibilityError {
    /// Some cell of the tile is higher than allowed.
    #[error("tile height {height_m:.3} m exceeds the {bound_m} m ceiling")]
    HeightCeilingExceeded {
        /// Highest elevation on the tile.
        height_m: f64,
        /// Configured ceiling.
        bound_m: f64,
    },

    /// The path contains a climb or drop larger than the robot manages.
    #[error("feasibility score {score_m:.3} m exceeds the {bound_m} m limit")]
    ScoreTooHigh {
        /// Worst jump-reduced step along the path.
        score_m: f64,
        /// Configured limit.
        bound_m: f64,
    },

    /// The path has no elevation change at all.
    #[error("feasibility score {score_m} m: flat terrain is not allowed")]
    FlatTerrain {
        /// Always zero.
        score_m: f64,
    },

    /// The feasibility parameters are unusable.
    #[error("invalid feasibility parameters: {0}")]
    InvalidParams(String),
}

impl FeasibilityError {
    /// The offending score, for score-related failures.
    #[must_use]
    pub const fn score_m(&self) -> Option<f64> {
        match self {
            Self::ScoreTooHigh { score_m, .. } | Self::FlatTerrain { score_m } => Some(*score_m),
            _ => None,
        }
    }
}

/// Result type for feasibility operations.
pub type FeasibilityResult<T> = std::result::Result<T, FeasibilityError>;
