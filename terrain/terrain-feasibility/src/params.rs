//! Parameters for the feasibility check.

use crate::error::{FeasibilityError, FeasibilityResult};

/// Robot capability limits used by [`check_feasibility`](crate::check_feasibility).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeasibilityParams {
    /// Longest distance the robot clears in one jump, in meters. Default: 1.0
    pub skip_window_m: f64,

    /// Highest elevation allowed anywhere on the tile, in meters. Default: 3.0
    pub max_height_m: f64,

    /// Largest climb or drop allowed along the path, in meters. Default: 0.8
    pub max_score_m: f64,

    /// Whether a path with no elevation change passes. Default: false
    pub allow_flat: bool,
}

impl Default for FeasibilityParams {
    fn default() -> Self {
        Self {
            skip_window_m: 1.0,
            max_height_m: 3.0,
            max_score_m: 0.8,
            allow_flat: false,
        }
    }
}

impl FeasibilityParams {
    /// Limits for a more capable robot; flat tiles pass.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            skip_window_m: 1.5,
            max_score_m: 1.2,
            allow_flat: true,
            ..Default::default()
        }
    }

    /// Set whether flat paths pass.
    #[must_use]
    pub const fn with_allow_flat(mut self, allow: bool) -> Self {
        self.allow_flat = allow;
        self
    }

    /// Set the jump window.
    #[must_use]
    pub const fn with_skip_window(mut self, meters: f64) -> Self {
        self.skip_window_m = meters;
        self
    }

    /// Set the largest allowed climb or drop.
    #[must_use]
    pub const fn with_max_score(mut self, meters: f64) -> Self {
        self.max_score_m = meters;
        self
    }

    /// Checks that every limit is positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`FeasibilityError::InvalidParams`] naming the first bad field.
    pub fn validate(&self) -> FeasibilityResult<()> {
        for (name, value) in [
            ("skip_window_m", self.skip_window_m),
            ("max_height_m", self.max_height_m),
            ("max_score_m", self.max_score_m),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FeasibilityError::InvalidParams(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}
