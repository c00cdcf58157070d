//! Parameters for the repair pass.

use crate::error::{RepairError, RepairResult};

/// Configuration for [`repair_tile`](crate::repair_tile).
///
/// All lengths are in meters.
///
/// # Example
///
/// ```
/// use terrain_repair::RepairParams;
///
/// let params = RepairParams::default().with_spawn_flat_length(3.0);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepairParams {
    /// Elevations below this are raised to it. Default: -1.0
    pub depth_floor_m: f64,

    /// Minimum distance between a waypoint and any tile edge. Default: 0.5
    pub edge_margin_m: f64,

    /// Minimum waypoint X, keeping goals clear of the spawn. Default: 1.5
    pub min_goal_x_m: f64,

    /// Length of the spawn strip along X that is forced flat. Default: 2.0
    pub spawn_flat_length_m: f64,

    /// A cell belongs to an obstacle when it rises more than this above the
    /// tile minimum. Default: 0.05
    pub obstacle_step_threshold_m: f64,

    /// Minimum reachable long side of an obstacle footprint. Default: 0.6
    pub min_obstacle_long_m: f64,

    /// Minimum reachable short side of an obstacle footprint. Default: 0.4
    pub min_obstacle_short_m: f64,

    /// Long/short ratio above which an obstacle counts as a sliver. Default: 2.0
    pub sliver_aspect_ratio: f64,

    /// Largest fraction of waypoints that may be repaired. Default: 0.5
    pub max_repaired_fraction: f64,

    /// Whether to run obstacle repair at all. Default: true
    pub repair_obstacles: bool,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self {
            depth_floor_m: -1.0,
            edge_margin_m: 0.5,
            min_goal_x_m: 1.5,
            spawn_flat_length_m: 2.0,
            obstacle_step_threshold_m: 0.05,
            min_obstacle_long_m: 0.6,
            min_obstacle_short_m: 0.4,
            sliver_aspect_ratio: 2.0,
            max_repaired_fraction: 0.5,
            repair_obstacles: true,
        }
    }
}

impl RepairParams {
    /// Tolerates only a quarter of the waypoints being repaired.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_repaired_fraction: 0.25,
            ..Default::default()
        }
    }

    /// Accepts most generator output as-is: more waypoint repairs allowed and
    /// obstacle footprints left untouched.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            max_repaired_fraction: 0.75,
            repair_obstacles: false,
            ..Default::default()
        }
    }

    /// Set the spawn strip length.
    #[must_use]
    pub const fn with_spawn_flat_length(mut self, meters: f64) -> Self {
        self.spawn_flat_length_m = meters;
        self
    }

    /// Set the depth floor.
    #[must_use]
    pub const fn with_depth_floor(mut self, meters: f64) -> Self {
        self.depth_floor_m = meters;
        self
    }

    /// Set the minimum obstacle footprint.
    #[must_use]
    pub const fn with_min_obstacle(mut self, long_m: f64, short_m: f64) -> Self {
        self.min_obstacle_long_m = long_m;
        self.min_obstacle_short_m = short_m;
        self
    }

    /// Enable or disable obstacle repair.
    #[must_use]
    pub const fn with_repair_obstacles(mut self, enabled: bool) -> Self {
        self.repair_obstacles = enabled;
        self
    }

    /// Checks that the parameters describe a usable repair pass.
    ///
    /// # Errors
    ///
    /// Returns [`RepairError::InvalidParams`] naming the first bad field.
    pub fn validate(&self) -> RepairResult<()> {
        let non_negative = [
            ("edge_margin_m", self.edge_margin_m),
            ("min_goal_x_m", self.min_goal_x_m),
            ("spawn_flat_length_m", self.spawn_flat_length_m),
            ("obstacle_step_threshold_m", self.obstacle_step_threshold_m),
            ("min_obstacle_long_m", self.min_obstacle_long_m),
            ("min_obstacle_short_m", self.min_obstacle_short_m),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(RepairError::InvalidParams(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !self.depth_floor_m.is_finite() || self.depth_floor_m > 0.0 {
            return Err(RepairError::InvalidParams(format!(
                "depth_floor_m must be finite and <= 0, got {}",
                self.depth_floor_m
            )));
        }
        if self.min_obstacle_short_m > self.min_obstacle_long_m {
            return Err(RepairError::InvalidParams(
                "min_obstacle_short_m exceeds min_obstacle_long_m".to_string(),
            ));
        }
        if !(self.sliver_aspect_ratio >= 1.0) {
            return Err(RepairError::InvalidParams(format!(
                "sliver_aspect_ratio must be >= 1, got {}",
                self.sliver_aspect_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.max_repaired_fraction) {
            return Err(RepairError::InvalidParams(format!(
                "max_repaired_fraction must be in [0, 1], got {}",
                self.max_repaired_fraction
            )));
        }
        Ok(())
    }
}
