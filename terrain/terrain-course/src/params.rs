//! Course parameters.

use terrain_feasibility::FeasibilityParams;
use terrain_repair::RepairParams;
use terrain_types::{Point2, TileGeometry};

use crate::error::{CourseError, CourseResult};

/// How the spawn height of each tile origin is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OriginHeight {
    /// The same height for every tile, in meters.
    Fixed(f64),
    /// The highest elevation within `radius_m` of the spawn point, along
    /// both axes.
    SpawnMax {
        /// Half side of the square footprint in meters.
        radius_m: f64,
    },
}

impl Default for OriginHeight {
    fn default() -> Self {
        Self::SpawnMax { radius_m: 0.5 }
    }
}

/// Uniform noise overlaid on the finished course.
///
/// The amplitude of each row of tiles is interpolated between `easy_m` and
/// `hard_m` by the row's difficulty.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoughnessParams {
    /// Amplitude on the easiest row, in meters. Default: 0.0
    pub easy_m: f64,
    /// Amplitude on the hardest row, in meters. Default: 0.02
    pub hard_m: f64,
}

impl Default for RoughnessParams {
    fn default() -> Self {
        Self {
            easy_m: 0.0,
            hard_m: 0.02,
        }
    }
}

impl RoughnessParams {
    /// Amplitude in meters at `difficulty`.
    #[must_use]
    pub fn amplitude(&self, difficulty: f64) -> f64 {
        (self.hard_m - self.easy_m).mul_add(difficulty, self.easy_m)
    }
}

/// Configuration for [`CourseAssembler`](crate::CourseAssembler).
///
/// Rows of tiles run from easiest to hardest; columns vary the pattern.
///
/// # Example
///
/// ```
/// use terrain_course::CourseParams;
///
/// let params = CourseParams::small().with_seed(42);
/// assert!(params.validate().is_ok());
/// assert_eq!(params.tile_count(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CourseParams {
    /// Number of difficulty rows. Default: 10
    pub num_rows: usize,

    /// Number of variation columns. Default: 20
    pub num_cols: usize,

    /// Extent and resolution of every tile. Default: 8 m x 4 m at 5 cm, 5 mm
    pub tile: TileGeometry,

    /// Padding around the whole course, in meters. Default: 5.0
    pub border_m: f64,

    /// Height of the wall raised around each tile, in meters. Default: 0.5
    pub wall_height_m: f64,

    /// Width of that wall, in meters. Default: 0.1
    pub wall_width_m: f64,

    /// Generator names. Columns are split evenly between them, in order.
    /// Default: `["stairs_or_gaps"]`
    pub generators: Vec<String>,

    /// Course seed, added to every tile seed and seeding the roughness.
    /// Default: 0
    pub seed: u64,

    /// Tile-local spawn point. If None, 1 m in on the tile's center line.
    pub spawn_m: Option<Point2<f64>>,

    /// Spawn height rule. Default: highest point within 0.5 m
    pub origin_height: OriginHeight,

    /// Roughness overlay. If None, the course is left smooth.
    pub roughness: Option<RoughnessParams>,

    /// Repair pass settings.
    pub repair: RepairParams,

    /// Feasibility limits. If None, tiles are not checked.
    pub feasibility: Option<FeasibilityParams>,

    /// Tiles at or below this difficulty may be flat. If None, only the
    /// feasibility params decide.
    pub flat_allowed_max_difficulty: Option<f64>,
}

impl Default for CourseParams {
    fn default() -> Self {
        Self {
            num_rows: 10,
            num_cols: 20,
            tile: TileGeometry::new(8.0, 4.0, 0.05, 0.005),
            border_m: 5.0,
            wall_height_m: 0.5,
            wall_width_m: 0.1,
            generators: vec!["stairs_or_gaps".to_string()],
            seed: 0,
            spawn_m: None,
            origin_height: OriginHeight::default(),
            roughness: Some(RoughnessParams::default()),
            repair: RepairParams::default(),
            feasibility: Some(FeasibilityParams::default()),
            flat_allowed_max_difficulty: None,
        }
    }
}

impl CourseParams {
    /// A 2 x 3 course at 10 cm resolution with a 1 m border, for tests and
    /// demos.
    #[must_use]
    pub fn small() -> Self {
        Self {
            num_rows: 2,
            num_cols: 3,
            tile: TileGeometry::new(8.0, 4.0, 0.1, 0.005),
            border_m: 1.0,
            ..Default::default()
        }
    }

    /// Set the tile layout.
    #[must_use]
    pub const fn with_layout(mut self, rows: usize, cols: usize) -> Self {
        self.num_rows = rows;
        self.num_cols = cols;
        self
    }

    /// Set the tile geometry.
    #[must_use]
    pub const fn with_tile(mut self, tile: TileGeometry) -> Self {
        self.tile = tile;
        self
    }

    /// Set the generators, split evenly across columns.
    #[must_use]
    pub fn with_generators<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generators = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the course seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the roughness overlay.
    #[must_use]
    pub const fn with_roughness(mut self, roughness: Option<RoughnessParams>) -> Self {
        self.roughness = roughness;
        self
    }

    /// Set the feasibility limits.
    #[must_use]
    pub fn with_feasibility(mut self, feasibility: Option<FeasibilityParams>) -> Self {
        self.feasibility = feasibility;
        self
    }

    /// Set the spawn height rule.
    #[must_use]
    pub const fn with_origin_height(mut self, origin_height: OriginHeight) -> Self {
        self.origin_height = origin_height;
        self
    }

    /// Allow flat tiles up to `difficulty`.
    #[must_use]
    pub const fn with_flat_allowed_up_to(mut self, difficulty: f64) -> Self {
        self.flat_allowed_max_difficulty = Some(difficulty);
        self
    }

    /// Number of tiles.
    #[must_use]
    pub const fn tile_count(&self) -> usize {
        self.num_rows * self.num_cols
    }

    /// Tile-local spawn point.
    #[must_use]
    pub fn spawn_point(&self) -> Point2<f64> {
        self.spawn_m
            .unwrap_or_else(|| Point2::new(1.0, self.tile.width_m / 2.0))
    }

    /// Name of the generator for column `col`.
    #[must_use]
    pub fn generator_for(&self, col: usize) -> Option<&str> {
        let index = col * self.generators.len() / self.num_cols.max(1);
        self.generators.get(index).map(String::as_str)
    }

    /// Feasibility limits for a tile of `difficulty`, if tiles are checked.
    #[must_use]
    pub fn feasibility_for(&self, difficulty: f64) -> Option<FeasibilityParams> {
        let flat_ok = self
            .flat_allowed_max_difficulty
            .is_some_and(|max| difficulty <= max);
        self.feasibility.clone().map(|params| {
            if flat_ok {
                params.with_allow_flat(true)
            } else {
                params
            }
        })
    }

    /// Checks the layout, geometry, distances and nested params.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::Configuration`] describing the first problem.
    pub fn validate(&self) -> CourseResult<()> {
        if self.num_rows == 0 || self.num_cols == 0 {
            return Err(config(format!(
                "course needs at least one tile, got {}x{}",
                self.num_rows, self.num_cols
            )));
        }
        if self.generators.is_empty() {
            return Err(config("no generators configured".into()));
        }
        self.tile
            .validate()
            .map_err(|e| config(format!("invalid tile geometry: {e}")))?;

        for (name, value) in [
            ("border_m", self.border_m),
            ("wall_height_m", self.wall_height_m),
            ("wall_width_m", self.wall_width_m),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        let spawn = self.spawn_point();
        if !(spawn.x > 0.0
            && spawn.x < self.tile.length_m
            && spawn.y > 0.0
            && spawn.y < self.tile.width_m)
        {
            return Err(config(format!(
                "spawn ({}, {}) lies outside the tile",
                spawn.x, spawn.y
            )));
        }
        if let OriginHeight::SpawnMax { radius_m } = self.origin_height {
            if !(radius_m.is_finite() && radius_m >= 0.0) {
                return Err(config(format!("invalid spawn footprint radius {radius_m}")));
            }
        }
        if let Some(r) = &self.roughness {
            if !(r.easy_m >= 0.0 && r.hard_m >= 0.0 && r.easy_m.is_finite() && r.hard_m.is_finite()) {
                return Err(config(format!(
                    "roughness amplitudes must be finite and non-negative, got {} and {}",
                    r.easy_m, r.hard_m
                )));
            }
        }

        self.repair
            .validate()
            .map_err(|e| config(e.to_string()))?;
        if let Some(feasibility) = &self.feasibility {
            feasibility.validate().map_err(|e| config(e.to_string()))?;
        }
        Ok(())
    }
}

fn config(msg: String) -> CourseError {
    CourseError::Configuration(msg)
}
