//! Error types for course assembly.

use terrain_feasibility::FeasibilityError;
use terrain_mesh::MeshError;
use terrain_repair::{RepairError, RepairLog};
use terrain_types::TerrainTypesError;
use thiserror::Error;

/// Errors that abort course assembly.
///
/// Nothing is retried: a course is either entirely valid or not built.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseError {
    /// Unknown generator, generator output of the wrong shape, or unusable
    /// course parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A tile could not be repaired.
    #[error("tile ({row}, {col}) failed repair: {source}")]
    Repair {
        /// Difficulty row of the tile.
        row: usize,
        /// Variation column of the tile.
        col: usize,
        /// The repair failure, carrying the repairs applied before it.
        #[source]
        source: RepairError,
    },

    /// A repaired tile is not traversable.
    #[error("tile ({row}, {col}) is infeasible: {source}")]
    Feasibility {
        /// Difficulty row of the tile.
        row: usize,
        /// Variation column of the tile.
        col: usize,
        /// The failed check, with score and bound.
        #[source]
        source: FeasibilityError,
    },

    /// Grid construction or pasting failed.
    #[error(transparent)]
    Types(#[from] TerrainTypesError),

    /// Mesh conversion failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

impl CourseError {
    /// The `(row, col)` of the failing tile, for per-tile failures.
    #[must_use]
    pub const fn tile(&self) -> Option<(usize, usize)> {
        match self {
            Self::Repair { row, col, .. } | Self::Feasibility { row, col, .. } => Some((*row, *col)),
            _ => None,
        }
    }

    /// The repair log of a failed repair.
    #[must_use]
    pub const fn repair_log(&self) -> Option<&RepairLog> {
        match self {
            Self::Repair { source, .. } => source.log(),
            _ => None,
        }
    }
}

/// Result type for course operations.
pub type CourseResult<T> = std::result::Result<T, CourseError>;
