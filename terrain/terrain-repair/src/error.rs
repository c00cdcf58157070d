//! Error types for the repair pass.

use terrain_types::Point2;

use crate::result::RepairLog;

/// Errors that abort the repair of a tile.
///
/// Fatal variants carry the log of repairs applied before the failure.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RepairError {
    /// More waypoints needed repair than the configured fraction allows.
    #[error("{repaired} of {total} waypoints needed repair (at most {allowed} allowed)")]
    TooManyRepairs {
        /// Waypoints that were repaired.
        repaired: usize,
        /// Total waypoints.
        total: usize,
        /// Largest number of repairs allowed.
        allowed: usize,
        /// Repairs applied before the failure.
        log: RepairLog,
    },

    /// A waypoint is still outside the tile after repair.
    #[error("waypoint {index} at ({x}, {y}) lies outside the tile", x = point.x, y = point.y)]
    InvalidWaypoint {
        /// Index of the offending waypoint.
        index: usize,
        /// Its position in tile-local meters.
        point: Point2<f64>,
        /// Repairs applied before the failure.
        log: RepairLog,
    },

    /// The repair parameters are unusable.
    #[error("invalid repair parameters: {0}")]
    InvalidParams(String),
}

impl RepairError {
    /// The repairs applied before the failure, if any were recorded.
    #[must_use]
    pub const fn log(&self) -> Option<&RepairLog> {
        match self {
            Self::TooManyRepairs { log, .. } | Self::InvalidWaypoint { log, .. } => Some(log),
            Self::InvalidParams(_) => None,
        }
    }
}

/// Result type for repair operations.
pub type RepairResult<T> = std::result::Result<T, RepairError>;
