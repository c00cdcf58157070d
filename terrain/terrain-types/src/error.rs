//! Error types for terrain data model operations.

/// Errors that can occur when constructing or combining terrain types.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TerrainTypesError {
    /// A horizontal or vertical scale must be positive and finite.
    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f64),

    /// The grid dimensions are invalid.
    #[error("invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// The number of supplied samples does not match the grid dimensions.
    #[error("expected {expected} samples, got {actual}")]
    SampleCountMismatch {
        /// Number of samples implied by the dimensions.
        expected: usize,
        /// Number of samples actually supplied.
        actual: usize,
    },

    /// A tile extent is not a whole number of cells.
    #[error("extent {extent} m is not a whole number of {cell_size} m cells")]
    FractionalExtent {
        /// The physical extent in meters.
        extent: f64,
        /// The cell size in meters.
        cell_size: f64,
    },

    /// More waypoints were supplied than a tile holds.
    #[error("too many waypoints: {0} (a tile holds {max})", max = crate::WAYPOINT_COUNT)]
    TooManyWaypoints(usize),

    /// A region does not fit inside the target grid.
    #[error("region of {rows}x{cols} at ({row}, {col}) does not fit inside the grid")]
    RegionOutOfBounds {
        /// Target row offset.
        row: usize,
        /// Target column offset.
        col: usize,
        /// Region rows.
        rows: usize,
        /// Region columns.
        cols: usize,
    },

    /// Two grids with different scales cannot be combined.
    #[error("scale mismatch between grids")]
    ScaleMismatch,
}

/// Result type for terrain data model operations.
pub type TerrainTypesResult<T> = std::result::Result<T, TerrainTypesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TerrainTypesError::InvalidScale(-1.0);
        assert!(format!("{err}").contains("-1"));

        let err = TerrainTypesError::TooManyWaypoints(9);
        assert_eq!(format!("{err}"), "too many waypoints: 9 (a tile holds 8)");
    }
}
