//! Repair log types.

use std::fmt;

use terrain_types::CellBounds;

/// One repair that changed the tile.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum RepairAction {
    /// Waypoints were given in cells and multiplied by the cell size.
    WaypointsRescaled {
        /// Multiplier applied to every coordinate.
        factor: f64,
    },
    /// Cells below the depth floor were raised to it.
    DepthClamped {
        /// Number of cells raised.
        cells: usize,
    },
    /// An out-of-tile waypoint took the position of its neighbor.
    WaypointCopied {
        /// Index of the repaired waypoint.
        index: usize,
        /// Index of the waypoint it was copied from.
        from: usize,
    },
    /// A waypoint was pulled inside the edge margin.
    WaypointClamped {
        /// Index of the clamped waypoint.
        index: usize,
    },
    /// The spawn strip was flattened to zero elevation.
    SpawnFlattened {
        /// Number of cells changed.
        cells: usize,
    },
    /// An obstacle too small on both axes was lowered to the tile minimum.
    ObstacleErased {
        /// Bounding box of the erased obstacle.
        bounds: CellBounds,
        /// Number of cells lowered.
        cells: usize,
    },
    /// A thin obstacle was widened along its short axis.
    ObstacleExtended {
        /// Bounding box before extension.
        before: CellBounds,
        /// Bounding box after extension.
        after: CellBounds,
    },
}

impl fmt::Display for RepairAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaypointsRescaled { factor } => {
                write!(f, "waypoints rescaled from cells by {factor}")
            }
            Self::DepthClamped { cells } => write!(f, "{cells} cells raised to depth floor"),
            Self::WaypointCopied { index, from } => {
                write!(f, "waypoint {index} copied from waypoint {from}")
            }
            Self::WaypointClamped { index } => write!(f, "waypoint {index} clamped into tile"),
            Self::SpawnFlattened { cells } => write!(f, "{cells} spawn cells flattened"),
            Self::ObstacleErased { bounds, cells } => write!(
                f,
                "obstacle at rows {}..={} cols {}..={} erased ({cells} cells)",
                bounds.min.row, bounds.max.row, bounds.min.col, bounds.max.col
            ),
            Self::ObstacleExtended { before, after } => {
                let (r0, c0) = before.size();
                let (r1, c1) = after.size();
                write!(f, "obstacle extended from {r0}x{c0} to {r1}x{c1} cells")
            }
        }
    }
}

/// Ordered list of the repairs applied to a tile.
///
/// Empty when the tile needed no changes.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepairLog {
    actions: Vec<RepairAction>,
}

impl RepairLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Appends an action.
    pub fn push(&mut self, action: RepairAction) {
        self.actions.push(action);
    }

    /// Whether any repair fired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of recorded actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// The recorded actions in order.
    #[must_use]
    pub fn actions(&self) -> &[RepairAction] {
        &self.actions
    }

    /// Iterates over the recorded actions.
    pub fn iter(&self) -> std::slice::Iter<'_, RepairAction> {
        self.actions.iter()
    }

    /// Number of obstacles erased.
    #[must_use]
    pub fn obstacles_erased(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, RepairAction::ObstacleErased { .. }))
            .count()
    }

    /// Number of obstacles extended.
    #[must_use]
    pub fn obstacles_extended(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, RepairAction::ObstacleExtended { .. }))
            .count()
    }
}

impl<'a> IntoIterator for &'a RepairLog {
    type Item = &'a RepairAction;
    type IntoIter = std::slice::Iter<'a, RepairAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

impl fmt::Display for RepairLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.actions.is_empty() {
            return write!(f, "Repair: no changes");
        }
        write!(f, "Repair: {} actions", self.actions.len())?;
        for action in &self.actions {
            write!(f, "; {action}")?;
        }
        Ok(())
    }
}
