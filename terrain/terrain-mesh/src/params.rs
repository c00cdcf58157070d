//! Parameters for the mesh strategies.

use crate::error::{MeshError, MeshResult};

/// Parameters for [`GridMesher`](crate::GridMesher).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMeshParams {
    /// Rise over run above which a step is turned into a vertical cliff face.
    /// `None` disables cliff detection. Default: `Some(0.75)`
    pub slope_threshold: Option<f64>,

    /// Cells by which the cliff edge mask is dilated. Default: 0
    pub edge_margin_cells: usize,
}

impl Default for GridMeshParams {
    fn default() -> Self {
        Self {
            slope_threshold: Some(0.75),
            edge_margin_cells: 0,
        }
    }
}

impl GridMeshParams {
    /// Plain triangulation: no cliff detection, no edge mask.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            slope_threshold: None,
            edge_margin_cells: 0,
        }
    }

    /// Set the slope threshold.
    #[must_use]
    pub const fn with_slope_threshold(mut self, slope: f64) -> Self {
        self.slope_threshold = Some(slope);
        self
    }

    /// Set the edge mask dilation.
    #[must_use]
    pub const fn with_edge_margin(mut self, cells: usize) -> Self {
        self.edge_margin_cells = cells;
        self
    }

    /// Checks the slope threshold.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidParams`] for a negative or non-finite slope.
    pub fn validate(&self) -> MeshResult<()> {
        match self.slope_threshold {
            Some(slope) if !(slope.is_finite() && slope >= 0.0) => Err(MeshError::InvalidParams(
                format!("slope_threshold must be finite and non-negative, got {slope}"),
            )),
            _ => Ok(()),
        }
    }
}

/// Parameters for [`simplify_mesh`](crate::simplify_mesh).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimplifyParams {
    /// Fraction of the original triangles to keep (0.0 to 1.0). Default: 0.5
    pub target_ratio: f64,

    /// Whether vertices on the mesh border stay where they are. Default: true
    pub preserve_boundary: bool,

    /// Largest quadric error a collapse may introduce. If None, no limit.
    pub max_error: Option<f64>,
}

impl Default for SimplifyParams {
    fn default() -> Self {
        Self {
            target_ratio: 0.5,
            preserve_boundary: true,
            max_error: None,
        }
    }
}

impl SimplifyParams {
    /// Create params keeping `ratio` of the triangles.
    #[must_use]
    pub fn with_target_ratio(ratio: f64) -> Self {
        Self {
            target_ratio: ratio.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Keep a quarter of the triangles.
    #[must_use]
    pub fn aggressive() -> Self {
        Self {
            target_ratio: 0.25,
            ..Default::default()
        }
    }

    /// Set the maximum collapse error.
    #[must_use]
    pub const fn with_max_error(mut self, max_error: f64) -> Self {
        self.max_error = Some(max_error);
        self
    }

    /// Set boundary preservation.
    #[must_use]
    pub const fn with_preserve_boundary(mut self, preserve: bool) -> Self {
        self.preserve_boundary = preserve;
        self
    }

    /// Checks the ratio and error bound.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidParams`] if the ratio is outside `[0, 1]`
    /// or the error bound is negative.
    pub fn validate(&self) -> MeshResult<()> {
        if !(0.0..=1.0).contains(&self.target_ratio) {
            return Err(MeshError::InvalidParams(format!(
                "target_ratio must be in [0, 1], got {}",
                self.target_ratio
            )));
        }
        match self.max_error {
            Some(err) if !(err >= 0.0) => Err(MeshError::InvalidParams(format!(
                "max_error must be non-negative, got {err}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Parameters for [`AdaptiveMesher`](crate::AdaptiveMesher).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptiveParams {
    /// Largest vertical deviation from the grid, in meters. Default: 0.02
    pub max_vertical_error_m: f64,

    /// Optional simplification pass after triangulation. Default: None
    pub simplify: Option<SimplifyParams>,
}

impl Default for AdaptiveParams {
    fn default() -> Self {
        Self {
            max_vertical_error_m: 0.02,
            simplify: None,
        }
    }
}

impl AdaptiveParams {
    /// Tight error bound for rendering.
    #[must_use]
    pub fn fine() -> Self {
        Self {
            max_vertical_error_m: 0.005,
            simplify: None,
        }
    }

    /// Loose error bound followed by simplification, for collision meshes.
    #[must_use]
    pub fn coarse() -> Self {
        Self {
            max_vertical_error_m: 0.05,
            simplify: Some(SimplifyParams::default()),
        }
    }

    /// Set the vertical error bound.
    #[must_use]
    pub const fn with_max_vertical_error(mut self, meters: f64) -> Self {
        self.max_vertical_error_m = meters;
        self
    }

    /// Add a simplification pass.
    #[must_use]
    pub fn with_simplify(mut self, simplify: SimplifyParams) -> Self {
        self.simplify = Some(simplify);
        self
    }

    /// Checks the error bound and any simplification parameters.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidParams`] for a negative error bound or
    /// invalid simplification parameters.
    pub fn validate(&self) -> MeshResult<()> {
        if !(self.max_vertical_error_m.is_finite() && self.max_vertical_error_m >= 0.0) {
            return Err(MeshError::InvalidParams(format!(
                "max_vertical_error_m must be finite and non-negative, got {}",
                self.max_vertical_error_m
            )));
        }
        self.simplify.as_ref().map_or(Ok(()), SimplifyParams::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = GridMeshParams::default();
        assert_eq!(params.slope_threshold, Some(0.75));
        assert!(params.validate().is_ok());
        assert!(GridMeshParams::plain().slope_threshold.is_none());
    }

    #[test]
    fn test_ratio_clamping() {
        let params = SimplifyParams::with_target_ratio(1.5);
        assert!((params.target_ratio - 1.0).abs() < 0.001);
        let params = SimplifyParams::with_target_ratio(-0.5);
        assert!(params.target_ratio.abs() < 0.001);
    }

    #[test]
    fn test_validate() {
        assert!(GridMeshParams::default().with_slope_threshold(-1.0).validate().is_err());
        assert!(AdaptiveParams::coarse().validate().is_ok());
        assert!(AdaptiveParams::fine().validate().is_ok());
        assert!(
            AdaptiveParams::default()
                .with_max_vertical_error(f64::NAN)
                .validate()
                .is_err()
        );
        let params = AdaptiveParams::default().with_simplify(SimplifyParams {
            target_ratio: 2.0,
            ..Default::default()
        });
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_builder() {
        let params = SimplifyParams::aggressive()
            .with_preserve_boundary(false)
            .with_max_error(0.01);
        assert!(!params.preserve_boundary);
        assert_eq!(params.max_error, Some(0.01));
    }
}
