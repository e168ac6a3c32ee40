//! Run configuration.
//!
//! [`ChannelParameters`] holds the physical and meshing targets of the
//! channel problem; [`RunConfig`] holds the switches of a single run. Both
//! are plain values built once at start-up and passed by reference; nothing
//! reads global state.

use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::simulation::TimeSchedule;
use crate::types::{Bounds2D, Resolution2D};

/// Physical and meshing parameters of the vortex/wall channel problem.
///
/// # Example
///
/// ```
/// use gradmesh::config::ChannelParameters;
///
/// let params = ChannelParameters::default()
///     .with_reynolds(1000.0)
///     .with_mesh_scaling_factor(1.0);
///
/// assert!(params.validate().is_ok());
/// assert_eq!(params.band_half_width(), 2.25);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelParameters {
    /// Reynolds number
    pub reynolds: f64,
    /// Left end of the channel
    pub x_left: f64,
    /// Right end of the channel
    pub x_right: f64,
    /// Channel height above the wall `y = 0`
    pub height: f64,

    /// Overall scaling factor for the element counts
    pub mesh_scaling_factor: f64,
    /// Percentage of the nominal vertical elements placed in the boundary layer
    pub percentage_in_boundary_layer: f64,
    /// Exponential sharpness of the boundary-layer clustering
    pub clustering_sharpness: f64,
    /// Target spacing in the vortex region, both directions
    pub h_vortex: f64,
    /// Target horizontal spacing outside the central band
    pub hx_outside: f64,
    /// Physical width of the central band, centred on `x = 0`
    pub band_width: f64,
    /// Nominal vertical element count the resolver starts from
    pub nominal_ny: usize,

    /// Vortex centre
    pub vortex_center: [f64; 2],
    /// Lamb-Oseen core radius
    pub vortex_core_radius: f64,
    /// Peak vorticity of the vortex
    pub vortex_peak_vorticity: f64,
    /// Uniform background flow in `x`
    pub background_flow: f64,
}

impl Default for ChannelParameters {
    fn default() -> Self {
        Self {
            reynolds: 4000.0,
            x_left: -3.63,
            x_right: 3.63,
            height: 5.13,
            mesh_scaling_factor: 0.5,
            percentage_in_boundary_layer: 50.0,
            clustering_sharpness: 5.0,
            h_vortex: 0.05,
            hx_outside: 0.2,
            band_width: 4.5,
            nominal_ny: 10,
            vortex_center: [0.0, 1.0],
            vortex_core_radius: 0.3,
            vortex_peak_vorticity: -1.25,
            background_flow: 0.02812,
        }
    }
}

impl ChannelParameters {
    pub fn with_reynolds(mut self, reynolds: f64) -> Self {
        self.reynolds = reynolds;
        self
    }

    pub fn with_mesh_scaling_factor(mut self, factor: f64) -> Self {
        self.mesh_scaling_factor = factor;
        self
    }

    pub fn with_clustering_sharpness(mut self, sharpness: f64) -> Self {
        self.clustering_sharpness = sharpness;
        self
    }

    pub fn with_percentage_in_boundary_layer(mut self, percentage: f64) -> Self {
        self.percentage_in_boundary_layer = percentage;
        self
    }

    pub fn with_spacings(mut self, h_vortex: f64, hx_outside: f64) -> Self {
        self.h_vortex = h_vortex;
        self.hx_outside = hx_outside;
        self
    }

    pub fn with_band_width(mut self, band_width: f64) -> Self {
        self.band_width = band_width;
        self
    }

    pub fn with_nominal_ny(mut self, ny: usize) -> Self {
        self.nominal_ny = ny;
        self
    }

    /// Channel domain. Call [`validate`](Self::validate) first; degenerate
    /// extents panic here.
    pub fn bounds(&self) -> Bounds2D {
        Bounds2D::channel(self.x_left, self.x_right, self.height)
    }

    #[inline]
    pub fn band_half_width(&self) -> f64 {
        0.5 * self.band_width
    }

    /// Check every parameter the mesh depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("reynolds", self.reynolds),
            ("height", self.height),
            ("channel width", self.x_right - self.x_left),
            ("mesh scaling factor", self.mesh_scaling_factor),
            ("h_vortex", self.h_vortex),
            ("hx_outside", self.hx_outside),
            ("band width", self.band_width),
            ("vortex core radius", self.vortex_core_radius),
        ];
        for (name, value) in positive {
            // Written this way round so that NaN is rejected too.
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if !(self.clustering_sharpness > 0.0 && self.clustering_sharpness.is_finite()) {
            return Err(ConfigError::DegenerateSharpness {
                sharpness: self.clustering_sharpness,
            });
        }

        let pct = self.percentage_in_boundary_layer;
        if !(pct > 0.0 && pct < 100.0) {
            return Err(ConfigError::InvalidPercentage(pct));
        }

        if self.nominal_ny == 0 {
            return Err(ConfigError::EmptyResolution { name: "nominal vertical" });
        }

        let half_width = self.band_half_width();
        if !(-half_width > self.x_left && half_width < self.x_right) {
            return Err(ConfigError::BandTooWide {
                half_width,
                x_min: self.x_left,
                x_max: self.x_right,
            });
        }

        Ok(())
    }
}

/// Linear solver used inside each Newton step of the flow solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinearSolverChoice {
    /// Sparse direct factorisation
    #[default]
    Direct,
    /// GMRES preconditioned with a Schur-complement block preconditioner
    GmresSchurComplement,
}

impl fmt::Display for LinearSolverChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::GmresSchurComplement => write!(f, "GMRES with Schur-complement preconditioner"),
        }
    }
}

/// Switches of a single run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Run the recovery convergence check instead of preparing the simulation
    pub validate_projection: bool,
    pub linear_solver: LinearSolverChoice,
    /// Directory receiving tables and snapshots
    pub output_dir: PathBuf,
    /// Number of refinement levels in validation mode
    pub validation_levels: usize,
    /// Starting grid in validation mode
    pub validation_grid: Resolution2D,
    pub schedule: TimeSchedule,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            validate_projection: false,
            linear_solver: LinearSolverChoice::Direct,
            output_dir: PathBuf::from("RESLT"),
            validation_levels: 5,
            validation_grid: Resolution2D::square(10),
            schedule: TimeSchedule::default(),
        }
    }
}

impl RunConfig {
    pub fn validation() -> Self {
        Self {
            validate_projection: true,
            ..Self::default()
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_linear_solver(mut self, choice: LinearSolverChoice) -> Self {
        self.linear_solver = choice;
        self
    }

    pub fn with_validation_levels(mut self, levels: usize) -> Self {
        self.validation_levels = levels;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let p = ChannelParameters::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.bounds(), Bounds2D::new(-3.63, 3.63, 0.0, 5.13));
    }

    #[test]
    fn test_zero_sharpness_rejected() {
        let p = ChannelParameters::default().with_clustering_sharpness(0.0);
        assert_eq!(
            p.validate(),
            Err(ConfigError::DegenerateSharpness { sharpness: 0.0 })
        );

        let p = ChannelParameters::default().with_clustering_sharpness(f64::NAN);
        assert!(matches!(
            p.validate(),
            Err(ConfigError::DegenerateSharpness { .. })
        ));
    }

    #[test]
    fn test_percentage_bounds() {
        for pct in [0.0, 100.0, -5.0, 150.0] {
            let p = ChannelParameters::default().with_percentage_in_boundary_layer(pct);
            assert_eq!(p.validate(), Err(ConfigError::InvalidPercentage(pct)));
        }
    }

    #[test]
    fn test_non_positive_scaling_rejected() {
        let p = ChannelParameters::default().with_mesh_scaling_factor(0.0);
        assert!(matches!(
            p.validate(),
            Err(ConfigError::NonPositive {
                name: "mesh scaling factor",
                ..
            })
        ));
    }

    #[test]
    fn test_band_wider_than_channel_rejected() {
        let p = ChannelParameters::default().with_band_width(7.5);
        assert!(matches!(p.validate(), Err(ConfigError::BandTooWide { .. })));
    }

    #[test]
    fn test_run_config_defaults() {
        let cfg = RunConfig::default();
        assert!(!cfg.validate_projection);
        assert_eq!(cfg.validation_levels, 5);
        assert_eq!(cfg.validation_grid, Resolution2D::square(10));
        assert!(RunConfig::validation().validate_projection);
    }
}
