//! Parameter resolution: physical targets to counts and coefficients.

use tracing::info;

use super::{HorizontalSquash, TransformCoefficients, VerticalClustering};
use crate::config::ChannelParameters;
use crate::error::ConfigError;
use crate::types::{Bounds2D, Resolution2D, even_floor};

/// Element counts and domain of a structured grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    pub resolution: Resolution2D,
    pub bounds: Bounds2D,
}

/// Everything needed to build the graded channel mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub grid: GridSpec,
    /// Elements across the central band (even)
    pub nx_mid: usize,
    /// Elements in the two side regions together (even)
    pub n_side: usize,
    /// Vertical count after the spacing correction, before scaling
    pub corrected_ny: usize,
    pub coefficients: TransformCoefficients,
    squash: HorizontalSquash,
}

impl GridLayout {
    pub fn vertical_clustering(&self) -> VerticalClustering {
        VerticalClustering::new(self.coefficients)
    }

    pub fn horizontal_squash(&self) -> HorizontalSquash {
        self.squash
    }
}

/// Resolve the channel parameters into a grid layout.
///
/// Counts follow the target spacings: `h_vortex` across the central band
/// and in the uniform part above the boundary layer, `hx_outside` in the
/// side regions.
///
/// 1. Horizontal counts are rounded down to even numbers.
/// 2. The clustering coefficients are derived from the nominal vertical
///    count: its first `percentage` elements form the boundary layer and
///    the blend height is their top.
/// 3. The transform stretches the uniform region above the blend height, so
///    the spacing it would achieve there is estimated and the vertical
///    count rescaled to reach `h_vortex`.
/// 4. All counts are multiplied by the scaling factor, horizontal ones
///    rounded down to even numbers again.
///
/// The coefficients stay those of the nominal count: the transform acts on
/// normalised heights, so they do not depend on the final count.
///
/// Pure: the same parameters always give the same layout.
///
/// # Errors
///
/// Any [`ChannelParameters::validate`] failure, and
/// [`ConfigError::EmptyResolution`] when a count rounds to zero.
pub fn resolve(params: &ChannelParameters) -> Result<GridLayout, ConfigError> {
    params.validate()?;
    let bounds = params.bounds();
    let height = bounds.height();

    let nx_mid = even_floor(params.band_width / params.h_vortex);
    let n_side = even_floor((bounds.width() - params.band_width) / params.hx_outside);

    let pct = params.percentage_in_boundary_layer;
    let ny = params.nominal_ny;
    let ny_bl = (ny as f64 * pct / 100.0) as usize;
    if ny_bl == 0 {
        return Err(ConfigError::EmptyResolution { name: "boundary layer" });
    }
    let blend_height = ny_bl as f64 / ny as f64 * height;

    let coefficients = TransformCoefficients::new(
        params.clustering_sharpness,
        blend_height,
        bounds.y_min,
        bounds.y_max,
    )?;
    info!(
        outer_edge = coefficients.outer_edge(),
        "outer edge of exponential region"
    );

    let uniform_spacing =
        (height - height / coefficients.normalising_factor) / (ny as f64 * (100.0 - pct) / 100.0);
    let corrected_ny = (ny as f64 * uniform_spacing / params.h_vortex) as usize;
    info!(from = ny, to = corrected_ny, "changed ny");

    let s = params.mesh_scaling_factor;
    let nx_mid = even_floor(nx_mid as f64 * s);
    let n_side = even_floor(n_side as f64 * s);
    let ny = (corrected_ny as f64 * s) as usize;

    for (name, count) in [("central band", nx_mid), ("side", n_side), ("vertical", ny)] {
        if count == 0 {
            return Err(ConfigError::EmptyResolution { name });
        }
    }
    let nx = nx_mid + n_side;

    let squash = HorizontalSquash::from_layout(&bounds, nx, nx_mid, params.band_half_width())?;

    Ok(GridLayout {
        grid: GridSpec {
            resolution: Resolution2D::new(nx, ny),
            bounds,
        },
        nx_mid,
        n_side,
        corrected_ny,
        coefficients,
        squash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = resolve(&ChannelParameters::default()).unwrap();
        assert_eq!(layout.nx_mid, 44);
        assert_eq!(layout.n_side, 6);
        assert_eq!(layout.corrected_ny, 171);
        assert_eq!(layout.grid.resolution, Resolution2D::new(50, 85));
        assert!((layout.coefficients.blend_height - 2.565).abs() < 1e-12);
    }

    #[test]
    fn test_unscaled_layout() {
        let params = ChannelParameters::default().with_mesh_scaling_factor(1.0);
        let layout = resolve(&params).unwrap();
        assert_eq!(layout.nx_mid, 90);
        assert_eq!(layout.n_side, 12);
        assert_eq!(layout.grid.resolution, Resolution2D::new(102, 171));
    }

    #[test]
    fn test_counts_even() {
        for &s in &[0.3, 0.5, 0.77, 1.0, 1.9] {
            let params = ChannelParameters::default().with_mesh_scaling_factor(s);
            let layout = resolve(&params).unwrap();
            assert_eq!(layout.nx_mid % 2, 0, "scaling {}: nx_mid {}", s, layout.nx_mid);
            assert_eq!(layout.n_side % 2, 0, "scaling {}: n_side {}", s, layout.n_side);
            assert_eq!(layout.grid.resolution.nx(), layout.nx_mid + layout.n_side);
        }
    }

    #[test]
    fn test_resolution_is_pure() {
        let params = ChannelParameters::default();
        assert_eq!(resolve(&params).unwrap(), resolve(&params).unwrap());
    }

    #[test]
    fn test_zero_sharpness_rejected() {
        let params = ChannelParameters::default().with_clustering_sharpness(0.0);
        assert_eq!(
            resolve(&params),
            Err(ConfigError::DegenerateSharpness { sharpness: 0.0 })
        );
    }

    #[test]
    fn test_empty_boundary_layer_rejected() {
        let params = ChannelParameters::default()
            .with_nominal_ny(1)
            .with_percentage_in_boundary_layer(50.0);
        assert_eq!(
            resolve(&params),
            Err(ConfigError::EmptyResolution { name: "boundary layer" })
        );
    }

    #[test]
    fn test_tiny_scaling_rejected() {
        let params = ChannelParameters::default().with_mesh_scaling_factor(0.01);
        assert!(matches!(
            resolve(&params),
            Err(ConfigError::EmptyResolution { .. })
        ));
    }

    #[test]
    fn test_achieved_spacing_near_target() {
        let params = ChannelParameters::default().with_mesh_scaling_factor(1.0);
        let layout = resolve(&params).unwrap();
        let ny = layout.grid.resolution.ny() as f64;
        let c = layout.coefficients;
        // Uniform part above the blend height receives (1 - pct) of the elements.
        let dy = (c.height() - c.outer_edge()) / (0.5 * ny);
        assert!((dy - params.h_vortex).abs() < 0.01 * params.h_vortex, "dy = {}", dy);
    }
}
