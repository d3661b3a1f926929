//! Density estimation for a single group of distances.
//!
//! - `kernel`: smoothing kernels and bandwidth selection
//! - `ticks`: nice extents and threshold generation
//! - `kde`: kernel density estimate at each threshold
//! - `normalize`: rescaling to unit trapezoidal area

mod kde;
mod kernel;
mod normalize;
mod ticks;

pub use kde::kde;
pub use kernel::{Kernel, epanechnikov, gaussian, silverman_bandwidth};
pub use normalize::{normalize, trapezoid_area};
pub use ticks::{
    MAX_TICKS, NICE_COUNT, extent, get_thresholds, get_thresholds_with, nice, tick_increment, ticks,
};

use tracing::debug;

use crate::config::{Bandwidth, DensityConfig};
use crate::core::NormalizedDensity;
use crate::error::Result;

/// Thresholds, density estimate and normalization for one sample.
pub fn calculate_density(data: &[f64], config: &DensityConfig) -> Result<NormalizedDensity> {
    let bandwidth = match config.bandwidth {
        Bandwidth::Fixed(h) => h,
        Bandwidth::Silverman => silverman_bandwidth(data)?,
    };
    let kernel = config.kernel.with_bandwidth(bandwidth)?;
    let thresholds = get_thresholds_with(data, config.num_thresholds, config.nice_count)?;
    let density = normalize(&kde(kernel, &thresholds, data)?)?;

    debug!(
        points = density.curve.len(),
        area = density.area,
        max = density.max,
        bandwidth,
        "normalized density"
    );

    Ok(density)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculate_density_yields_unit_area() {
        let data = [0.61, 0.64, 0.66, 0.7, 0.71, 0.73, 0.8];
        let config = DensityConfig::default().bandwidth(Bandwidth::Fixed(0.05));
        let density = calculate_density(&data, &config).unwrap();
        assert!((trapezoid_area(&density.curve) - 1.0).abs() < 1e-6);
        assert!(density.max > 0.0);
    }

    #[test]
    fn silverman_bandwidth_is_resolved_from_data() {
        let data = [0.52, 0.55, 0.6, 0.62, 0.68, 0.9];
        let config = DensityConfig::default().bandwidth(Bandwidth::Silverman);
        assert!(calculate_density(&data, &config).is_ok());
    }

    #[test]
    fn narrow_kernel_between_thresholds_is_degenerate() {
        // every threshold is farther than one bandwidth from every sample
        let data = [0.13, 0.27, 0.43];
        let config = DensityConfig::default()
            .bandwidth(Bandwidth::Fixed(0.001))
            .num_thresholds(10);
        let err = calculate_density(&data, &config).unwrap_err();
        assert!(matches!(
            err.current_context(),
            crate::error::CloudError::DegenerateCurve(_)
        ));
    }
}
