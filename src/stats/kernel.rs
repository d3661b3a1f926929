//! Smoothing kernels and bandwidth selection.

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::error::{CloudError, Result};

const SQRT_2PI: f64 = 2.5066282746310002;

/// Kernel shape used by the density estimator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kernel {
    /// Compact support: offsets beyond one bandwidth weigh nothing.
    #[default]
    Epanechnikov,
    Gaussian,
}

impl Kernel {
    /// Weighting function for this kernel at the given bandwidth.
    pub fn with_bandwidth(self, bandwidth: f64) -> Result<impl Fn(f64) -> f64 + Copy> {
        check_bandwidth(bandwidth)?;
        Ok(move |x: f64| match self {
            Kernel::Epanechnikov => epanechnikov_weight(x, bandwidth),
            Kernel::Gaussian => gaussian_weight(x, bandwidth),
        })
    }
}

/// Epanechnikov kernel: `0.75 * (1 - u^2) / h` for `|u| <= 1`, else 0.
pub fn epanechnikov(bandwidth: f64) -> Result<impl Fn(f64) -> f64 + Copy> {
    Kernel::Epanechnikov.with_bandwidth(bandwidth)
}

pub fn gaussian(bandwidth: f64) -> Result<impl Fn(f64) -> f64 + Copy> {
    Kernel::Gaussian.with_bandwidth(bandwidth)
}

#[inline]
fn epanechnikov_weight(x: f64, bandwidth: f64) -> f64 {
    let u = x / bandwidth;
    if u.abs() <= 1.0 {
        0.75 * (1.0 - u * u) / bandwidth
    } else {
        0.0
    }
}

#[inline]
fn gaussian_weight(x: f64, bandwidth: f64) -> f64 {
    let u = x / bandwidth;
    (-0.5 * u * u).exp() / (SQRT_2PI * bandwidth)
}

fn check_bandwidth(bandwidth: f64) -> Result<()> {
    if bandwidth.is_finite() && bandwidth > 0.0 {
        Ok(())
    } else {
        Err(Report::new(CloudError::InvalidParameter(format!(
            "bandwidth must be positive and finite, got {bandwidth}"
        ))))
    }
}

/// Silverman's rule of thumb, `1.06 * sigma * n^(-1/5)`.
///
/// Uses the population standard deviation of the finite values and never
/// returns less than `1e-3`, so constant samples still get a usable width.
pub fn silverman_bandwidth(data: &[f64]) -> Result<f64> {
    let values: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return Err(Report::new(CloudError::EmptyInput));
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

    Ok((1.06 * variance.sqrt() * n.powf(-0.2)).max(1e-3))
}
