//! Kernel density estimation over a fixed set of thresholds.

use error_stack::Report;

use crate::core::{DensityCurve, DensityPoint};
use crate::error::{CloudError, Result};

/// Mean kernel weight of `data` at each threshold.
///
/// One point per threshold, in threshold order. Cost is
/// `O(thresholds * data)`; samples here are tens to hundreds of values.
pub fn kde<K>(kernel: K, thresholds: &[f64], data: &[f64]) -> Result<DensityCurve>
where
    K: Fn(f64) -> f64,
{
    if data.is_empty() {
        return Err(Report::new(CloudError::EmptyInput));
    }

    let n = data.len() as f64;
    let points = thresholds
        .iter()
        .map(|&t| {
            let estimate = data.iter().map(|&d| kernel(t - d)).sum::<f64>() / n;
            DensityPoint::new(t, estimate)
        })
        .collect();

    Ok(DensityCurve::new(points))
}
