//! Trapezoidal area and rescaling of density curves to unit area.

use error_stack::Report;

use crate::core::{DensityCurve, DensityPoint, NormalizedDensity};
use crate::error::{CloudError, Result};

/// Trapezoidal area under consecutive points.
pub fn trapezoid_area(curve: &DensityCurve) -> f64 {
    curve
        .points()
        .windows(2)
        .map(|w| (w[0].estimate + w[1].estimate) / 2.0 * (w[1].threshold - w[0].threshold))
        .sum()
}

/// Rescale `curve` so its trapezoidal area is 1.
///
/// Fails on curves with fewer than two points and on zero or non-finite
/// area rather than emitting `inf`/`NaN` estimates.
pub fn normalize(curve: &DensityCurve) -> Result<NormalizedDensity> {
    if curve.len() < 2 {
        return Err(Report::new(CloudError::DegenerateCurve(format!(
            "need at least 2 points, got {}",
            curve.len()
        ))));
    }

    let area = trapezoid_area(curve);
    if !area.is_finite() || area <= 0.0 {
        return Err(Report::new(CloudError::DegenerateCurve(format!(
            "area is {area}"
        ))));
    }

    let points: Vec<DensityPoint> = curve
        .iter()
        .map(|p| DensityPoint::new(p.threshold, p.estimate / area))
        .collect();
    let max = points
        .iter()
        .map(|p| p.estimate)
        .fold(f64::NEG_INFINITY, f64::max);

    Ok(NormalizedDensity {
        curve: DensityCurve::new(points),
        area,
        max,
    })
}
