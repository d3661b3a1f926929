//! Tests for the density pipeline: kernels, thresholds, estimation and
//! normalization working together through the public API.
//!
//! ## Test Organization
//!
//! 1. **Kernels** - support and symmetry
//! 2. **Thresholds** - ordering and coverage of the data
//! 3. **Estimation** - determinism and the five-point scenario
//! 4. **Normalization** - unit area and degenerate curves

use approx::{assert_abs_diff_eq, assert_relative_eq};
use distance_clouds::prelude::*;

fn bucket_sample() -> Vec<f64> {
    vec![
        0.58, 0.61, 0.615, 0.63, 0.66, 0.67, 0.69, 0.7, 0.74, 0.77, 0.79, 0.83,
    ]
}

// ============================================================================
// Kernels
// ============================================================================

#[test]
fn test_epanechnikov_vanishes_outside_bandwidth() {
    let k = epanechnikov(0.1).expect("positive bandwidth");
    for x in [0.1001, 0.25, -0.11, 3.0, -40.0] {
        assert_eq!(k(x), 0.0, "weight at {x}");
    }
    assert!(k(0.0) > 0.0);
    assert!(k(0.099) > 0.0);
}

#[test]
fn test_kernels_are_symmetric() {
    for kernel in [Kernel::Epanechnikov, Kernel::Gaussian] {
        let k = kernel.with_bandwidth(0.07).unwrap();
        for x in [0.0, 0.01, 0.03, 0.069, 0.2] {
            assert_relative_eq!(k(x), k(-x));
        }
    }
}

#[test]
fn test_kernels_reject_non_positive_bandwidth() {
    for h in [0.0, -0.1, f64::NAN, f64::INFINITY] {
        let err = epanechnikov(h).err().expect("bandwidth must be rejected");
        assert!(matches!(err.current_context(), CloudError::InvalidParameter(_)));
    }
}

// ============================================================================
// Thresholds
// ============================================================================

#[test]
fn test_thresholds_are_strictly_ascending() {
    let bucket = bucket_sample();
    let samples: [&[f64]; 4] = [
        &[0.1, 0.2, 0.3, 0.4, 0.5],
        &[0.512, 0.977],
        &[-3.0, 14.5, 2.2],
        &bucket,
    ];
    for data in samples {
        for n in [1, 5, 20, 50] {
            let t = get_thresholds(data, n).unwrap();
            assert!(!t.is_empty());
            assert!(t.windows(2).all(|w| w[0] < w[1]), "{t:?}");
        }
    }
}

#[test]
fn test_thresholds_cover_the_data_extent() {
    let data = bucket_sample();
    let t = get_thresholds(&data, 20).unwrap();
    let (lo, hi) = extent(&data).unwrap();
    assert!(t[0] <= lo + 1e-12);
    assert!(*t.last().unwrap() >= hi - 1e-12);
}

#[test]
fn test_thresholds_ignore_non_finite_values() {
    let t = get_thresholds(&[0.2, f64::NAN, 0.4, f64::INFINITY], 2).unwrap();
    assert_eq!(t, get_thresholds(&[0.2, 0.4], 2).unwrap());
}

#[test]
fn test_thresholds_of_empty_data_fail() {
    let err = get_thresholds(&[], 10).unwrap_err();
    assert!(matches!(err.current_context(), CloudError::EmptyInput));
    let err = get_thresholds(&[f64::NAN], 10).unwrap_err();
    assert!(matches!(err.current_context(), CloudError::EmptyInput));
}

// ============================================================================
// Estimation
// ============================================================================

#[test]
fn test_five_point_scenario() {
    let data = [0.1, 0.2, 0.3, 0.4, 0.5];
    let thresholds = get_thresholds(&data, 5).unwrap();
    assert!(thresholds[0] >= 0.0 && thresholds[0] <= 0.1 + 1e-12);
    assert!(*thresholds.last().unwrap() <= 0.6 && *thresholds.last().unwrap() >= 0.5 - 1e-12);

    let k = epanechnikov(0.1).unwrap();
    let curve = kde(k, &thresholds, &data).unwrap();
    assert_eq!(curve.len(), thresholds.len());

    let at = |x: f64| {
        curve
            .iter()
            .find(|p| (p.threshold - x).abs() < 1e-9)
            .map(|p| p.estimate)
            .expect("threshold present")
    };
    assert!(at(0.3) > 0.0);

    let far = kde(k, &[-1.0, 2.0], &data).unwrap();
    for p in &far {
        assert_abs_diff_eq!(p.estimate, 0.0);
    }
}

#[test]
fn test_huge_threshold_counts_fail_cleanly() {
    let config = DensityConfig::default()
        .bandwidth(Bandwidth::Fixed(0.05))
        .num_thresholds(usize::MAX);
    let err = calculate_density(&[0.6, 0.7, 0.8], &config).unwrap_err();
    assert!(matches!(err.current_context(), CloudError::InvalidParameter(_)));

    let err = get_thresholds(&[0.5, 1.0], usize::MAX).unwrap_err();
    assert!(matches!(err.current_context(), CloudError::InvalidParameter(_)));
    assert!(!get_thresholds(&[0.5, 1.0], MAX_TICKS).unwrap().is_empty());
}

#[test]
fn test_kde_is_deterministic() {
    let data = bucket_sample();
    let thresholds = get_thresholds(&data, 30).unwrap();
    let k = gaussian(0.03).unwrap();
    let a = kde(k, &thresholds, &data).unwrap();
    let b = kde(k, &thresholds, &data).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_kde_of_empty_data_is_an_error() {
    let k = epanechnikov(0.1).unwrap();
    let err = kde(k, &[0.0, 0.1], &[]).unwrap_err();
    assert!(matches!(err.current_context(), CloudError::EmptyInput));
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_normalized_curves_have_unit_area() {
    let data = bucket_sample();
    for config in [
        DensityConfig::default().bandwidth(Bandwidth::Fixed(0.05)),
        DensityConfig::default().kernel(Kernel::Gaussian).bandwidth(Bandwidth::Fixed(0.02)),
        DensityConfig::default().bandwidth(Bandwidth::Silverman),
        DensityConfig::default().bandwidth(Bandwidth::Fixed(0.05)).num_thresholds(60),
    ] {
        let density = calculate_density(&data, &config).unwrap();
        assert_abs_diff_eq!(trapezoid_area(&density.curve), 1.0, epsilon = 1e-6);
        assert!(density.curve.iter().all(|p| p.estimate >= 0.0));
    }
}

#[test]
fn test_constant_sample_is_degenerate() {
    let config = DensityConfig::default().bandwidth(Bandwidth::Fixed(0.05));
    let err = calculate_density(&[0.7, 0.7, 0.7], &config).unwrap_err();
    assert!(matches!(err.current_context(), CloudError::DegenerateCurve(_)));
}

#[test]
fn test_zero_area_curve_is_degenerate() {
    let curve = DensityCurve::new(vec![
        DensityPoint::new(0.0, 0.0),
        DensityPoint::new(0.5, 0.0),
        DensityPoint::new(1.0, 0.0),
    ]);
    let err = normalize(&curve).unwrap_err();
    assert!(matches!(err.current_context(), CloudError::DegenerateCurve(_)));
}
