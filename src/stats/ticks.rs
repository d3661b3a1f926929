//! "Nice" extents and evenly spaced tick values.
//!
//! Steps are powers of ten multiplied by 1, 2 or 5. For a requested count the
//! raw step `(stop - start) / count` is snapped to whichever of those is
//! closest on a log scale (thresholds at sqrt(2), sqrt(10) and sqrt(50)).
//! Sub-unit steps are carried as a negative reciprocal so tick values are
//! produced by division, which keeps values like `0.3` exact.

use error_stack::Report;

use crate::error::{CloudError, Result};

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Step count used when widening a data extent to round boundaries.
pub const NICE_COUNT: usize = 10;

/// Largest tick or threshold count accepted anywhere in the pipeline.
pub const MAX_TICKS: usize = 10_000;

/// Half-up rounding, so `-2.5` rounds to `-2` like the classic tick algorithm.
#[inline]
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// `(i1, i2, inc)`: ticks run over `i1..=i2`; a negative `inc` means divide by `-inc`.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = round_half_up(start * inv);
        i2 = round_half_up(stop * inv);
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        let step = 10f64.powf(power) * factor;
        i1 = round_half_up(start / step);
        i2 = round_half_up(stop / step);
        if i1 * step < start {
            i1 += 1.0;
        }
        if i2 * step > stop {
            i2 -= 1.0;
        }
        inc = step;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Signed tick increment for `[start, stop]` split into about `count` steps.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64).2
}

/// About `count + 1` round values inside `[start, stop]`, ascending when
/// `start <= stop`.
///
/// Empty when the values would span more than [`MAX_TICKS`] steps.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return vec![];
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (i1, i2, inc) = if reverse {
        tick_spec(stop, start, count as f64)
    } else {
        tick_spec(start, stop, count as f64)
    };
    let span = i2 - i1;
    if !(span >= 0.0 && span <= MAX_TICKS as f64) {
        return vec![];
    }

    let n = span as usize + 1;
    let value = |i: usize| {
        let k = i1 + i as f64;
        if inc < 0.0 { k / -inc } else { k * inc }
    };

    if reverse {
        (0..n).rev().map(value).collect()
    } else {
        (0..n).map(value).collect()
    }
}

/// Widen `[start, stop]` outward until both ends sit on the tick step chosen
/// for `count`.
///
/// Repeats until the step stops changing, since widening can itself change
/// the step. Degenerate or non-finite extents come back unchanged.
pub fn nice(mut start: f64, mut stop: f64, count: usize) -> (f64, f64) {
    let mut prestep = None;
    loop {
        let step = tick_increment(start, stop, count);
        if Some(step) == prestep || step == 0.0 || !step.is_finite() {
            return (start, stop);
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        }
        prestep = Some(step);
    }
}

/// Smallest and largest finite value, or `None` if there are none.
pub fn extent(data: &[f64]) -> Option<(f64, f64)> {
    data.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Evaluation thresholds for a density estimate of `data`.
///
/// The data extent is widened to a nice extent at [`NICE_COUNT`] steps, then
/// split into roughly `num_thresholds` round, evenly spaced values. The exact
/// count may differ from the request. A sample whose values are all equal
/// yields that single value.
pub fn get_thresholds(data: &[f64], num_thresholds: usize) -> Result<Vec<f64>> {
    get_thresholds_with(data, num_thresholds, NICE_COUNT)
}

pub fn get_thresholds_with(
    data: &[f64],
    num_thresholds: usize,
    nice_count: usize,
) -> Result<Vec<f64>> {
    for (name, count) in [("num_thresholds", num_thresholds), ("nice_count", nice_count)] {
        if !(1..=MAX_TICKS).contains(&count) {
            return Err(Report::new(CloudError::InvalidParameter(format!(
                "{name} must lie in [1, {MAX_TICKS}], got {count}"
            ))));
        }
    }
    let (lo, hi) = extent(data).ok_or_else(|| Report::new(CloudError::EmptyInput))?;
    let (lo, hi) = nice(lo, hi, nice_count);

    let mut thresholds = ticks(lo, hi, num_thresholds);
    thresholds.dedup();
    Ok(thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len(), "{a:?} vs {b:?}");
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-12, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn ticks_use_round_steps() {
        assert_close(&ticks(0.0, 1.0, 10), &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]);
        assert_close(&ticks(0.0, 10.0, 5), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_close(&ticks(1.0, 9.0, 4), &[2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn ticks_keep_decimal_values_exact() {
        let t = ticks(0.0, 1.0, 10);
        assert_eq!(t[3], 0.3);
        assert_eq!(t[7], 0.7);
    }

    #[test]
    fn ticks_handle_reverse_and_degenerate_ranges() {
        assert_close(&ticks(10.0, 0.0, 5), &[10.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
        assert_eq!(ticks(0.4, 0.4, 10), vec![0.4]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
        assert!(ticks(f64::NAN, 1.0, 5).is_empty());
    }

    #[test]
    fn nice_widens_to_round_boundaries() {
        let (lo, hi) = nice(0.123, 0.876, 10);
        assert!((lo - 0.1).abs() < 1e-12);
        assert!((hi - 0.9).abs() < 1e-12);

        let (lo, hi) = nice(0.5, 0.5, 10);
        assert_eq!((lo, hi), (0.5, 0.5));
    }

    #[test]
    fn nice_extent_covers_the_data() {
        for (a, b) in [(0.513, 0.977), (0.02, 0.31), (3.7, 121.0), (-0.4, 0.45)] {
            let (lo, hi) = nice(a, b, 10);
            assert!(lo <= a && hi >= b, "[{lo}, {hi}] does not cover [{a}, {b}]");
        }
    }

    #[test]
    fn extent_ignores_non_finite_values() {
        assert_eq!(extent(&[0.3, f64::NAN, 0.1, f64::INFINITY]), Some((0.1, 0.3)));
        assert_eq!(extent(&[f64::NAN]), None);
        assert_eq!(extent(&[]), None);
    }

    #[test]
    fn thresholds_require_data() {
        let err = get_thresholds(&[], 20).unwrap_err();
        assert!(matches!(err.current_context(), CloudError::EmptyInput));
    }

    #[test]
    fn thresholds_reject_zero_count() {
        let err = get_thresholds(&[0.1, 0.2], 0).unwrap_err();
        assert!(matches!(err.current_context(), CloudError::InvalidParameter(_)));
    }

    #[test]
    fn thresholds_for_constant_sample_are_single_value() {
        assert_eq!(get_thresholds(&[0.7, 0.7], 20).unwrap(), vec![0.7]);
    }

    #[test]
    fn oversized_counts_are_rejected_not_allocated() {
        for n in [MAX_TICKS + 1, usize::MAX] {
            let err = get_thresholds(&[0.5, 1.0], n).unwrap_err();
            assert!(matches!(err.current_context(), CloudError::InvalidParameter(_)));
            let err = get_thresholds_with(&[0.5, 1.0], 10, n).unwrap_err();
            assert!(matches!(err.current_context(), CloudError::InvalidParameter(_)));
        }
        assert!(ticks(0.5, 1.0, usize::MAX).is_empty());
        assert!(ticks(0.0, 1e12, 1_000_000_000_000).is_empty());
    }
}
