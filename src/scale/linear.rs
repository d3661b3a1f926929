use serde::{Deserialize, Serialize};

use crate::stats;

/// Continuous scale mapping a numeric domain onto a pixel range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl LinearScale {
    pub const fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Pixel position of `x`. Values outside the domain extrapolate.
    ///
    /// A zero-width domain maps everything to the middle of the range.
    pub fn apply(&self, x: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let t = if d1 != d0 { (x - d0) / (d1 - d0) } else { 0.5 };
        r0 + t * (r1 - r0)
    }

    /// Like [`apply`](Self::apply) but pinned to the range ends.
    ///
    /// NaN domain ends impose no bound.
    pub fn apply_clamped(&self, x: f64) -> f64 {
        let [d0, d1] = self.domain;
        self.apply(x.max(d0.min(d1)).min(d0.max(d1)))
    }

    /// Domain value at pixel position `y`.
    pub fn invert(&self, y: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let t = if r1 != r0 { (y - r0) / (r1 - r0) } else { 0.5 };
        d0 + t * (d1 - d0)
    }

    /// Round values across the domain for axis ticks.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        stats::ticks(self.domain[0], self.domain[1], count)
    }

    /// Same scale with the domain widened to round boundaries.
    pub fn nice(self, count: usize) -> Self {
        let [d0, d1] = self.domain;
        let (lo, hi) = if d1 < d0 {
            let (lo, hi) = stats::nice(d1, d0, count);
            (hi, lo)
        } else {
            stats::nice(d0, d1, count)
        };
        Self {
            domain: [lo, hi],
            ..self
        }
    }
}
