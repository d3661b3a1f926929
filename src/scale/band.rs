use serde::{Deserialize, Serialize};

/// Categorical scale dividing a pixel range into one padded band per key.
///
/// With `n` keys the range is split into steps of
/// `extent / max(1, n - inner + 2 * outer)`; each band is
/// `step * (1 - inner)` wide and the leftover space is distributed by
/// `align` (0.5 centers the bands).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandScale<K> {
    domain: Vec<K>,
    range: [f64; 2],
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl<K: PartialEq> BandScale<K> {
    pub fn new(domain: Vec<K>, range: [f64; 2]) -> Self {
        let mut scale = Self {
            domain,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            start: 0.0,
            step: 0.0,
            bandwidth: 0.0,
        };
        scale.rescale();
        scale
    }

    pub fn padding_inner(mut self, p: f64) -> Self {
        self.padding_inner = p.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    pub fn padding_outer(mut self, p: f64) -> Self {
        self.padding_outer = p.max(0.0);
        self.rescale();
        self
    }

    /// Set inner and outer padding to the same fraction.
    pub fn padding(self, p: f64) -> Self {
        self.padding_inner(p).padding_outer(p)
    }

    pub fn align(mut self, a: f64) -> Self {
        self.align = a.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let [r0, r1] = self.range;
        let (start, stop) = if r1 < r0 { (r1, r0) } else { (r0, r1) };
        let step = (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        self.start = start + (stop - start - step * (n - self.padding_inner)) * self.align;
        self.step = step;
        self.bandwidth = step * (1.0 - self.padding_inner);
    }

    pub fn domain(&self) -> &[K] {
        &self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Width of every band.
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Start of the band for `key`, or `None` if `key` is not in the domain.
    pub fn position(&self, key: &K) -> Option<f64> {
        let i = self.domain.iter().position(|k| k == key)?;
        let [r0, r1] = self.range;
        let offset = self.step * i as f64;
        if r1 < r0 {
            // bands run from the high end when the range is reversed
            let n = self.domain.len() as f64;
            Some(self.start + self.step * (n - 1.0) - offset)
        } else {
            Some(self.start + offset)
        }
    }

    /// `[start, start + bandwidth]` for `key`.
    pub fn band(&self, key: &K) -> Option<[f64; 2]> {
        self.position(key).map(|p| [p, p + self.bandwidth])
    }

    pub fn center(&self, key: &K) -> Option<f64> {
        self.position(key).map(|p| p + self.bandwidth / 2.0)
    }
}
