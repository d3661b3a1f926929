//! Pipeline configuration.
//!
//! Both configs deserialize from JSON with every field optional, so a
//! caller can override only what differs from the defaults:
//!
//! ```
//! use distance_clouds::config::{DensityConfig, LayoutConfig};
//!
//! let density = DensityConfig::from_json(r#"{"bandwidth": {"fixed": 0.02}}"#)?;
//! let layout = LayoutConfig::from_json(r#"{"columns": 4}"#)?;
//! assert_eq!(density.num_thresholds, 20);
//! assert_eq!(layout.columns, Some(4));
//! # Ok::<(), error_stack::Report<distance_clouds::CloudError>>(())
//! ```

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};

use crate::core::{Category, Margins};
use crate::error::{CloudError, Result};
use crate::stats::{Kernel, MAX_TICKS};

/// How the kernel bandwidth is chosen for each sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bandwidth {
    Fixed(f64),
    /// Silverman's rule of thumb, computed per sample.
    Silverman,
}

impl Default for Bandwidth {
    fn default() -> Self {
        Self::Fixed(0.01)
    }
}

/// Settings for turning grouped distances into density curves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
    /// Categories to reshape and estimate, in output order.
    pub categories: Vec<Category>,
    pub bandwidth: Bandwidth,
    pub kernel: Kernel,
    /// Requested number of evaluation thresholds (approximate).
    pub num_thresholds: usize,
    /// Step count used to widen each sample's extent to round values.
    pub nice_count: usize,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            categories: Category::known(),
            bandwidth: Bandwidth::default(),
            kernel: Kernel::default(),
            num_thresholds: 20,
            nice_count: crate::stats::NICE_COUNT,
        }
    }
}

impl DensityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .change_context(CloudError::Serialization("density config".into()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn categories<I, C>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn num_thresholds(mut self, n: usize) -> Self {
        self.num_thresholds = n;
        self
    }

    pub fn nice_count(mut self, n: usize) -> Self {
        self.nice_count = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Bandwidth::Fixed(h) = self.bandwidth {
            if !(h.is_finite() && h > 0.0) {
                return Err(invalid(format!("bandwidth must be positive, got {h}")));
            }
        }
        for (name, count) in [
            ("num_thresholds", self.num_thresholds),
            ("nice_count", self.nice_count),
        ] {
            if !(1..=MAX_TICKS).contains(&count) {
                return Err(invalid(format!(
                    "{name} must lie in [1, {MAX_TICKS}], got {count}"
                )));
            }
        }
        Ok(())
    }
}

/// Pixel geometry of a figure and the grid of panels inside it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margins,
    /// Panels per row; `None` picks a count from the panel count and aspect ratio.
    pub columns: Option<usize>,
    /// Gap between grid bands, as a fraction of the band step.
    pub padding_inner: f64,
    /// Space before the first and after the last grid band, as a fraction of the step.
    pub padding_outer: f64,
    /// Padding between category bands inside a row.
    pub category_padding: f64,
    /// Distance values mapped onto each column.
    pub distance_domain: [f64; 2],
    /// Pixel offset from the band edge to the tallest point of a cloud.
    pub cloud_offset: f64,
    /// Where raw points sit inside their category band, as a fraction of its width.
    pub point_anchor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 900.0,
            margin: Margins::default(),
            columns: Some(3),
            padding_inner: 0.1,
            padding_outer: 0.1,
            category_padding: 0.0,
            distance_domain: [0.5, 1.0],
            cloud_offset: 25.0,
            point_anchor: 0.75,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .change_context(CloudError::Serialization("layout config".into()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn margin(mut self, margin: Margins) -> Self {
        self.margin = margin;
        self
    }

    /// Set the number of panels per row
    pub fn columns(mut self, cols: usize) -> Self {
        self.columns = Some(cols.max(1));
        self
    }

    /// Choose the column count from the panel count
    pub fn auto_columns(mut self) -> Self {
        self.columns = None;
        self
    }

    pub fn padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner;
        self.padding_outer = outer;
        self
    }

    pub fn category_padding(mut self, padding: f64) -> Self {
        self.category_padding = padding;
        self
    }

    pub fn distance_domain(mut self, lo: f64, hi: f64) -> Self {
        self.distance_domain = [lo, hi];
        self
    }

    pub fn cloud_offset(mut self, offset: f64) -> Self {
        self.cloud_offset = offset;
        self
    }

    pub fn point_anchor(mut self, anchor: f64) -> Self {
        self.point_anchor = anchor;
        self
    }

    /// Horizontal pixel extent inside the margins.
    pub fn x_range(&self) -> [f64; 2] {
        [self.margin.left, self.width - self.margin.right]
    }

    /// Vertical pixel extent inside the margins.
    pub fn y_range(&self) -> [f64; 2] {
        [self.margin.top, self.height - self.margin.bottom]
    }

    pub fn validate(&self) -> Result<()> {
        let [x0, x1] = self.x_range();
        let [y0, y1] = self.y_range();
        if !(x1 > x0 && y1 > y0) {
            return Err(invalid(format!(
                "margins leave no drawable area in {}x{}",
                self.width, self.height
            )));
        }
        if self.columns == Some(0) {
            return Err(invalid("column count must be at least 1"));
        }
        for (name, p) in [
            ("padding_inner", self.padding_inner),
            ("padding_outer", self.padding_outer),
            ("category_padding", self.category_padding),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(format!("{name} must lie in [0, 1], got {p}")));
            }
        }
        if !(self.cloud_offset.is_finite() && self.cloud_offset >= 0.0) {
            return Err(invalid(format!(
                "cloud_offset must be finite and non-negative, got {}",
                self.cloud_offset
            )));
        }
        if !(0.0..=1.0).contains(&self.point_anchor) {
            return Err(invalid(format!(
                "point_anchor must lie in [0, 1], got {}",
                self.point_anchor
            )));
        }
        let [d0, d1] = self.distance_domain;
        if !(d0.is_finite() && d1.is_finite()) || d0 == d1 {
            return Err(invalid(format!(
                "distance domain [{d0}, {d1}] must be finite and non-empty"
            )));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> Report<CloudError> {
    Report::new(CloudError::InvalidParameter(msg.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_known_categories() {
        let config = DensityConfig::default();
        assert_eq!(config.categories, Category::known());
        assert_eq!(config.bandwidth, Bandwidth::Fixed(0.01));
        assert_eq!(config.kernel, Kernel::Epanechnikov);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn density_config_overrides_from_json() {
        let config = DensityConfig::from_json(
            r#"{"categories": ["soil", "fecal"], "bandwidth": "silverman", "num_thresholds": 40}"#,
        )
        .unwrap();
        assert_eq!(config.categories, vec![Category::from("soil"), Category::from("fecal")]);
        assert_eq!(config.bandwidth, Bandwidth::Silverman);
        assert_eq!(config.num_thresholds, 40);
        assert_eq!(config.nice_count, 10);
    }

    #[test]
    fn density_config_rejects_bad_bandwidth() {
        let err = DensityConfig::from_json(r#"{"bandwidth": {"fixed": -0.1}}"#).unwrap_err();
        assert!(matches!(err.current_context(), CloudError::InvalidParameter(_)));
    }

    #[test]
    fn layout_ranges_respect_margins() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.x_range(), [150.0, 950.0]);
        assert_eq!(layout.y_range(), [150.0, 750.0]);
    }

    #[test]
    fn layout_rejects_margins_larger_than_figure() {
        let layout = LayoutConfig::default().size(100.0, 100.0);
        assert!(layout.validate().is_err());
    }

    #[test]
    fn layout_rejects_out_of_range_padding() {
        assert!(LayoutConfig::default().padding(1.5, 0.1).validate().is_err());
        assert!(LayoutConfig::default().padding(0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn density_config_rejects_oversized_counts() {
        let config = DensityConfig::default().num_thresholds(usize::MAX);
        assert!(config.validate().is_err());
        let err = DensityConfig::from_json(r#"{"nice_count": 20000}"#).unwrap_err();
        assert!(matches!(err.current_context(), CloudError::InvalidParameter(_)));
        assert!(DensityConfig::default().num_thresholds(MAX_TICKS).validate().is_ok());
    }

    #[test]
    fn layout_rejects_bad_cloud_geometry() {
        assert!(LayoutConfig::default().cloud_offset(f64::NAN).validate().is_err());
        assert!(LayoutConfig::default().cloud_offset(-1.0).validate().is_err());
        assert!(LayoutConfig::default().point_anchor(f64::INFINITY).validate().is_err());
        assert!(LayoutConfig::default().point_anchor(1.5).validate().is_err());
        assert!(LayoutConfig::default().point_anchor(0.0).validate().is_ok());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = LayoutConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err.current_context(), CloudError::Serialization(_)));
    }
}
