use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use error_stack::{Report, ResultExt};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{CloudError, Result};

/// Label identifying a measurement group.
///
/// Categories are an open set keyed by name; the four constants below are
/// the groups the default palette and configuration know about.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const FOOD_COMPOST: &'static str = "food compost";
    pub const SOIL: &'static str = "soil";
    pub const FECAL: &'static str = "fecal";
    pub const BULKING_MATERIAL: &'static str = "bulking material";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The four known categories in their canonical order.
    pub fn known() -> Vec<Category> {
        [
            Self::FOOD_COMPOST,
            Self::SOIL,
            Self::FECAL,
            Self::BULKING_MATERIAL,
        ]
        .into_iter()
        .map(Category::from)
        .collect()
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for Category {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One raw distance value tagged with the group it was measured in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceRecord {
    pub comparison: Category,
    pub distance: f64,
}

impl DistanceRecord {
    pub fn new(comparison: impl Into<Category>, distance: f64) -> Self {
        Self {
            comparison: comparison.into(),
            distance,
        }
    }
}

/// Raw grouped input: category name to the distances measured for it.
///
/// Serialized as a plain JSON object, e.g. `{"soil": [0.6, 0.7], "fecal": [0.8]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedDistances(BTreeMap<Category, Vec<f64>>);

impl GroupedDistances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).change_context(CloudError::Serialization("grouped distances".into()))
    }

    pub fn with(mut self, category: impl Into<Category>, values: Vec<f64>) -> Self {
        self.insert(category, values);
        self
    }

    pub fn insert(&mut self, category: impl Into<Category>, values: Vec<f64>) {
        self.0.insert(category.into(), values);
    }

    pub fn get(&self, category: &str) -> Option<&[f64]> {
        self.0.get(category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<C: Into<Category>> FromIterator<(C, Vec<f64>)> for GroupedDistances {
    fn from_iter<I: IntoIterator<Item = (C, Vec<f64>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(c, v)| (c.into(), v)).collect())
    }
}

/// Density estimate at a single evaluation threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub threshold: f64,
    pub estimate: f64,
}

impl DensityPoint {
    pub const fn new(threshold: f64, estimate: f64) -> Self {
        Self {
            threshold,
            estimate,
        }
    }
}

impl From<DensityPoint> for DVec2 {
    #[inline]
    fn from(p: DensityPoint) -> Self {
        DVec2::new(p.threshold, p.estimate)
    }
}

/// Density points ordered by ascending threshold.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DensityCurve(Vec<DensityPoint>);

impl DensityCurve {
    pub fn new(points: Vec<DensityPoint>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[DensityPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DensityPoint> {
        self.0.iter()
    }

    /// Smallest and largest estimate on the curve.
    pub fn estimate_extent(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut any = false;
        for p in &self.0 {
            if !p.estimate.is_finite() {
                continue;
            }
            min = min.min(p.estimate);
            max = max.max(p.estimate);
            any = true;
        }
        any.then_some((min, max))
    }

    pub fn to_xy(&self) -> Vec<DVec2> {
        self.0.iter().copied().map(DVec2::from).collect()
    }
}

impl<'a> IntoIterator for &'a DensityCurve {
    type Item = &'a DensityPoint;
    type IntoIter = std::slice::Iter<'a, DensityPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A density curve rescaled to unit trapezoidal area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDensity {
    pub curve: DensityCurve,
    /// Area of the curve before rescaling.
    pub area: f64,
    /// Largest estimate after rescaling.
    pub max: f64,
}

/// Which end of a time series a set of samples was drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timepoint {
    #[serde(alias = "begin")]
    Start,
    End,
}

impl Timepoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timepoint::Start => "start",
            Timepoint::End => "end",
        }
    }
}

impl std::str::FromStr for Timepoint {
    type Err = Report<CloudError>;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" | "begin" => Ok(Timepoint::Start),
            "end" => Ok(Timepoint::End),
            other => Err(Report::new(CloudError::InvalidParameter(format!(
                "unknown timepoint {other:?}"
            )))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Build an opaque color from a packed `0xRRGGBB` value.
    pub const fn from_hex_rgb(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        )
    }

    pub const fn with_alpha8(self, a: u8) -> Self {
        self.with_a(a as f32 / 255.0)
    }

    /// `#rrggbbaa`
    pub fn to_hex(&self) -> String {
        let to8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            to8(self.r),
            to8(self.g),
            to8(self.b),
            to8(self.a)
        )
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
}

/// Pixel margins around the drawable area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(m: f64) -> Self {
        Self::new(m, m, m, m)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(150.0, 50.0, 150.0, 150.0)
    }
}

/// Row and column of a panel inside a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: usize,
    pub column: usize,
}

impl GridPosition {
    /// Cell for a zero-based panel index, filling rows left to right.
    /// `None` for a zero-column grid.
    pub const fn of_index(index: usize, columns: usize) -> Option<Self> {
        if columns == 0 {
            return None;
        }
        Some(Self {
            row: index / columns,
            column: index % columns,
        })
    }
}
