//! One parameterized pipeline from grouped distances to positioned clouds.
//!
//! ```
//! use distance_clouds::prelude::*;
//!
//! let start = GroupedDistances::new()
//!     .with("soil", vec![0.61, 0.66, 0.7, 0.74])
//!     .with("fecal", vec![0.82, 0.85, 0.9]);
//! let end = GroupedDistances::new()
//!     .with("soil", vec![0.58, 0.6, 0.69])
//!     .with("fecal", vec![0.77, 0.8, 0.88, 0.93]);
//!
//! let fig = figure()
//!     .categories(["soil", "fecal"])
//!     .bandwidth(Bandwidth::Fixed(0.05))
//!     .add_panel(|p| p.title("Bucket 1").start(start).end(end))
//!     .build()?;
//!
//! assert_eq!(fig.panels[0].series.len(), 2);
//! assert_eq!(fig.panels[0].series[0].clouds.len(), 2);
//! # Ok::<(), error_stack::Report<CloudError>>(())
//! ```

use error_stack::{Report, ResultExt};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Bandwidth, DensityConfig, LayoutConfig};
use crate::core::{Category, Color, DistanceRecord, GroupedDistances, NormalizedDensity, Timepoint};
use crate::error::{CloudError, Result};
use crate::palette::color_for;
use crate::reshape::{reshape, values_for};
use crate::scale::{GridScales, LinearScale, PanelScales};
use crate::stats::{Kernel, calculate_density};

pub fn figure() -> FigureBuilder {
    FigureBuilder {
        density: DensityConfig::default(),
        layout: LayoutConfig::default(),
        panels: vec![],
    }
}

/// Samples of one panel, one entry per timepoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub title: Option<String>,
    pub series: Vec<SeriesSpec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub timepoint: Option<Timepoint>,
    pub distances: GroupedDistances,
}

pub struct FigureBuilder {
    density: DensityConfig,
    layout: LayoutConfig,
    panels: Vec<PanelSpec>,
}

impl FigureBuilder {
    pub fn density_config(mut self, config: DensityConfig) -> Self {
        self.density = config;
        self
    }

    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn categories<I, C>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        self.density = self.density.categories(categories);
        self
    }

    pub fn bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.density = self.density.bandwidth(bandwidth);
        self
    }

    pub fn kernel(mut self, kernel: Kernel) -> Self {
        self.density = self.density.kernel(kernel);
        self
    }

    /// Set the number of panels per row
    pub fn columns(mut self, cols: usize) -> Self {
        self.layout = self.layout.columns(cols);
        self
    }

    pub fn add_panel<F>(mut self, f: F) -> Self
    where
        F: FnOnce(PanelBuilder) -> PanelBuilder,
    {
        let b = f(PanelBuilder::new());
        self.panels.push(b.spec);
        self
    }

    pub fn add_panel_spec(mut self, spec: PanelSpec) -> Self {
        self.panels.push(spec);
        self
    }

    pub fn add_panels(mut self, specs: impl IntoIterator<Item = PanelSpec>) -> Self {
        self.panels.extend(specs);
        self
    }

    /// Compute every panel's clouds, points and scales.
    ///
    /// The first failing panel aborts the build; its error is returned as is.
    pub fn build(self) -> Result<Figure> {
        self.density.validate()?;
        let categories = &self.density.categories;
        let grid = GridScales::for_layout(self.panels.len(), &self.layout, categories)?;

        let mut panels = Vec::with_capacity(self.panels.len());
        for (index, spec) in self.panels.into_iter().enumerate() {
            let scales = grid.panel(index).ok_or_else(|| {
                Report::new(CloudError::InvalidParameter(format!(
                    "panel {index} falls outside the grid"
                )))
            })?;
            debug!(index, title = spec.title.as_deref(), position = ?scales.position, "computing panel");

            let series = spec
                .series
                .iter()
                .map(|s| compute_series(s, &scales, &self.density))
                .collect::<Result<Vec<_>>>()?;

            panels.push(Panel {
                title: spec.title,
                scales,
                series,
            });
        }

        Ok(Figure { grid, panels })
    }
}

pub struct PanelBuilder {
    spec: PanelSpec,
}

impl PanelBuilder {
    fn new() -> Self {
        Self {
            spec: PanelSpec::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.spec.title = Some(title.into());
        self
    }

    pub fn series(mut self, timepoint: Option<Timepoint>, distances: GroupedDistances) -> Self {
        self.spec.series.push(SeriesSpec {
            timepoint,
            distances,
        });
        self
    }

    /// Samples from the start of the time series
    pub fn start(self, distances: GroupedDistances) -> Self {
        self.series(Some(Timepoint::Start), distances)
    }

    /// Samples from the end of the time series
    pub fn end(self, distances: GroupedDistances) -> Self {
        self.series(Some(Timepoint::End), distances)
    }

    /// Samples without a timepoint label
    pub fn distances(self, distances: GroupedDistances) -> Self {
        self.series(None, distances)
    }
}

fn compute_series(
    spec: &SeriesSpec,
    scales: &PanelScales,
    config: &DensityConfig,
) -> Result<Series> {
    let records = reshape(&spec.distances, &config.categories)?;

    let points = records
        .iter()
        .map(|r| {
            scales
                .place(r)
                .ok_or_else(|| Report::new(CloudError::UnknownCategory(r.comparison.clone())))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut clouds = Vec::with_capacity(config.categories.len());
    for category in &config.categories {
        let values = values_for(&records, category);
        let density = calculate_density(&values, config)?;
        let color = color_for(category, spec.timepoint)?;
        let baseline = scales
            .baseline(category)
            .ok_or_else(|| Report::new(CloudError::UnknownCategory(category.clone())))?;
        let amplitude = scales
            .cloud_scale(category, &density, spec.timepoint)
            .ok_or_else(|| {
                Report::new(CloudError::DegenerateCurve(format!(
                    "no finite estimates for {category}"
                )))
            })?;

        clouds.push(Cloud {
            category: category.clone(),
            timepoint: spec.timepoint,
            color,
            density,
            baseline,
            amplitude,
        });
    }

    Ok(Series {
        timepoint: spec.timepoint,
        records,
        points,
        clouds,
    })
}

/// Everything a renderer needs to draw the figure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub grid: GridScales,
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).change_context(CloudError::Serialization("figure".into()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: Option<String>,
    pub scales: PanelScales,
    pub series: Vec<Series>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub timepoint: Option<Timepoint>,
    pub records: Vec<DistanceRecord>,
    /// Pixel position of each record, same order as `records`.
    pub points: Vec<DVec2>,
    pub clouds: Vec<Cloud>,
}

/// A normalized density for one category, with its placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub category: Category,
    pub timepoint: Option<Timepoint>,
    pub color: Color,
    pub density: NormalizedDensity,
    /// Vertical pixel position of the zero-density edge.
    pub baseline: f64,
    /// Estimate to vertical pixel position.
    pub amplitude: LinearScale,
}

impl Cloud {
    /// Upper outline of the cloud in pixels, one vertex per density point.
    pub fn outline(&self, distance: &LinearScale) -> Vec<DVec2> {
        self.density
            .curve
            .iter()
            .map(|p| DVec2::new(distance.apply(p.threshold), self.amplitude.apply(p.estimate)))
            .collect()
    }
}
