//! Grid layout of panels and the per-panel scales used to place clouds and
//! points.

use error_stack::Report;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BandScale, LinearScale};
use crate::config::LayoutConfig;
use crate::core::{Category, DistanceRecord, GridPosition, NormalizedDensity, Timepoint};
use crate::error::{CloudError, Result};
use crate::reshape::group_by_category;
use crate::stats;

/// Row and column scales for a grid of panels sharing one coordinate space.
///
/// Rows stack vertically and each carries a band scale over the categories;
/// columns sit side by side and each carries a linear distance scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridScales {
    pub rows: usize,
    pub columns: usize,
    pub row_scales: Vec<BandScale<Category>>,
    pub column_scales: Vec<LinearScale>,
    point_anchor: f64,
    cloud_offset: f64,
}

/// Build row and column scales for `panel_count` panels laid out
/// `column_count` to a row.
///
/// The drawable area inside the margins is split into padded bands, one per
/// row and one per column. Within a row the categories split that row's band
/// in the given order; within a column the distance domain spans the
/// column's band.
pub fn make_grid(
    panel_count: usize,
    column_count: usize,
    layout: &LayoutConfig,
    categories: &[Category],
) -> Result<GridScales> {
    if column_count == 0 {
        return Err(Report::new(CloudError::InvalidParameter(
            "column count must be at least 1".into(),
        )));
    }
    layout.validate()?;

    let rows = panel_count.div_ceil(column_count);
    debug!(panel_count, rows, columns = column_count, "building grid scales");

    let row_bands = BandScale::new((0..rows).collect(), layout.y_range())
        .padding_inner(layout.padding_inner)
        .padding_outer(layout.padding_outer);
    let column_bands = BandScale::new((0..column_count).collect(), layout.x_range())
        .padding_inner(layout.padding_inner)
        .padding_outer(layout.padding_outer);

    let row_scales = (0..rows)
        .filter_map(|row| row_bands.band(&row))
        .map(|range| {
            BandScale::new(categories.to_vec(), range)
                .padding_inner(layout.category_padding)
                .padding_outer(layout.category_padding)
        })
        .collect();
    let column_scales = (0..column_count)
        .filter_map(|col| column_bands.band(&col))
        .map(|range| LinearScale::new(layout.distance_domain, range))
        .collect();

    Ok(GridScales {
        rows,
        columns: column_count,
        row_scales,
        column_scales,
        point_anchor: layout.point_anchor,
        cloud_offset: layout.cloud_offset,
    })
}

impl GridScales {
    /// Grid for `panel_count` panels using the layout's column setting.
    pub fn for_layout(
        panel_count: usize,
        layout: &LayoutConfig,
        categories: &[Category],
    ) -> Result<Self> {
        let columns = layout
            .columns
            .unwrap_or_else(|| auto_columns(panel_count, layout.width / layout.height));
        make_grid(panel_count, columns, layout, categories)
    }

    /// Cell of the zero-based panel `index`, or `None` for a zero-column grid.
    pub fn position(&self, index: usize) -> Option<GridPosition> {
        GridPosition::of_index(index, self.columns)
    }

    /// Scales for the panel at `index`, or `None` past the last row.
    pub fn panel(&self, index: usize) -> Option<PanelScales> {
        let position = self.position(index)?;
        Some(PanelScales {
            position,
            categories: self.row_scales.get(position.row)?.clone(),
            distance: *self.column_scales.get(position.column)?,
            point_anchor: self.point_anchor,
            cloud_offset: self.cloud_offset,
        })
    }
}

/// Column count for `n` panels in an area with the given width/height ratio.
///
/// Small counts follow the aspect ratio; larger ones use a near-square grid.
pub fn auto_columns(n: usize, aspect: f64) -> usize {
    match n {
        0 | 1 => 1,
        2 => {
            if aspect > 1.35 {
                2
            } else {
                1
            }
        }
        3 => {
            if aspect > 1.35 {
                3
            } else {
                2
            }
        }
        _ => (n as f64).sqrt().ceil() as usize,
    }
}

/// The category and distance scales of a single panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelScales {
    pub position: GridPosition,
    pub categories: BandScale<Category>,
    pub distance: LinearScale,
    pub point_anchor: f64,
    pub cloud_offset: f64,
}

impl PanelScales {
    /// Scales for a standalone chart fitted to `records`.
    ///
    /// The distance domain is the data extent padded by 10% on each side and
    /// widened to round values; the categories are those present, in arrival
    /// order.
    pub fn single(records: &[DistanceRecord], layout: &LayoutConfig) -> Result<Self> {
        layout.validate()?;
        let distances: Vec<f64> = records.iter().map(|r| r.distance).collect();
        let (lo, hi) = stats::extent(&distances).ok_or_else(|| Report::new(CloudError::EmptyInput))?;
        let pad = (hi - lo) * 0.1;
        let (lo, hi) = stats::nice(lo - pad, hi + pad, stats::NICE_COUNT);

        let categories = group_by_category(records)
            .into_iter()
            .map(|(c, _)| c)
            .collect();

        Ok(Self {
            position: GridPosition { row: 0, column: 0 },
            categories: BandScale::new(categories, layout.y_range())
                .padding_inner(layout.category_padding)
                .padding_outer(layout.category_padding),
            distance: LinearScale::new([lo, hi], layout.x_range()),
            point_anchor: layout.point_anchor,
            cloud_offset: layout.cloud_offset,
        })
    }

    /// Line through the middle of a category's band, where clouds start.
    pub fn baseline(&self, category: &Category) -> Option<f64> {
        self.categories.center(category)
    }

    /// Pixel position of a raw data point.
    pub fn place(&self, record: &DistanceRecord) -> Option<DVec2> {
        let y = self.categories.position(&record.comparison)?
            + self.categories.bandwidth() * self.point_anchor;
        Some(DVec2::new(self.distance.apply(record.distance), y))
    }

    /// Scale from a cloud's estimate extent to its vertical pixel extent.
    ///
    /// The lowest estimate sits on the baseline. Start and unlabeled clouds
    /// rise to `cloud_offset` below the band's top edge; end clouds mirror
    /// them toward the band's bottom edge. The offset is capped at half the
    /// band, so a band narrower than twice the offset gives a flat cloud
    /// rather than one pointing the wrong way.
    pub fn cloud_scale(
        &self,
        category: &Category,
        density: &NormalizedDensity,
        timepoint: Option<Timepoint>,
    ) -> Option<LinearScale> {
        let [top, bottom] = self.categories.band(category)?;
        let baseline = (top + bottom) / 2.0;
        let offset = self.cloud_offset.min((bottom - top) / 2.0).max(0.0);
        let peak = match timepoint {
            Some(Timepoint::End) => bottom - offset,
            Some(Timepoint::Start) | None => top + offset,
        };
        let (lo, hi) = density.curve.estimate_extent()?;
        Some(LinearScale::new([lo, hi], [baseline, peak]))
    }
}
