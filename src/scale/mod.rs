//! Coordinate scales.
//!
//! - `linear`: continuous numeric scales
//! - `band`: categorical band scales with padding
//! - `grid`: multi-panel grid layout built from the two

mod band;
mod grid;
mod linear;

pub use band::BandScale;
pub use grid::{GridScales, PanelScales, auto_columns, make_grid};
pub use linear::LinearScale;
