//! WASM API exports for JavaScript interop
//!
//! Figures are assembled from JSON panel specs and returned as JSON, so a
//! page script can draw the clouds with whatever it already uses for SVG.
//! Only compiled when targeting wasm32.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::prelude::*;

use crate::config::{DensityConfig, LayoutConfig};
use crate::core::GroupedDistances;
use crate::error::CloudError;
use crate::figure::{PanelSpec, SeriesSpec, figure};

fn to_js(report: error_stack::Report<CloudError>) -> JsValue {
    JsValue::from_str(&format!("{report:?}"))
}

/// JavaScript-accessible figure builder
#[wasm_bindgen]
pub struct JsFigure {
    density: DensityConfig,
    layout: LayoutConfig,
    panels: Vec<PanelSpec>,
}

#[wasm_bindgen]
impl JsFigure {
    /// Create a builder from optional JSON configs
    ///
    /// # Arguments
    /// * `density_json` - `DensityConfig` overrides, or empty for defaults
    /// * `layout_json` - `LayoutConfig` overrides, or empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(density_json: &str, layout_json: &str) -> Result<JsFigure, JsValue> {
        let density = if density_json.trim().is_empty() {
            DensityConfig::default()
        } else {
            DensityConfig::from_json(density_json).map_err(to_js)?
        };
        let layout = if layout_json.trim().is_empty() {
            LayoutConfig::default()
        } else {
            LayoutConfig::from_json(layout_json).map_err(to_js)?
        };

        Ok(JsFigure {
            density,
            layout,
            panels: Vec::new(),
        })
    }

    /// Append a panel from a `PanelSpec` JSON object
    #[wasm_bindgen]
    pub fn add_panel(&mut self, json: &str) -> Result<(), JsValue> {
        let spec: PanelSpec = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse panel JSON: {}", e)))?;
        if spec.series.is_empty() {
            web_sys::console::warn_1(&"Panel has no series; it will render empty".into());
        }
        self.panels.push(spec);
        Ok(())
    }

    /// Append a panel with a single unlabeled series
    ///
    /// # Arguments
    /// * `title` - Panel title, or empty for none
    /// * `distances_json` - Object mapping category to distance array
    #[wasm_bindgen]
    pub fn add_distances(&mut self, title: &str, distances_json: &str) -> Result<(), JsValue> {
        let distances = GroupedDistances::from_json(distances_json).map_err(to_js)?;
        self.panels.push(PanelSpec {
            title: (!title.is_empty()).then(|| title.to_string()),
            series: vec![SeriesSpec {
                timepoint: None,
                distances,
            }],
        });
        Ok(())
    }

    #[wasm_bindgen]
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Compute every panel and return the figure as JSON
    #[wasm_bindgen]
    pub fn build(&self) -> Result<String, JsValue> {
        let fig = figure()
            .density_config(self.density.clone())
            .layout(self.layout.clone())
            .add_panels(self.panels.iter().cloned())
            .build()
            .map_err(to_js)?;
        web_sys::console::log_1(&format!("Built figure with {} panels", fig.panels.len()).into());
        fig.to_json().map_err(to_js)
    }
}
