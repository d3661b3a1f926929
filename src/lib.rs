pub mod config;
pub mod core;
pub mod error;
pub mod figure;
pub mod palette;
pub mod reshape;
pub mod scale;
pub mod stats;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use error::{CloudError, Result};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

pub mod prelude {
    pub use crate::config::*;
    pub use crate::core::*;
    pub use crate::error::{CloudError, Result};
    pub use crate::figure::*;
    pub use crate::palette::*;
    pub use crate::reshape::*;
    pub use crate::scale::*;
    pub use crate::stats::*;
}
