//! Category and timepoint colors.

use error_stack::Report;

use crate::core::{Category, Color, Timepoint};
use crate::error::{CloudError, Result};

const START_ALPHA: u8 = 0x77;
const END_ALPHA: u8 = 0xdd;

/// Base hue for a known category.
fn base_color(category: &str) -> Option<Color> {
    let hex = match category {
        Category::FECAL => 0x8c564b,
        Category::SOIL => 0x000000,
        Category::FOOD_COMPOST => 0xff0000,
        Category::BULKING_MATERIAL => 0x008000,
        _ => return None,
    };
    Some(Color::from_hex_rgb(hex))
}

/// Color for a category's cloud or points.
///
/// Start samples are drawn lighter than end samples; without a timepoint the
/// color is opaque. Categories outside the known four have no color.
pub fn color_for(category: &Category, timepoint: Option<Timepoint>) -> Result<Color> {
    let base = base_color(category.as_str())
        .ok_or_else(|| Report::new(CloudError::UnknownCategory(category.clone())))?;
    Ok(match timepoint {
        Some(Timepoint::Start) => base.with_alpha8(START_ALPHA),
        Some(Timepoint::End) => base.with_alpha8(END_ALPHA),
        None => base,
    })
}
