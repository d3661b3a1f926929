//! Error types for the density and layout pipeline

use thiserror::Error;

use crate::core::Category;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CloudError {
    /// Thresholds or a density estimate were requested for no data.
    #[error("empty input: at least one finite value is required")]
    EmptyInput,

    /// The curve cannot be scaled to unit area.
    #[error("degenerate density curve: {0}")]
    DegenerateCurve(String),

    #[error("grouped input has no values for category {0:?}")]
    MissingCategory(Category),

    #[error("no color is defined for category {0:?}")]
    UnknownCategory(Category),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, error_stack::Report<CloudError>>;
