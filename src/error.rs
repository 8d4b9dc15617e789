//! Error types for effect configuration

use thiserror::Error;

/// Errors raised when an effect is configured with values it cannot run on.
///
/// Rendering problems (zero-sized viewport, lost surface) are not errors:
/// the affected frame is simply skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FxError {
    /// Burst palette has no colors to draw from
    #[error("burst palette is empty")]
    EmptyPalette,

    /// Palette entry is not a CSS hex color
    #[error("invalid color {0:?} (expected #rgb, #rgba, #rrggbb or #rrggbbaa)")]
    InvalidColor(String),

    /// Randomization range is inverted or non-finite
    #[error("invalid range for {field}: [{min}, {max}]")]
    InvalidRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    /// Scalar option is negative or non-finite
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, FxError>;
