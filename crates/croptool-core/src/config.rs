//! Crop tool configuration.

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;

/// Fallback scale step (10%) used when a control has no usable step.
pub const DEFAULT_SCALE_STEP: f64 = 0.1;

/// Settings for a crop tool instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropToolConfig {
    /// Fraction of the current scale added or removed by the step controls.
    pub scale_step: f64,
    /// Resampling filter used when rasterizing the crop.
    pub smoothing: FilterType,
    /// Record diagnostic events (scale changes, crop rectangles).
    pub debug: bool,
}

impl Default for CropToolConfig {
    fn default() -> Self {
        Self {
            scale_step: DEFAULT_SCALE_STEP,
            smoothing: FilterType::default(),
            debug: false,
        }
    }
}

impl CropToolConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configured step, or the default when it is unusable.
    pub fn effective_scale_step(&self) -> f64 {
        sanitize_step(self.scale_step)
    }
}

/// Parse a host-supplied step attribute (e.g. a `data-scale-by` value).
///
/// The value is a fraction of the current scale: `"0.25"` means 25%.
/// Missing, unparsable, non-finite and non-positive values fall back to
/// [`DEFAULT_SCALE_STEP`].
pub fn parse_scale_step(value: Option<&str>) -> f64 {
    value
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .map(sanitize_step)
        .unwrap_or(DEFAULT_SCALE_STEP)
}

fn sanitize_step(step: f64) -> f64 {
    if step.is_finite() && step > 0.0 {
        step
    } else {
        DEFAULT_SCALE_STEP
    }
}
