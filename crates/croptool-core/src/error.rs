//! Error taxonomy for the crop tool.
//!
//! Every failure is non-fatal to the host: operations return a `CropError`,
//! record it through the [`EventRecorder`](crate::events::EventRecorder) and
//! leave the widget interactive.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// How loudly a host should surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation was skipped; nothing is broken.
    Warning,
    /// The widget is degraded or an output could not be produced.
    Error,
}

/// Errors reported by the crop tool.
#[derive(Debug, Error)]
pub enum CropError {
    /// No crop mask was supplied at construction.
    #[error("No mask found: the crop tool needs viewport bounds for its crop mask")]
    MissingMask,

    /// No image was supplied at construction.
    #[error("No image found: the crop tool needs an image inside the crop mask")]
    MissingImage,

    /// An operation was requested while no image is attached.
    #[error("Cannot {operation}: no image is attached")]
    NoImage { operation: &'static str },

    /// A zero-sized image or viewport would divide by zero in the fit-scale computation.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    ZeroDimension { width: u32, height: u32 },

    /// Scale must be finite and greater than zero.
    #[error("Invalid scale: {0} (must be finite and greater than zero)")]
    InvalidScale(f64),

    /// Rotation must be finite.
    #[error("Invalid rotation: {0} (must be finite)")]
    InvalidRotation(f64),

    /// Encoding the crop result failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Decoding the source image failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl CropError {
    /// Severity used when recording this error.
    pub fn severity(&self) -> Severity {
        match self {
            CropError::NoImage { operation } if *operation != "crop" => Severity::Warning,
            CropError::InvalidScale(_) | CropError::InvalidRotation(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
