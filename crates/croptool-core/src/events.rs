//! Structured event recording.
//!
//! The engine never logs directly. It hands [`ToolEvent`]s to an injected
//! [`EventRecorder`], which the host maps onto its own logging facility.
//! Diagnostic events (scale changes, computed rectangles) are only emitted
//! when the tool runs with `debug` enabled; failures are always emitted.

use tracing::{debug, error, info, warn};

use crate::error::{CropError, Severity};
use crate::geometry::{CropRectangle, ImageDimensions, ViewportBounds};

/// Something worth recording that happened inside the crop tool.
#[derive(Debug, Clone, Copy)]
pub enum ToolEvent<'a> {
    /// The engine attached to an image and computed its fit.
    Initialized {
        viewport: ViewportBounds,
        image: ImageDimensions,
        initial_scale: f64,
    },
    /// The scale was changed.
    ScaleChanged { scale: f64 },
    /// The rotation was changed.
    RotationChanged { degrees: f64 },
    /// A crop rectangle was computed for rasterization.
    CropComputed { rect: CropRectangle },
    /// A crop finished and a fresh data URL is available.
    CropComplete { png_bytes: usize },
    /// An operation failed or was skipped.
    Failure(&'a CropError),
}

impl ToolEvent<'_> {
    /// True for events that are only recorded in debug mode.
    pub fn is_diagnostic(&self) -> bool {
        !matches!(self, ToolEvent::Failure(_) | ToolEvent::CropComplete { .. })
    }
}

/// Sink for tool events.
pub trait EventRecorder {
    /// Record a single event.
    fn record(&self, event: &ToolEvent<'_>);
}

impl<R: EventRecorder + ?Sized> EventRecorder for std::rc::Rc<R> {
    fn record(&self, event: &ToolEvent<'_>) {
        (**self).record(event)
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRecorder;

impl EventRecorder for TracingRecorder {
    fn record(&self, event: &ToolEvent<'_>) {
        match *event {
            ToolEvent::Initialized {
                viewport,
                image,
                initial_scale,
            } => debug!(
                viewport_width = viewport.width,
                viewport_height = viewport.height,
                image_width = image.width,
                image_height = image.height,
                initial_scale,
                "crop tool initialized"
            ),
            ToolEvent::ScaleChanged { scale } => debug!(scale, "scale changed"),
            ToolEvent::RotationChanged { degrees } => debug!(degrees, "rotation changed"),
            ToolEvent::CropComputed { rect } => debug!(
                sx = rect.sx,
                sy = rect.sy,
                s_width = rect.s_width,
                s_height = rect.s_height,
                dx = rect.dx,
                dy = rect.dy,
                d_width = rect.d_width,
                d_height = rect.d_height,
                "crop rectangle computed"
            ),
            ToolEvent::CropComplete { png_bytes } => info!(png_bytes, "crop complete"),
            ToolEvent::Failure(err) => match err.severity() {
                Severity::Warning => warn!(error = %err, "crop tool operation skipped"),
                Severity::Error => error!(error = %err, "crop tool operation failed"),
            },
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecorder;

impl EventRecorder for NullRecorder {
    fn record(&self, _event: &ToolEvent<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_diagnostic_classification() {
        assert!(ToolEvent::ScaleChanged { scale: 1.0 }.is_diagnostic());
        assert!(ToolEvent::CropComputed {
            rect: CropRectangle::default()
        }
        .is_diagnostic());
        assert!(!ToolEvent::CropComplete { png_bytes: 10 }.is_diagnostic());

        let err = CropError::MissingImage;
        assert!(!ToolEvent::Failure(&err).is_diagnostic());
    }

    #[derive(Default)]
    struct ScaleLog(RefCell<Vec<f64>>);

    impl EventRecorder for ScaleLog {
        fn record(&self, event: &ToolEvent<'_>) {
            if let ToolEvent::ScaleChanged { scale } = event {
                self.0.borrow_mut().push(*scale);
            }
        }
    }

    #[test]
    fn test_shared_recorder() {
        let log = Rc::new(ScaleLog::default());
        let shared: Rc<ScaleLog> = Rc::clone(&log);

        shared.record(&ToolEvent::ScaleChanged { scale: 0.5 });
        shared.record(&ToolEvent::RotationChanged { degrees: 90.0 });

        assert_eq!(*log.0.borrow(), vec![0.5]);
    }

    #[test]
    fn test_tracing_recorder_without_subscriber() {
        // No subscriber installed: recording must be a silent no-op
        let err = CropError::NoImage { operation: "crop" };
        TracingRecorder.record(&ToolEvent::Failure(&err));
        TracingRecorder.record(&ToolEvent::ScaleChanged { scale: 2.0 });
    }
}
