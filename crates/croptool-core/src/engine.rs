//! The transform engine: scale, rotation and position of an image inside a
//! fixed-size viewport.
//!
//! The engine owns a single [`TransformState`] and mutates it in response to
//! programmatic calls and forwarded gestures. It has no knowledge of any
//! event-dispatch mechanism; the host calls [`TransformEngine::on_grab_start`],
//! [`TransformEngine::on_move`] and friends from its own input layer.
//!
//! Every mutating operation either fully applies and returns the new state,
//! or returns a [`CropError`] and leaves the state untouched. Errors are also
//! recorded through the injected [`EventRecorder`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::events::{EventRecorder, ToolEvent};
use crate::geometry::{
    centered_offset, cover_scale, crop_rectangle, normalize_rotation, rotated_bounds,
    CropRectangle, ImageDetails, ImageDimensions, ImagePlacement, Offset, Point, ViewportBounds,
};

/// Mutable transform of the attached image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    /// Multiplier from natural image size to on-screen size. Always > 0.
    pub scale: f64,
    /// Clockwise rotation about the image center, in `[0, 360)`.
    pub rotation_degrees: f64,
    /// Image top-left relative to the viewport top-left.
    pub offset: Offset,
    /// Cover-fit scale computed at attach time.
    pub initial_scale: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_degrees: 0.0,
            offset: Offset::default(),
            initial_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Attachment {
    viewport: ViewportBounds,
    image: ImageDimensions,
}

/// Geometry engine behind the crop tool.
pub struct TransformEngine {
    attachment: Option<Attachment>,
    state: TransformState,
    /// Pointer position minus image top-left, captured at grab time.
    grab: Option<Offset>,
    debug: bool,
    recorder: Box<dyn EventRecorder>,
}

impl fmt::Debug for TransformEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformEngine")
            .field("attachment", &self.attachment)
            .field("state", &self.state)
            .field("grab", &self.grab)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl TransformEngine {
    /// Create a detached engine that reports through `recorder`.
    pub fn new(recorder: Box<dyn EventRecorder>) -> Self {
        Self {
            attachment: None,
            state: TransformState::default(),
            grab: None,
            debug: false,
            recorder,
        }
    }

    /// Enable or disable diagnostic events.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Attach to an image and fit it to the viewport.
    ///
    /// Computes the cover-fit scale, resets rotation and centers the image.
    ///
    /// # Errors
    ///
    /// Returns `CropError::ZeroDimension` if either the image or the viewport
    /// has a zero side. The engine is left as it was.
    pub fn initialize(
        &mut self,
        viewport: ViewportBounds,
        image: ImageDimensions,
    ) -> Result<TransformState, CropError> {
        let Some(initial_scale) = cover_scale(viewport, image) else {
            let (width, height) = if image.is_empty() {
                (image.width, image.height)
            } else {
                (viewport.width, viewport.height)
            };
            return Err(self.fail(CropError::ZeroDimension { width, height }));
        };

        self.attachment = Some(Attachment { viewport, image });
        self.grab = None;
        self.state = TransformState {
            scale: initial_scale,
            rotation_degrees: 0.0,
            offset: Offset::default(),
            initial_scale,
        };

        self.record(&ToolEvent::Initialized {
            viewport,
            image,
            initial_scale,
        });

        self.center()
    }

    /// Set the scale. No min/max policy is applied here.
    ///
    /// The offset is left unchanged, so the visual center may shift.
    ///
    /// # Errors
    ///
    /// `CropError::NoImage` when detached, `CropError::InvalidScale` for
    /// non-finite or non-positive values.
    pub fn set_scale(&mut self, scale: f64) -> Result<TransformState, CropError> {
        self.require_image("set scale")?;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(self.fail(CropError::InvalidScale(scale)));
        }

        self.state.scale = scale;
        self.record(&ToolEvent::ScaleChanged { scale });
        Ok(self.state)
    }

    /// Grow the scale by `step` (a fraction of the current scale).
    pub fn scale_up(&mut self, step: f64) -> Result<TransformState, CropError> {
        let scale = self.state.scale;
        self.set_scale(scale + scale * step)
    }

    /// Shrink the scale by `step` (a fraction of the current scale).
    pub fn scale_down(&mut self, step: f64) -> Result<TransformState, CropError> {
        let scale = self.state.scale;
        self.set_scale(scale - scale * step)
    }

    /// Set the visual rotation, wrapped into `[0, 360)`.
    ///
    /// Rotation never changes offset, scale or the crop rectangle.
    pub fn set_rotation(&mut self, degrees: f64) -> Result<TransformState, CropError> {
        self.require_image("set rotation")?;
        if !degrees.is_finite() {
            return Err(self.fail(CropError::InvalidRotation(degrees)));
        }

        let degrees = normalize_rotation(degrees);
        self.state.rotation_degrees = degrees;
        self.record(&ToolEvent::RotationChanged { degrees });
        Ok(self.state)
    }

    /// Rotate relative to the current angle. Negative deltas rotate left.
    pub fn rotate_by(&mut self, delta: f64) -> Result<TransformState, CropError> {
        self.set_rotation(self.state.rotation_degrees + delta)
    }

    /// Move the image's top-left corner. No bounds clamping.
    pub fn pan(&mut self, left: f64, top: f64) -> Result<TransformState, CropError> {
        self.require_image("pan")?;
        self.state.offset = Offset::new(left, top);
        Ok(self.state)
    }

    /// Center the image in the viewport at the current scale.
    pub fn center(&mut self) -> Result<TransformState, CropError> {
        let attachment = self.require_image("center")?;
        let (width, height) = attachment.image.scaled(self.state.scale);
        self.state.offset = centered_offset(attachment.viewport, width, height);
        Ok(self.state)
    }

    /// Return to the initial fit: initial scale, centered.
    pub fn reset(&mut self) -> Result<TransformState, CropError> {
        self.set_scale(self.state.initial_scale)?;
        self.center()
    }

    /// Show the image at natural size, anchored at the viewport origin.
    pub fn scale_to_full(&mut self) -> Result<TransformState, CropError> {
        self.set_scale(1.0)?;
        // Re-anchor, otherwise the image may end up off screen.
        self.pan(0.0, 0.0)
    }

    /// Start a drag at `pointer`.
    pub fn on_grab_start(&mut self, pointer: Point) -> Result<(), CropError> {
        self.require_image("grab")?;
        let offset = self.state.offset;
        self.grab = Some(Offset::new(pointer.x - offset.left, pointer.y - offset.top));
        Ok(())
    }

    /// Follow the pointer during a drag.
    ///
    /// Returns `Ok(None)` and leaves the state alone when no drag is active.
    pub fn on_move(&mut self, pointer: Point) -> Result<Option<TransformState>, CropError> {
        let Some(grab) = self.grab else {
            return Ok(None);
        };
        self.pan(pointer.x - grab.left, pointer.y - grab.top).map(Some)
    }

    /// End the drag. The last applied offset is kept.
    ///
    /// Always allowed, attached or not: it only clears the grab point.
    pub fn on_release(&mut self) {
        self.grab = None;
    }

    /// Host scale request (slider, pinch, wheel).
    pub fn on_scale_request(&mut self, scale: f64) -> Result<TransformState, CropError> {
        self.set_scale(scale)
    }

    /// Host rotation request, as a delta in degrees.
    pub fn on_rotate_request(&mut self, delta: f64) -> Result<TransformState, CropError> {
        self.rotate_by(delta)
    }

    /// Compute the source/destination rectangles of what is visible in the viewport.
    ///
    /// Recomputed on every call from the current offset and scale.
    pub fn compute_crop_rectangle(&self) -> Result<CropRectangle, CropError> {
        let attachment = self.require_image("crop")?;
        let rect = crop_rectangle(attachment.image, self.state.scale, self.state.offset);
        self.record(&ToolEvent::CropComputed { rect });
        Ok(rect)
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    pub fn rotation(&self) -> f64 {
        self.state.rotation_degrees
    }

    pub fn initial_scale(&self) -> f64 {
        self.state.initial_scale
    }

    pub fn state(&self) -> TransformState {
        self.state
    }

    pub fn viewport(&self) -> Option<ViewportBounds> {
        self.attachment.map(|a| a.viewport)
    }

    pub fn image(&self) -> Option<ImageDimensions> {
        self.attachment.map(|a| a.image)
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    pub fn is_grabbing(&self) -> bool {
        self.grab.is_some()
    }

    /// Current on-screen geometry, or `None` when detached.
    pub fn image_details(&self) -> Option<ImageDetails> {
        let attachment = self.attachment?;
        let (width, height) = attachment.image.scaled(self.state.scale);
        Some(ImageDetails {
            left: self.state.offset.left,
            top: self.state.offset.top,
            width,
            height,
        })
    }

    /// On-screen geometry plus rotation, or `None` when detached.
    pub fn placement(&self) -> Option<ImagePlacement> {
        let details = self.image_details()?;
        Some(ImagePlacement {
            left: details.left,
            top: details.top,
            width: details.width,
            height: details.height,
            rotation_degrees: self.state.rotation_degrees,
        })
    }

    /// Axis-aligned on-screen bounds of the rotated image, or `None` when detached.
    pub fn rotated_bounds(&self) -> Option<ImageDetails> {
        let details = self.image_details()?;
        let (width, height) =
            rotated_bounds(details.width, details.height, self.state.rotation_degrees);
        Some(ImageDetails {
            left: details.left + (details.width - width) / 2.0,
            top: details.top + (details.height - height) / 2.0,
            width,
            height,
        })
    }

    /// Record an event. Diagnostic events are dropped unless debug is on.
    pub(crate) fn record(&self, event: &ToolEvent<'_>) {
        if self.debug || !event.is_diagnostic() {
            self.recorder.record(event);
        }
    }

    /// Record an error and hand it back for returning.
    pub(crate) fn fail(&self, err: CropError) -> CropError {
        self.record(&ToolEvent::Failure(&err));
        err
    }

    fn require_image(&self, operation: &'static str) -> Result<Attachment, CropError> {
        self.attachment
            .ok_or_else(|| self.fail(CropError::NoImage { operation }))
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
