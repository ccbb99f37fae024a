//! The crop tool widget: transform engine plus source pixels, configuration
//! and crop output.
//!
//! `CropTool` is what a host embeds. It forwards gestures and control calls
//! to the [`TransformEngine`], and on [`CropTool::crop`] rasterizes exactly
//! what is visible in the mask, encodes it as PNG and notifies listeners.

use std::fmt;

use crate::config::CropToolConfig;
use crate::decode::{decode_image, DecodedImage};
use crate::encode::{encode_png, to_data_url};
use crate::engine::{TransformEngine, TransformState};
use crate::error::CropError;
use crate::events::{EventRecorder, ToolEvent, TracingRecorder};
use crate::geometry::{CropRectangle, ImageDetails, ImagePlacement, Point, ViewportBounds};
use crate::raster::rasterize;

/// Name of the notification fired after every successful crop.
pub const CROP_COMPLETE: &str = "CROP_COMPLETE";

type Listener = Box<dyn FnMut()>;

/// Interactive crop tool bound to one image and one mask.
pub struct CropTool {
    engine: TransformEngine,
    source: Option<DecodedImage>,
    config: CropToolConfig,
    png: Option<Vec<u8>>,
    data_url: Option<String>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for CropTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropTool")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .field("has_source", &self.source.is_some())
            .field("has_data_url", &self.data_url.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CropTool {
    /// Create a crop tool and fit the image into the mask.
    ///
    /// A missing mask or image is recorded and the tool is returned in a
    /// degraded state: every later operation reports `CropError::NoImage`
    /// instead of panicking.
    pub fn new(
        viewport: Option<ViewportBounds>,
        image: Option<DecodedImage>,
        config: CropToolConfig,
        recorder: Box<dyn EventRecorder>,
    ) -> Self {
        let mut engine = TransformEngine::new(recorder);
        engine.set_debug(config.debug);

        if viewport.is_none() {
            engine.fail(CropError::MissingMask);
        }
        if image.is_none() {
            engine.fail(CropError::MissingImage);
        }

        let source = match (viewport, image) {
            (Some(viewport), Some(image)) => engine
                .initialize(viewport, image.dimensions())
                .ok()
                .map(|_| image),
            _ => None,
        };

        Self {
            engine,
            source,
            config,
            png: None,
            data_url: None,
            listeners: Vec::new(),
        }
    }

    /// Create a crop tool that logs through `tracing` with default settings.
    pub fn with_defaults(viewport: ViewportBounds, image: DecodedImage) -> Self {
        Self::new(
            Some(viewport),
            Some(image),
            CropToolConfig::default(),
            Box::new(TracingRecorder),
        )
    }

    /// Create a crop tool from encoded image bytes (JPEG or PNG).
    ///
    /// A decode failure is recorded and leaves the tool degraded.
    pub fn from_encoded(
        viewport: Option<ViewportBounds>,
        bytes: &[u8],
        config: CropToolConfig,
        recorder: Box<dyn EventRecorder>,
    ) -> Self {
        match decode_image(bytes) {
            Ok(image) => Self::new(viewport, Some(image), config, recorder),
            Err(err) => {
                recorder.record(&ToolEvent::Failure(&CropError::Decode(err)));
                Self::new(viewport, None, config, recorder)
            }
        }
    }

    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    /// Direct engine access, e.g. to apply a per-control scale step.
    pub fn engine_mut(&mut self) -> &mut TransformEngine {
        &mut self.engine
    }

    pub fn config(&self) -> &CropToolConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&DecodedImage> {
        self.source.as_ref()
    }

    /// Register a listener fired once after every successful crop.
    pub fn on_crop_complete(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn on_grab_start(&mut self, pointer: Point) -> Result<(), CropError> {
        self.engine.on_grab_start(pointer)
    }

    pub fn on_move(&mut self, pointer: Point) -> Result<Option<TransformState>, CropError> {
        self.engine.on_move(pointer)
    }

    pub fn on_release(&mut self) {
        self.engine.on_release();
    }

    pub fn on_scale_request(&mut self, scale: f64) -> Result<TransformState, CropError> {
        self.engine.on_scale_request(scale)
    }

    pub fn on_rotate_request(&mut self, delta: f64) -> Result<TransformState, CropError> {
        self.engine.on_rotate_request(delta)
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<TransformState, CropError> {
        self.engine.set_scale(scale)
    }

    pub fn set_rotation(&mut self, degrees: f64) -> Result<TransformState, CropError> {
        self.engine.set_rotation(degrees)
    }

    pub fn rotate_by(&mut self, delta: f64) -> Result<TransformState, CropError> {
        self.engine.rotate_by(delta)
    }

    pub fn pan(&mut self, left: f64, top: f64) -> Result<TransformState, CropError> {
        self.engine.pan(left, top)
    }

    pub fn center(&mut self) -> Result<TransformState, CropError> {
        self.engine.center()
    }

    /// Scale up by the configured step.
    pub fn scale_up(&mut self) -> Result<TransformState, CropError> {
        let step = self.config.effective_scale_step();
        self.engine.scale_up(step)
    }

    /// Scale down by the configured step.
    pub fn scale_down(&mut self) -> Result<TransformState, CropError> {
        let step = self.config.effective_scale_step();
        self.engine.scale_down(step)
    }

    pub fn reset(&mut self) -> Result<TransformState, CropError> {
        self.engine.reset()
    }

    pub fn scale_to_full(&mut self) -> Result<TransformState, CropError> {
        self.engine.scale_to_full()
    }

    pub fn scale(&self) -> f64 {
        self.engine.scale()
    }

    pub fn rotation(&self) -> f64 {
        self.engine.rotation()
    }

    pub fn initial_scale(&self) -> f64 {
        self.engine.initial_scale()
    }

    pub fn image_details(&self) -> Option<ImageDetails> {
        self.engine.image_details()
    }

    /// On-screen box covered by the rotated image, for host hit-testing.
    pub fn rotated_bounds(&self) -> Option<ImageDetails> {
        self.engine.rotated_bounds()
    }

    pub fn placement(&self) -> Option<ImagePlacement> {
        self.engine.placement()
    }

    pub fn crop_rectangle(&self) -> Result<CropRectangle, CropError> {
        self.engine.compute_crop_rectangle()
    }

    /// Data URL of the most recent crop, if any.
    pub fn data_url(&self) -> Option<&str> {
        self.data_url.as_deref()
    }

    /// PNG bytes of the most recent crop, if any.
    pub fn png_bytes(&self) -> Option<&[u8]> {
        self.png.as_deref()
    }

    /// Rasterize what is visible in the mask and store it as a PNG data URL.
    ///
    /// On success every crop-complete listener fires exactly once. On failure
    /// nothing fires and the previous result is kept.
    pub fn crop(&mut self) -> Result<(), CropError> {
        let rect = self.engine.compute_crop_rectangle()?;
        let (Some(source), Some(viewport)) = (self.source.as_ref(), self.engine.viewport()) else {
            return Err(self.engine.fail(CropError::NoImage { operation: "crop" }));
        };

        let png = {
            let canvas = rasterize(source, &rect, viewport, self.config.smoothing)
                .map_err(|e| self.engine.fail(e.into()))?;
            encode_png(canvas.as_raw(), canvas.width(), canvas.height())
                .map_err(|e| self.engine.fail(e.into()))?
        };

        self.engine.record(&ToolEvent::CropComplete {
            png_bytes: png.len(),
        });
        self.data_url = Some(to_data_url(&png));
        self.png = Some(png);

        for listener in &mut self.listeners {
            listener();
        }
        Ok(())
    }
}
