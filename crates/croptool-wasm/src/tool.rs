//! WASM bindings for the crop tool widget.
//!
//! `JsCropTool` owns one core `CropTool`. The host keeps its own DOM wiring
//! and forwards events: pointer down/move/up become `grab_start` /
//! `move_to` / `release`, buttons call the step controls, and the crop
//! button calls `crop()` and then reads `data_url`.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const tool = new JsCropTool(mask.clientWidth, mask.clientHeight, decode_image(bytes));
//! const place = () => img.setAttribute('style', tool.placement_css() ?? '');
//! place();
//!
//! img.addEventListener('pointerdown', (e) => {
//!   tool.grab_start(e.clientX, e.clientY);
//!   const move = (e: PointerEvent) => { tool.move_to(e.clientX, e.clientY); place(); };
//!   document.addEventListener('pointermove', move);
//!   document.addEventListener('pointerup', () => {
//!     tool.release();
//!     document.removeEventListener('pointermove', move);
//!   }, { once: true });
//! });
//!
//! tool.set_on_crop_complete(() => preview.src = tool.data_url!);
//! cropButton.onclick = () => tool.crop();
//! ```

use croptool_core::{
    parse_scale_step, CropError, CropTool, CropToolConfig, EventRecorder, Point, ToolEvent,
    TransformState, ViewportBounds,
};
use wasm_bindgen::prelude::*;

use crate::types::JsDecodedImage;

#[cfg(target_arch = "wasm32")]
fn recorder() -> Box<dyn EventRecorder> {
    Box::new(crate::console::ConsoleRecorder)
}

#[cfg(not(target_arch = "wasm32"))]
fn recorder() -> Box<dyn EventRecorder> {
    Box::new(croptool_core::TracingRecorder)
}

fn to_js(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Crop tool handle for JavaScript.
#[wasm_bindgen]
pub struct JsCropTool {
    inner: CropTool,
}

#[wasm_bindgen]
impl JsCropTool {
    /// Create a crop tool for a mask of `mask_width` x `mask_height` pixels.
    ///
    /// A missing image leaves the tool in a degraded state: it logs to the
    /// console and every operation returns an error instead of throwing
    /// from inside the widget.
    #[wasm_bindgen(constructor)]
    pub fn new(
        mask_width: u32,
        mask_height: u32,
        image: Option<JsDecodedImage>,
        scale_step: Option<f64>,
        debug: Option<bool>,
    ) -> JsCropTool {
        let mut config = CropToolConfig::default();
        if let Some(step) = scale_step {
            config.scale_step = step;
        }
        config.debug = debug.unwrap_or(false);
        Self::build(mask_width, mask_height, image, config)
    }

    /// Create a crop tool from a config object
    /// (`{ scale_step?: number, smoothing?: "nearest" | "bilinear" | "lanczos3", debug?: boolean }`).
    pub fn with_config(
        mask_width: u32,
        mask_height: u32,
        image: Option<JsDecodedImage>,
        config: JsValue,
    ) -> Result<JsCropTool, JsValue> {
        let config = parse_config(config)?;
        Ok(Self::build(mask_width, mask_height, image, config))
    }

    /// Create a crop tool straight from encoded image bytes.
    pub fn from_bytes(
        mask_width: u32,
        mask_height: u32,
        bytes: &[u8],
        config: JsValue,
    ) -> Result<JsCropTool, JsValue> {
        let config = parse_config(config)?;
        Ok(JsCropTool {
            inner: CropTool::from_encoded(
                Some(ViewportBounds::new(mask_width, mask_height)),
                bytes,
                config,
                recorder(),
            ),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.scale()
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.rotation()
    }

    #[wasm_bindgen(getter)]
    pub fn initial_scale(&self) -> f64 {
        self.inner.initial_scale()
    }

    /// True once an image is attached and fitted.
    #[wasm_bindgen(getter)]
    pub fn is_attached(&self) -> bool {
        self.inner.engine().is_attached()
    }

    /// Data URL of the most recent crop (`undefined` before the first crop).
    #[wasm_bindgen(getter)]
    pub fn data_url(&self) -> Option<String> {
        self.inner.data_url().map(str::to_owned)
    }

    /// PNG bytes of the most recent crop.
    pub fn png_bytes(&self) -> Option<Vec<u8>> {
        self.inner.png_bytes().map(<[u8]>::to_vec)
    }

    /// Pointer down on the image.
    pub fn grab_start(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner.on_grab_start(Point::new(x, y)).map_err(to_js)
    }

    /// Pointer move. Returns true when the image moved.
    pub fn move_to(&mut self, x: f64, y: f64) -> Result<bool, JsValue> {
        self.inner
            .on_move(Point::new(x, y))
            .map(|moved| moved.is_some())
            .map_err(to_js)
    }

    /// Pointer up.
    pub fn release(&mut self) {
        self.inner.on_release();
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<f64, JsValue> {
        scale_of(self.inner.set_scale(scale))
    }

    pub fn set_rotation(&mut self, degrees: f64) -> Result<f64, JsValue> {
        self.inner
            .set_rotation(degrees)
            .map(|state| state.rotation_degrees)
            .map_err(to_js)
    }

    /// Rotate by `delta` degrees; negative rotates left.
    pub fn rotate_by(&mut self, delta: f64) -> Result<f64, JsValue> {
        self.inner
            .rotate_by(delta)
            .map(|state| state.rotation_degrees)
            .map_err(to_js)
    }

    /// Scale up by `step` (a `data-scale-by` style string) or the configured step.
    pub fn scale_up(&mut self, step: Option<String>) -> Result<f64, JsValue> {
        let step = self.step(step);
        scale_of(self.inner.engine_mut().scale_up(step))
    }

    /// Scale down by `step` (a `data-scale-by` style string) or the configured step.
    pub fn scale_down(&mut self, step: Option<String>) -> Result<f64, JsValue> {
        let step = self.step(step);
        scale_of(self.inner.engine_mut().scale_down(step))
    }

    pub fn reset(&mut self) -> Result<f64, JsValue> {
        scale_of(self.inner.reset())
    }

    pub fn scale_to_full(&mut self) -> Result<f64, JsValue> {
        scale_of(self.inner.scale_to_full())
    }

    pub fn center(&mut self) -> Result<(), JsValue> {
        self.inner.center().map(|_| ()).map_err(to_js)
    }

    /// `{ left, top, width, height }` of the image, or `undefined` when detached.
    pub fn image_details(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.image_details())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Axis-aligned box covered by the rotated image, for hit-testing.
    /// `undefined` when detached.
    pub fn rotated_bounds(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.rotated_bounds())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The current crop rectangle (`sx`, `sy`, `s_width`, ... `d_height`).
    pub fn crop_rectangle(&self) -> Result<JsValue, JsValue> {
        let rect = self.inner.crop_rectangle().map_err(to_js)?;
        serde_wasm_bindgen::to_value(&rect).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Inline CSS positioning the image element, or `undefined` when detached.
    pub fn placement_css(&self) -> Option<String> {
        self.inner.placement().map(|p| p.to_css())
    }

    /// Rasterize the visible region into `data_url`.
    pub fn crop(&mut self) -> Result<(), JsValue> {
        self.inner.crop().map_err(to_js)
    }

    /// Register a callback fired after every successful crop.
    pub fn set_on_crop_complete(&mut self, callback: js_sys::Function) {
        self.inner.on_crop_complete(move || {
            if let Err(err) = callback.call0(&JsValue::NULL) {
                web_sys::console::error_2(&"CropTool => crop complete callback failed".into(), &err);
            }
        });
    }
}

impl JsCropTool {
    fn build(
        mask_width: u32,
        mask_height: u32,
        image: Option<JsDecodedImage>,
        config: CropToolConfig,
    ) -> JsCropTool {
        let recorder = recorder();
        let image = match image.map(JsDecodedImage::into_decoded).transpose() {
            Ok(image) => image,
            Err(err) => {
                recorder.record(&ToolEvent::Failure(&CropError::Decode(err)));
                None
            }
        };

        JsCropTool {
            inner: CropTool::new(
                Some(ViewportBounds::new(mask_width, mask_height)),
                image,
                config,
                recorder,
            ),
        }
    }

    fn step(&self, raw: Option<String>) -> f64 {
        match raw {
            Some(raw) => parse_scale_step(Some(&raw)),
            None => self.inner.config().effective_scale_step(),
        }
    }

    pub(crate) fn core(&self) -> &CropTool {
        &self.inner
    }
}

fn scale_of(result: Result<TransformState, CropError>) -> Result<f64, JsValue> {
    result.map(|state| state.scale).map_err(to_js)
}

fn parse_config(config: JsValue) -> Result<CropToolConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(CropToolConfig::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use croptool_core::Offset;

    fn image(width: u32, height: u32) -> JsDecodedImage {
        JsDecodedImage::new(width, height, vec![200u8; (width * height * 4) as usize])
    }

    #[test]
    fn test_new_fits_image() {
        let tool = JsCropTool::new(200, 100, Some(image(400, 400)), None, None);

        assert!(tool.is_attached());
        assert_eq!(tool.initial_scale(), 0.5);
        assert_eq!(tool.scale(), 0.5);
        assert_eq!(tool.rotation(), 0.0);
        assert!(tool.data_url().is_none());
    }

    #[test]
    fn test_drag_moves_image() {
        let mut tool = JsCropTool::new(200, 100, Some(image(400, 400)), None, None);
        tool.grab_start(10.0, 10.0).unwrap();
        assert!(tool.move_to(0.0, 30.0).unwrap());
        tool.release();
        assert!(!tool.move_to(99.0, 99.0).unwrap());

        assert_eq!(
            tool.core().engine().state().offset,
            Offset::new(-10.0, -30.0)
        );
    }

    #[test]
    fn test_scale_controls() {
        let mut tool = JsCropTool::new(100, 100, Some(image(100, 100)), Some(0.5), None);

        assert_eq!(tool.scale_up(None).unwrap(), 1.5);
        assert_eq!(tool.scale_down(Some("0.5".to_string())).unwrap(), 0.75);
        assert_eq!(tool.scale_to_full().unwrap(), 1.0);
        assert_eq!(tool.reset().unwrap(), 1.0);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut tool = JsCropTool::new(100, 100, Some(image(100, 100)), None, None);
        assert_eq!(tool.rotate_by(-90.0).unwrap(), 270.0);
        assert_eq!(tool.set_rotation(370.0).unwrap(), 10.0);
    }

    #[test]
    fn test_crop_sets_data_url() {
        let mut tool = JsCropTool::new(20, 10, Some(image(40, 40)), None, None);
        tool.crop().unwrap();

        let url = tool.data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(tool.png_bytes().is_some());
    }

    #[test]
    fn test_placement_css() {
        let tool = JsCropTool::new(200, 100, Some(image(400, 400)), None, None);
        assert_eq!(
            tool.placement_css().unwrap(),
            "left: 0px; top: -50px; width: 200px; height: 200px;"
        );
    }
}
