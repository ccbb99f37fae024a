//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core crop tool
//! types, handling the conversion between Rust and JavaScript data representations.

use croptool_core::decode::{DecodeError, DecodedImage};
use wasm_bindgen::prelude::*;

/// A decoded image wrapper for JavaScript.
///
/// Holds RGBA pixel data (4 bytes per pixel, row-major), the same layout as
/// a canvas `ImageData` buffer, so hosts can move pixels in and out without
/// reshuffling.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new JsDecodedImage from dimensions and RGBA pixel data.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsDecodedImage {
    /// Wrap a core DecodedImage without copying.
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert into a core DecodedImage, validating the buffer length.
    pub(crate) fn into_decoded(self) -> Result<DecodedImage, DecodeError> {
        DecodedImage::new(self.width, self.height, self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_decoded_image_creation() {
        let img = JsDecodedImage::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_from_decoded() {
        let decoded = DecodedImage::new(20, 10, vec![7u8; 20 * 10 * 4]).unwrap();
        let js_img = JsDecodedImage::from_decoded(decoded);
        assert_eq!(js_img.width(), 20);
        assert_eq!(js_img.height(), 10);
        assert_eq!(js_img.pixels()[0], 7);
    }

    #[test]
    fn test_into_decoded_validates() {
        let good = JsDecodedImage::new(2, 2, vec![0u8; 16]);
        assert!(good.into_decoded().is_ok());

        // RGB-sized buffer is rejected
        let bad = JsDecodedImage::new(2, 2, vec![0u8; 12]);
        assert!(matches!(
            bad.into_decoded(),
            Err(DecodeError::InvalidPixelData {
                expected: 16,
                actual: 12
            })
        ));
    }
}
