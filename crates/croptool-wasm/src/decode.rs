//! Image decoding WASM bindings.
//!
//! Lets a host hand the crop tool the original file bytes instead of pixels
//! read back from a canvas (which would already be resampled).
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, JsCropTool } from '@croptool/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const tool = new JsCropTool(mask.clientWidth, mask.clientHeight, image);
//! ```

use crate::types::JsDecodedImage;
use croptool_core::decode;
use wasm_bindgen::prelude::*;

/// Decode JPEG or PNG bytes into RGBA pixels, applying EXIF orientation.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or are corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Read the EXIF orientation value (1-8) from image bytes.
///
/// Returns 1 (normal) when there is no usable EXIF data.
#[wasm_bindgen]
pub fn get_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_orientation_without_exif() {
        assert_eq!(get_orientation(&[0x00, 0x01, 0x02]), 1);
    }
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_invalid_bytes() {
        assert!(decode_image(&[0x00, 0x01, 0x02, 0x03]).is_err());
    }
}
