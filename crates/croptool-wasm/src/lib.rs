//! Croptool WASM - WebAssembly bindings for the crop tool widget
//!
//! This crate exposes `croptool-core` to JavaScript/TypeScript hosts. The
//! host owns the DOM (mask element, image element, buttons) and forwards
//! input to a [`JsCropTool`]; the tool answers with positioning and, on
//! `crop()`, a PNG data URL.
//!
//! # Module Structure
//!
//! - `tool` - `JsCropTool`, the widget handle
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings (JPEG, PNG, EXIF orientation)
//! - `console` - Browser console sink for tool events
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, JsCropTool } from '@croptool/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const tool = new JsCropTool(300, 300, image);
//! tool.scale_up();
//! tool.crop();
//! preview.src = tool.data_url;
//! ```

use wasm_bindgen::prelude::*;

mod console;
mod decode;
mod tool;
mod types;

// Re-export public types
pub use console::ConsoleRecorder;
pub use decode::{decode_image, get_orientation};
pub use tool::JsCropTool;
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
