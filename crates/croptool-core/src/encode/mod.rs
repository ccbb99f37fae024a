//! Encoding of crop results.
//!
//! This module provides functionality for:
//! - Encoding RGBA canvases to PNG (lossless, full quality)
//! - Building `data:image/png;base64,...` URLs from the encoded bytes
//!
//! # Examples
//!
//! ```ignore
//! use croptool_core::encode::{encode_png, to_data_url};
//!
//! let pixels = vec![0u8; 200 * 100 * 4]; // Transparent canvas
//! let png = encode_png(&pixels, 200, 100).unwrap();
//! let url = to_data_url(&png);
//! ```

mod png;

pub use png::{encode_png, to_data_url, EncodeError, PNG_MIME};
