//! Source image decoding for the crop tool.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG bytes into RGBA pixels
//! - Applying EXIF orientation so natural dimensions match what a browser shows
//! - The resampling filter used by the rasterizer
//!
//! # Examples
//!
//! ```ignore
//! use croptool_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod source;
mod types;

pub use source::{decode_image, get_orientation};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
