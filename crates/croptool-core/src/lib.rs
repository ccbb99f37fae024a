//! Croptool Core - geometry and rasterization for an interactive crop widget
//!
//! An image is shown inside a fixed-size mask. The user pans, scales and
//! rotates it, then asks for a crop of exactly what is visible. This crate
//! holds everything except the UI wiring:
//!
//! - [`geometry`] - value types and the pure fit/center/crop math
//! - [`engine`] - [`TransformEngine`], the mutable transform state and gestures
//! - [`tool`] - [`CropTool`], the widget façade that produces PNG data URLs
//! - [`raster`], [`encode`], [`decode`] - pixel plumbing on top of `image`
//! - [`events`] - the injected [`EventRecorder`] used instead of direct logging
//!
//! # Example
//!
//! ```ignore
//! use croptool_core::{CropTool, Point, ViewportBounds};
//!
//! let image = croptool_core::decode::decode_image(&bytes)?;
//! let mut tool = CropTool::with_defaults(ViewportBounds::new(200, 100), image);
//!
//! tool.on_grab_start(Point::new(10.0, 10.0))?;
//! tool.on_move(Point::new(-20.0, 0.0))?;
//! tool.on_release();
//! tool.scale_up()?;
//!
//! tool.crop()?;
//! let url = tool.data_url();
//! ```

pub mod config;
pub mod decode;
pub mod encode;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod raster;
pub mod tool;

pub use config::{parse_scale_step, CropToolConfig, DEFAULT_SCALE_STEP};
pub use engine::{TransformEngine, TransformState};
pub use error::{CropError, Severity};
pub use events::{EventRecorder, NullRecorder, ToolEvent, TracingRecorder};
pub use geometry::{
    CropRectangle, ImageDetails, ImageDimensions, ImagePlacement, Offset, Point, ViewportBounds,
};
pub use tool::{CropTool, CROP_COMPLETE};
