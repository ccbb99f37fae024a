//! Geometry value types and the pure math behind the transform engine.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner of the viewport (the crop mask)
//! - `Offset` is the image's top-left corner in viewport pixels, measured on
//!   the unrotated, scaled bounding box
//! - Rotation angles are in degrees, positive = clockwise, normalized to `[0, 360)`
//! - Source rectangles are in original-image pixels, destination rectangles
//!   in canvas (viewport) pixels

use serde::{Deserialize, Serialize};

/// One full turn in degrees.
pub const FULL_TURN: f64 = 360.0;

/// Size of the fixed crop mask in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub width: u32,
    pub height: u32,
}

impl ViewportBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Natural size of the source image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// On-screen (width, height) at the given scale.
    #[inline]
    pub fn scaled(&self, scale: f64) -> (f64, f64) {
        (self.width as f64 * scale, self.height as f64 * scale)
    }
}

/// Position of the image's top-left corner relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub left: f64,
    pub top: f64,
}

impl Offset {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// A pointer position in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Current on-screen geometry of the image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageDetails {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// On-screen geometry plus the visual rotation, ready to hand to a layout layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImagePlacement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_degrees: f64,
}

impl ImagePlacement {
    /// Render as inline CSS declarations.
    ///
    /// The rotation is emitted as a `transform` so it pivots on the element's
    /// center (the CSS default origin), matching the engine's rotation model.
    pub fn to_css(&self) -> String {
        let mut css = format!(
            "left: {}px; top: {}px; width: {}px; height: {}px;",
            self.left, self.top, self.width, self.height
        );
        if self.rotation_degrees != 0.0 {
            css.push_str(&format!(" transform: rotate({}deg);", self.rotation_degrees));
        }
        css
    }
}

/// Paired source and destination rectangles for rasterizing a crop.
///
/// Mirrors the nine-argument canvas `drawImage` call: the source region
/// `(sx, sy, s_width, s_height)` of the original image is drawn into
/// `(dx, dy, d_width, d_height)` of a viewport-sized canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRectangle {
    pub sx: u32,
    pub sy: u32,
    pub s_width: u32,
    pub s_height: u32,
    pub dx: u32,
    pub dy: u32,
    pub d_width: u32,
    pub d_height: u32,
}

impl CropRectangle {
    /// True when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.s_width == 0 || self.s_height == 0 || self.d_width == 0 || self.d_height == 0
    }
}

/// Compute the cover-fit scale for an image inside a viewport.
///
/// Picks the larger of the two axis ratios so the scaled image covers the
/// viewport on both axes (one axis may overflow).
///
/// Returns `None` if any dimension is zero.
///
/// # Example
///
/// ```ignore
/// let scale = cover_scale(ViewportBounds::new(200, 100), ImageDimensions::new(400, 400));
/// assert_eq!(scale, Some(0.5));
/// ```
pub fn cover_scale(viewport: ViewportBounds, image: ImageDimensions) -> Option<f64> {
    if viewport.is_empty() || image.is_empty() {
        return None;
    }

    let width_scale = viewport.width as f64 / image.width as f64;
    let height_scale = viewport.height as f64 / image.height as f64;

    Some(width_scale.max(height_scale))
}

/// Offset that centers a box of the given on-screen size in the viewport.
pub fn centered_offset(viewport: ViewportBounds, width: f64, height: f64) -> Offset {
    Offset {
        left: (viewport.width as f64 - width) / 2.0,
        top: (viewport.height as f64 - height) / 2.0,
    }
}

/// Wrap an angle into `[0, 360)` by adding or subtracting full turns.
///
/// Input must be finite; NaN is returned unchanged.
pub fn normalize_rotation(degrees: f64) -> f64 {
    let mut angle = degrees;

    // Fold large magnitudes first so the loops below stay bounded.
    if angle.abs() >= FULL_TURN * 2.0 {
        angle %= FULL_TURN;
    }

    while angle >= FULL_TURN {
        angle -= FULL_TURN;
    }
    while angle < 0.0 {
        angle += FULL_TURN;
    }

    // A tiny negative input plus a full turn rounds up to exactly 360.
    if angle >= FULL_TURN {
        0.0
    } else {
        angle
    }
}

/// Compute the axis-aligned bounding box of a rotated rectangle.
///
/// # Arguments
///
/// * `width` - Unrotated width
/// * `height` - Unrotated height
/// * `angle_degrees` - Rotation angle in degrees
///
/// # Returns
///
/// Tuple of (bounding_width, bounding_height).
pub fn rotated_bounds(width: f64, height: f64, angle_degrees: f64) -> (f64, f64) {
    let angle = normalize_rotation(angle_degrees);

    // Fast paths for quarter turns
    if angle < 0.001 || (angle - 180.0).abs() < 0.001 {
        return (width, height);
    }
    if (angle - 90.0).abs() < 0.001 || (angle - 270.0).abs() < 0.001 {
        return (height, width);
    }

    let angle_rad = angle.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    // new_w = |w*cos| + |h*sin|
    // new_h = |w*sin| + |h*cos|
    (width * cos + height * sin, width * sin + height * cos)
}

/// Round to the nearest integer, collapsing negative and non-finite values to 0.
#[inline]
fn round_non_negative(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Compute the source and destination rectangles of the visible crop.
///
/// The sampled region starts inside the image when its top/left edge has been
/// dragged past the viewport's top/left edge, and the drawn region starts
/// inside the canvas when the image edge sits inside the viewport. Extents
/// are measured from the image's top-left toward its bottom-right.
///
/// Rotation is not part of this computation: a rotated image crops its
/// unrotated source region.
///
/// `scale` must be positive; a non-positive scale yields an empty rectangle.
pub fn crop_rectangle(image: ImageDimensions, scale: f64, offset: Offset) -> CropRectangle {
    if !(scale.is_finite() && scale > 0.0) {
        return CropRectangle::default();
    }

    let (width, height) = image.scaled(scale);
    let visible_width = width - offset.left;
    let visible_height = height - offset.top;

    let s_width = round_non_negative(visible_width / scale);
    let s_height = round_non_negative(visible_height / scale);

    let sx = if offset.left < 0.0 {
        round_non_negative(offset.left.abs() / scale)
    } else {
        0
    };
    let sy = if offset.top < 0.0 {
        round_non_negative(offset.top.abs() / scale)
    } else {
        0
    };

    let dx = if offset.left > 0.0 {
        round_non_negative(offset.left)
    } else {
        0
    };
    let dy = if offset.top > 0.0 {
        round_non_negative(offset.top)
    } else {
        0
    };

    CropRectangle {
        sx,
        sy,
        s_width,
        s_height,
        dx,
        dy,
        d_width: round_non_negative(s_width as f64 * scale),
        d_height: round_non_negative(s_height as f64 * scale),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
