//! Rasterization of a crop rectangle into a viewport-sized canvas.
//!
//! Follows the semantics of the nine-argument canvas `drawImage`: the source
//! rectangle is clipped to the image bounds, the destination rectangle is
//! clipped by the same proportion, and anything falling outside the canvas
//! is discarded. Pixels that receive nothing stay fully transparent.

use image::{imageops, Rgba, RgbaImage};

use crate::decode::{DecodeError, DecodedImage, FilterType};
use crate::geometry::{CropRectangle, ViewportBounds};

/// Source region and where it lands after clipping.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawRegion {
    sx: u32,
    sy: u32,
    s_width: u32,
    s_height: u32,
    dx: u32,
    dy: u32,
    d_width: u32,
    d_height: u32,
    scale_x: f64,
    scale_y: f64,
}

/// Clip the source rectangle to the image and shrink the destination to match.
///
/// Returns `None` when nothing would be drawn.
fn clip_to_source(rect: &CropRectangle, width: u32, height: u32) -> Option<DrawRegion> {
    if rect.is_empty() || rect.sx >= width || rect.sy >= height {
        return None;
    }

    let scale_x = rect.d_width as f64 / rect.s_width as f64;
    let scale_y = rect.d_height as f64 / rect.s_height as f64;

    // sx/sy are never negative, so only the far edges need clipping.
    let s_width = rect.s_width.min(width - rect.sx);
    let s_height = rect.s_height.min(height - rect.sy);

    let d_width = (s_width as f64 * scale_x).round().min(u32::MAX as f64) as u32;
    let d_height = (s_height as f64 * scale_y).round().min(u32::MAX as f64) as u32;
    if d_width == 0 || d_height == 0 {
        return None;
    }

    Some(DrawRegion {
        sx: rect.sx,
        sy: rect.sy,
        s_width,
        s_height,
        dx: rect.dx,
        dy: rect.dy,
        d_width,
        d_height,
        scale_x,
        scale_y,
    })
}

/// Width and height of the part of the destination that lands on the canvas.
fn visible_extent(region: &DrawRegion, viewport: ViewportBounds) -> Option<(u32, u32)> {
    if region.dx >= viewport.width || region.dy >= viewport.height {
        return None;
    }
    let width = region.d_width.min(viewport.width - region.dx);
    let height = region.d_height.min(viewport.height - region.dy);
    Some((width, height))
}

/// Draw `rect` of `source` onto a transparent canvas the size of `viewport`.
///
/// Only the part of the destination that lands on the canvas is resampled,
/// so the work done never grows past the viewport no matter how far the
/// image is zoomed in.
///
/// # Errors
///
/// Returns `DecodeError::InvalidPixelData` if the source buffer does not
/// match its stated dimensions.
pub fn rasterize(
    source: &DecodedImage,
    rect: &CropRectangle,
    viewport: ViewportBounds,
    filter: FilterType,
) -> Result<RgbaImage, DecodeError> {
    let mut canvas = RgbaImage::new(viewport.width, viewport.height);

    let Some(region) = clip_to_source(rect, source.width, source.height) else {
        return Ok(canvas);
    };
    let Some((visible_w, visible_h)) = visible_extent(&region, viewport) else {
        return Ok(canvas);
    };

    let src = source
        .to_rgba_image()
        .ok_or_else(|| DecodeError::InvalidPixelData {
            expected: source.width as usize * source.height as usize * 4,
            actual: source.pixels.len(),
        })?;

    if region.scale_x <= 1.0 && region.scale_y <= 1.0 {
        draw_reduced(&mut canvas, &src, &region, (visible_w, visible_h), filter);
    } else {
        draw_enlarged(&mut canvas, &src, &region, (visible_w, visible_h), filter);
    }

    Ok(canvas)
}

/// Identity or downscale: crop the source span behind the visible area and
/// let `imageops::resize` shrink it.
fn draw_reduced(
    canvas: &mut RgbaImage,
    src: &RgbaImage,
    region: &DrawRegion,
    (visible_w, visible_h): (u32, u32),
    filter: FilterType,
) {
    let span_w = ((visible_w as f64 / region.scale_x).ceil() as u32).clamp(1, region.s_width);
    let span_h = ((visible_h as f64 / region.scale_y).ceil() as u32).clamp(1, region.s_height);

    let target_w = if span_w == region.s_width {
        region.d_width
    } else {
        ((span_w as f64 * region.scale_x).round() as u32).max(1)
    };
    let target_h = if span_h == region.s_height {
        region.d_height
    } else {
        ((span_h as f64 * region.scale_y).round() as u32).max(1)
    };

    let sampled = imageops::crop_imm(src, region.sx, region.sy, span_w, span_h).to_image();
    let drawn = if target_w == span_w && target_h == span_h {
        sampled
    } else {
        imageops::resize(&sampled, target_w, target_h, filter.to_image_filter())
    };

    // The canvas is fresh and fully transparent, so a straight copy is
    // identical to source-over compositing.
    imageops::replace(canvas, &drawn, region.dx as i64, region.dy as i64);
}

/// Upscale: walk the visible destination pixels and map each one back into
/// the source region.
fn draw_enlarged(
    canvas: &mut RgbaImage,
    src: &RgbaImage,
    region: &DrawRegion,
    (visible_w, visible_h): (u32, u32),
    filter: FilterType,
) {
    let x_max = (region.sx + region.s_width - 1) as f64;
    let y_max = (region.sy + region.s_height - 1) as f64;

    for oy in 0..visible_h {
        // Pixel centers on both sides of the mapping
        let v = region.sy as f64 + (oy as f64 + 0.5) / region.scale_y - 0.5;
        let v = v.clamp(region.sy as f64, y_max);
        for ox in 0..visible_w {
            let u = region.sx as f64 + (ox as f64 + 0.5) / region.scale_x - 0.5;
            let u = u.clamp(region.sx as f64, x_max);

            let pixel = match filter {
                FilterType::Nearest => *src.get_pixel(u.round() as u32, v.round() as u32),
                FilterType::Bilinear => sample_bilinear(src, region, u, v),
                FilterType::Lanczos3 => sample_lanczos3(src, region, u, v),
            };
            canvas.put_pixel(region.dx + ox, region.dy + oy, pixel);
        }
    }
}

/// Clamp a tap position to the clipped source region.
fn tap(region: &DrawRegion, px: i64, py: i64) -> (u32, u32) {
    let x = px.clamp(region.sx as i64, (region.sx + region.s_width - 1) as i64);
    let y = py.clamp(region.sy as i64, (region.sy + region.s_height - 1) as i64);
    (x as u32, y as u32)
}

fn sample_bilinear(src: &RgbaImage, region: &DrawRegion, u: f64, v: f64) -> Rgba<u8> {
    let x0 = u.floor();
    let y0 = v.floor();
    let fx = u - x0;
    let fy = v - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let corners = [
        (tap(region, x0, y0), (1.0 - fx) * (1.0 - fy)),
        (tap(region, x0 + 1, y0), fx * (1.0 - fy)),
        (tap(region, x0, y0 + 1), (1.0 - fx) * fy),
        (tap(region, x0 + 1, y0 + 1), fx * fy),
    ];

    let mut sum = [0.0f64; 4];
    for ((x, y), weight) in corners {
        let p = src.get_pixel(x, y).0;
        for (acc, c) in sum.iter_mut().zip(p) {
            *acc += c as f64 * weight;
        }
    }
    Rgba(sum.map(|c| c.clamp(0.0, 255.0).round() as u8))
}

/// Lanczos3 over a 6x6 neighborhood, edges clamped to the source region.
fn sample_lanczos3(src: &RgbaImage, region: &DrawRegion, u: f64, v: f64) -> Rgba<u8> {
    let x0 = u.floor() as i64;
    let y0 = v.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;
    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(u - px as f64, 3.0) * lanczos_weight(v - py as f64, 3.0);
            let (x, y) = tap(region, px, py);
            let p = src.get_pixel(x, y).0;
            for (acc, c) in sum.iter_mut().zip(p) {
                *acc += c as f64 * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        let (x, y) = tap(region, u.round() as i64, v.round() as i64);
        return *src.get_pixel(x, y);
    }
    Rgba(sum.map(|c| (c / weight_sum).clamp(0.0, 255.0).round() as u8))
}

/// Lanczos kernel: `sinc(x) * sinc(x / a)` inside `|x| < a`, zero outside.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }
    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{crop_rectangle, ImageDimensions, Offset};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    /// Image split into four solid quadrants: red, green / blue, white.
    fn quadrant_image(width: u32, height: u32) -> DecodedImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            let right = x >= width / 2;
            let bottom = y >= height / 2;
            Rgba(match (right, bottom) {
                (false, false) => RED,
                (true, false) => GREEN,
                (false, true) => BLUE,
                (true, true) => WHITE,
            })
        });
        DecodedImage::from_rgba_image(img)
    }

    #[allow(clippy::too_many_arguments)]
    fn rect(sx: u32, sy: u32, sw: u32, sh: u32, dx: u32, dy: u32, dw: u32, dh: u32) -> CropRectangle {
        CropRectangle {
            sx,
            sy,
            s_width: sw,
            s_height: sh,
            dx,
            dy,
            d_width: dw,
            d_height: dh,
        }
    }

    #[test]
    fn test_identity_draw() {
        let source = quadrant_image(4, 4);
        let canvas = rasterize(
            &source,
            &rect(0, 0, 4, 4, 0, 0, 4, 4),
            ViewportBounds::new(4, 4),
            FilterType::Nearest,
        )
        .unwrap();

        assert_eq!(canvas.into_raw(), source.pixels);
    }

    #[test]
    fn test_canvas_matches_viewport() {
        let source = quadrant_image(8, 8);
        let canvas = rasterize(
            &source,
            &rect(0, 0, 8, 8, 0, 0, 8, 8),
            ViewportBounds::new(5, 3),
            FilterType::Bilinear,
        )
        .unwrap();

        assert_eq!(canvas.dimensions(), (5, 3));
    }

    #[test]
    fn test_source_offset_samples_inside_image() {
        let source = quadrant_image(4, 4);
        // Start sampling at the bottom-right quadrant
        let canvas = rasterize(
            &source,
            &rect(2, 2, 2, 2, 0, 0, 2, 2),
            ViewportBounds::new(2, 2),
            FilterType::Nearest,
        )
        .unwrap();

        assert!(canvas.pixels().all(|p| p.0 == WHITE));
    }

    #[test]
    fn test_destination_gap_stays_transparent() {
        let source = quadrant_image(4, 4);
        let canvas = rasterize(
            &source,
            &rect(0, 0, 4, 4, 2, 1, 4, 4),
            ViewportBounds::new(6, 6),
            FilterType::Nearest,
        )
        .unwrap();

        assert_eq!(canvas.get_pixel(0, 0).0, CLEAR);
        assert_eq!(canvas.get_pixel(1, 5).0, CLEAR);
        assert_eq!(canvas.get_pixel(2, 1).0, RED);
        assert_eq!(canvas.get_pixel(5, 4).0, WHITE);
    }

    #[test]
    fn test_upscale_nearest() {
        let source = quadrant_image(2, 2);
        let canvas = rasterize(
            &source,
            &rect(0, 0, 2, 2, 0, 0, 4, 4),
            ViewportBounds::new(4, 4),
            FilterType::Nearest,
        )
        .unwrap();

        assert_eq!(canvas.get_pixel(0, 0).0, RED);
        assert_eq!(canvas.get_pixel(1, 1).0, RED);
        assert_eq!(canvas.get_pixel(3, 0).0, GREEN);
        assert_eq!(canvas.get_pixel(0, 3).0, BLUE);
        assert_eq!(canvas.get_pixel(3, 3).0, WHITE);
    }

    #[test]
    fn test_oversized_source_is_clipped_proportionally() {
        let source = quadrant_image(4, 4);
        // Source asks for 8x8 from a 4x4 image at 2x: only 8x8 of the 16x16 destination is drawn
        let canvas = rasterize(
            &source,
            &rect(0, 0, 8, 8, 0, 0, 16, 16),
            ViewportBounds::new(16, 16),
            FilterType::Nearest,
        )
        .unwrap();

        assert_eq!(canvas.get_pixel(7, 7).0, WHITE);
        assert_eq!(canvas.get_pixel(8, 0).0, CLEAR);
        assert_eq!(canvas.get_pixel(0, 8).0, CLEAR);
    }

    #[test]
    fn test_empty_rect_draws_nothing() {
        let source = quadrant_image(4, 4);
        let canvas = rasterize(
            &source,
            &CropRectangle::default(),
            ViewportBounds::new(3, 3),
            FilterType::Nearest,
        )
        .unwrap();

        assert!(canvas.pixels().all(|p| p.0 == CLEAR));
    }

    #[test]
    fn test_source_outside_image_draws_nothing() {
        let source = quadrant_image(4, 4);
        let canvas = rasterize(
            &source,
            &rect(10, 0, 4, 4, 0, 0, 4, 4),
            ViewportBounds::new(4, 4),
            FilterType::Nearest,
        )
        .unwrap();

        assert!(canvas.pixels().all(|p| p.0 == CLEAR));
    }

    #[test]
    fn test_mismatched_buffer_is_an_error() {
        let source = DecodedImage {
            width: 4,
            height: 4,
            pixels: vec![0u8; 10],
        };
        let result = rasterize(
            &source,
            &rect(0, 0, 4, 4, 0, 0, 4, 4),
            ViewportBounds::new(4, 4),
            FilterType::Nearest,
        );
        assert!(matches!(result, Err(DecodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_engine_rectangle_fills_viewport_when_covering() {
        // 400x400 in a 200x100 mask at cover-fit, centered: the whole mask is covered
        let source = DecodedImage::from_rgba_image(RgbaImage::from_pixel(400, 400, Rgba(RED)));
        let rect = crop_rectangle(ImageDimensions::new(400, 400), 0.5, Offset::new(0.0, -50.0));
        let canvas = rasterize(&source, &rect, ViewportBounds::new(200, 100), FilterType::Bilinear)
            .unwrap();

        assert!(canvas.pixels().all(|p| p.0 == RED));
    }

    #[test]
    fn test_huge_destination_only_draws_viewport() {
        let source = quadrant_image(4, 4);
        // Destination is u32::MAX wide; only the 10x10 on the canvas is sampled
        let canvas = rasterize(
            &source,
            &rect(0, 0, 4, 4, 0, 0, u32::MAX, u32::MAX),
            ViewportBounds::new(10, 10),
            FilterType::Bilinear,
        )
        .unwrap();

        assert_eq!(canvas.dimensions(), (10, 10));
        assert!(canvas.pixels().all(|p| p.0 == RED));
    }

    #[test]
    fn test_enlarged_region_clipped_by_canvas_edge() {
        let source = quadrant_image(4, 4);
        // 100x zoom starting in the white quadrant, pushed 3px right
        let canvas = rasterize(
            &source,
            &rect(2, 2, 2, 2, 3, 0, 200, 200),
            ViewportBounds::new(8, 8),
            FilterType::Lanczos3,
        )
        .unwrap();

        assert_eq!(canvas.get_pixel(2, 4).0, CLEAR);
        assert_eq!(canvas.get_pixel(3, 0).0, WHITE);
        assert_eq!(canvas.get_pixel(7, 7).0, WHITE);
    }

    #[test]
    fn test_downscale_only_reads_visible_span() {
        let source = quadrant_image(40, 40);
        // Half-size draw of the whole image, but the canvas only shows the red quadrant
        let canvas = rasterize(
            &source,
            &rect(0, 0, 40, 40, 0, 0, 20, 20),
            ViewportBounds::new(5, 5),
            FilterType::Bilinear,
        )
        .unwrap();

        assert_eq!(canvas.dimensions(), (5, 5));
        assert!(canvas.pixels().all(|p| p.0 == RED));
    }

    #[test]
    fn test_destination_past_canvas_draws_nothing() {
        let source = quadrant_image(4, 4);
        let canvas = rasterize(
            &source,
            &rect(0, 0, 4, 4, 20, 0, 400, 400),
            ViewportBounds::new(10, 10),
            FilterType::Nearest,
        )
        .unwrap();

        assert!(canvas.pixels().all(|p| p.0 == CLEAR));
    }
}
