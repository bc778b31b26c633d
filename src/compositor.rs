//! Compositing core: fit a variable-aspect photo onto a fixed square canvas,
//! apply the user transform, draw the decorative overlay on top, and encode
//! the high-resolution export.
//!
//! Both render paths are pure functions of (source, overlay, transform) —
//! there is no cached render state, so calling them twice with unchanged
//! inputs yields pixel-identical output.

use image::codecs::png::PngEncoder;
use image::{imageops, ImageEncoder, Rgba, RgbaImage};
use std::io::BufWriter;

use crate::transform::Transform;

/// The rectangle at which the source photo is drawn, before offsets.
/// Kept in f32 canvas units; rounding to device pixels happens at draw time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
}

/// Aspect-preserving cover fit: at `scale = 1` the photo's dominant axis
/// exactly spans the canvas edge, and the photo is centered on the other
/// axis. Callers must not pass zero source dimensions — the loader rejects
/// degenerate bitmaps before they get here.
pub fn fit_dimensions(source_w: u32, source_h: u32, canvas_size: u32, scale: f32) -> Placement {
    let canvas = canvas_size as f32;
    let aspect = source_w as f32 / source_h as f32;

    let (width, height) = if aspect > 1.0 {
        // Landscape: width leads
        let width = canvas * scale;
        (width, width / aspect)
    } else {
        // Portrait or square: height leads
        let height = canvas * scale;
        (height * aspect, height)
    };

    Placement {
        width,
        height,
        x: (canvas - width) / 2.0,
        y: (canvas - height) / 2.0,
    }
}

/// Render the interactive preview at `canvas_size`.
pub fn render_composite(
    source: &RgbaImage,
    overlay: Option<&RgbaImage>,
    transform: &Transform,
    canvas_size: u32,
) -> RgbaImage {
    render_scaled(
        source,
        overlay,
        transform,
        canvas_size,
        1.0,
        imageops::FilterType::Triangle,
    )
}

/// Render at `export_size` and encode as PNG into an in-memory buffer.
///
/// The geometry is computed at `preview_size` and uniformly multiplied by
/// `export_size / preview_size` (offsets included), so the export is a
/// pixel-faithful upscale of what the preview showed.
pub fn export_composite(
    source: &RgbaImage,
    overlay: Option<&RgbaImage>,
    transform: &Transform,
    preview_size: u32,
    export_size: u32,
) -> Result<Vec<u8>, image::ImageError> {
    let factor = export_size as f32 / preview_size as f32;
    let canvas = render_scaled(
        source,
        overlay,
        transform,
        preview_size,
        factor,
        imageops::FilterType::Lanczos3,
    );

    let mut buf = Vec::new();
    {
        let mut writer = BufWriter::new(&mut buf);
        let encoder = PngEncoder::new(&mut writer);
        encoder.write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            image::ColorType::Rgba8,
        )?;
    }
    Ok(buf)
}

/// Shared render path. `factor` scales every placement value (including the
/// user offsets) from preview units to the target surface, which keeps the
/// two resolutions geometrically consistent.
fn render_scaled(
    source: &RgbaImage,
    overlay: Option<&RgbaImage>,
    transform: &Transform,
    canvas_size: u32,
    factor: f32,
    filter: imageops::FilterType,
) -> RgbaImage {
    let edge = ((canvas_size as f32 * factor).round() as u32).max(1);
    let mut canvas = RgbaImage::from_pixel(edge, edge, Rgba([0, 0, 0, 0]));

    let placement = fit_dimensions(source.width(), source.height(), canvas_size, transform.scale);
    let draw_w = ((placement.width * factor).round() as u32).max(1);
    let draw_h = ((placement.height * factor).round() as u32).max(1);
    let draw_x = ((placement.x + transform.offset_x as f32) * factor).round() as i64;
    let draw_y = ((placement.y + transform.offset_y as f32) * factor).round() as i64;

    let resampled = imageops::resize(source, draw_w, draw_h, filter);
    imageops::overlay(&mut canvas, &resampled, draw_x, draw_y);

    // Frame always spans the full canvas and always lands on top.
    if let Some(frame) = overlay {
        if frame.width() == edge && frame.height() == edge {
            imageops::overlay(&mut canvas, frame, 0, 0);
        } else {
            let scaled = imageops::resize(frame, edge, edge, filter);
            imageops::overlay(&mut canvas, &scaled, 0, 0);
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.01;

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    #[test]
    fn test_landscape_fit_at_unit_scale() {
        let p = fit_dimensions(1200, 800, 400, 1.0);
        assert!((p.width - 400.0).abs() < EPS);
        assert!((p.height - 266.666_66).abs() < EPS);
        assert!((p.x - 0.0).abs() < EPS);
        assert!((p.y - 66.666_66).abs() < EPS);
    }

    #[test]
    fn test_portrait_fit_at_unit_scale() {
        let p = fit_dimensions(800, 1200, 400, 1.0);
        assert!((p.height - 400.0).abs() < EPS);
        assert!((p.width - 266.666_66).abs() < EPS);
        assert!((p.y - 0.0).abs() < EPS);
        assert!((p.x - 66.666_66).abs() < EPS);
    }

    #[test]
    fn test_fit_preserves_aspect_and_positivity() {
        let cases = [
            (1u32, 1u32, 1.0f32),
            (3, 2, 0.5),
            (1920, 1080, 2.7),
            (600, 601, 1.3),
            (5000, 100, 3.0),
            (100, 5000, 0.5),
        ];
        for (w, h, scale) in cases {
            let p = fit_dimensions(w, h, 400, scale);
            assert!(p.width > 0.0 && p.height > 0.0, "degenerate for {w}x{h}");
            let want = w as f32 / h as f32;
            let got = p.width / p.height;
            assert!(
                (got - want).abs() < 1e-3,
                "aspect drifted for {w}x{h}@{scale}: {got} vs {want}"
            );
        }
    }

    #[test]
    fn test_square_source_fills_canvas() {
        let p = fit_dimensions(640, 640, 400, 1.0);
        assert!((p.width - 400.0).abs() < EPS);
        assert!((p.height - 400.0).abs() < EPS);
        assert!(p.x.abs() < EPS && p.y.abs() < EPS);
    }

    #[test]
    fn test_centering_is_symmetric() {
        for (w, h) in [(1200u32, 800u32), (800, 1200), (333, 777)] {
            let p = fit_dimensions(w, h, 400, 1.0);
            assert!((p.x - (400.0 - p.width) / 2.0).abs() < EPS);
            assert!((p.y - (400.0 - p.height) / 2.0).abs() < EPS);
        }
    }

    #[test]
    fn test_export_geometry_matches_preview_times_factor() {
        // Placement computed at the preview edge, then multiplied by k, must
        // agree with the placement computed directly at the export edge.
        let k = 2.0;
        for (w, h, scale) in [(1200u32, 800u32, 1.0f32), (800, 1200, 1.7), (500, 500, 0.5)] {
            let preview = fit_dimensions(w, h, 400, scale);
            let export = fit_dimensions(w, h, 800, scale);
            assert!((preview.width * k - export.width).abs() < EPS);
            assert!((preview.height * k - export.height).abs() < EPS);
            assert!((preview.x * k - export.x).abs() < EPS);
            assert!((preview.y * k - export.y).abs() < EPS);
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let source = solid(30, 20, [200, 40, 40, 255]);
        let overlay = solid(16, 16, [0, 0, 255, 120]);
        let transform = Transform {
            scale: 1.4,
            offset_x: -3,
            offset_y: 5,
        };
        let a = render_composite(&source, Some(&overlay), &transform, 16);
        let b = render_composite(&source, Some(&overlay), &transform, 16);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_opaque_overlay_wins_everywhere() {
        let source = solid(10, 10, [255, 0, 0, 255]);
        let overlay = solid(8, 8, [0, 0, 255, 255]);
        let out = render_composite(&source, Some(&overlay), &Transform::default(), 8);
        for px in out.pixels() {
            assert_eq!(px.0, [0, 0, 255, 255]);
        }
    }

    #[test]
    fn test_transparent_overlay_regions_show_source() {
        let source = solid(10, 10, [255, 0, 0, 255]);
        // Opaque border, fully transparent 4x4 window in the middle.
        let mut overlay = solid(8, 8, [0, 255, 0, 255]);
        for y in 2..6 {
            for x in 2..6 {
                overlay.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
        let out = render_composite(&source, Some(&overlay), &Transform::default(), 8);
        assert_eq!(out.get_pixel(3, 3).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(0, 0).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_missing_overlay_degrades_to_photo_only() {
        let source = solid(10, 10, [9, 9, 9, 255]);
        let out = render_composite(&source, None, &Transform::default(), 8);
        assert_eq!(out.get_pixel(4, 4).0, [9, 9, 9, 255]);
    }

    #[test]
    fn test_offsets_move_the_photo() {
        let source = solid(4, 4, [255, 255, 255, 255]);
        let shifted = Transform {
            scale: 0.5,
            offset_x: 2,
            offset_y: 0,
        };
        let centered = render_composite(&source, None, &Transform { scale: 0.5, ..Default::default() }, 8);
        let moved = render_composite(&source, None, &shifted, 8);
        assert_ne!(centered.as_raw(), moved.as_raw());
        // Half-scale square photo on an 8px canvas sits at x=2..6 centered;
        // shifting +2 exposes the left column.
        assert_eq!(centered.get_pixel(2, 4).0[3], 255);
        assert_eq!(moved.get_pixel(2, 4).0[3], 0);
    }

    #[test]
    fn test_export_is_png_at_export_dimensions() {
        let source = solid(30, 20, [10, 120, 200, 255]);
        let bytes =
            export_composite(&source, None, &Transform::default(), 400, 800).expect("encode");
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        let decoded = image::load_from_memory(&bytes).expect("decode back");
        assert_eq!(decoded.width(), 800);
        assert_eq!(decoded.height(), 800);
    }

    #[test]
    fn test_mismatched_overlay_still_covers_canvas() {
        let source = solid(10, 10, [255, 0, 0, 255]);
        // Overlay asset larger than the canvas edge: must be resampled down
        // to cover exactly, corner to corner.
        let overlay = solid(32, 32, [0, 0, 255, 255]);
        let out = render_composite(&source, Some(&overlay), &Transform::default(), 8);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(out.get_pixel(7, 7).0, [0, 0, 255, 255]);
    }
}
