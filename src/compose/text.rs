//! Caption text rendering.
//!
//! Single-line only — the caption is one run of glyphs, centered on its
//! anchor, baseline at the anchor's `y`. Glyph coverage is alpha-blended
//! (source-over) so captions composite correctly over transparent surfaces.

use super::compositor::ComposeError;
use super::params::CaptionStyle;
use crate::placement::CaptionPlacement;
use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point};

/// Parse raw TTF/OTF bytes into a font.
pub fn load_font(bytes: Vec<u8>) -> Result<Font<'static>, ComposeError> {
    Font::try_from_vec(bytes)
        .ok_or_else(|| ComposeError::FontUnavailable("font data did not parse as TTF/OTF".into()))
}

/// Width of a single line at the given pixel size, as the sum of advance
/// widths. Matches the caret movement in [`draw_caption`], so centering based
/// on this width is exact.
#[must_use]
pub fn line_width(font: &Font<'_>, px: f32, text: &str) -> f32 {
    let scale = Scale::uniform(px);
    text.chars()
        .map(|ch| font.glyph(ch).scaled(scale).h_metrics().advance_width)
        .sum()
}

/// Draw a caption onto the surface. Glyphs falling outside the surface are
/// clipped per-pixel.
pub fn draw_caption(
    surface: &mut RgbaImage,
    font: &Font<'_>,
    style: CaptionStyle,
    caption: &CaptionPlacement,
) {
    let scale = Scale::uniform(style.px);
    let width = line_width(font, style.px, &caption.text);
    let mut caret_x = caption.x as f32 - width / 2.0;
    let baseline_y = caption.y as f32;

    for ch in caption.text.chars() {
        let glyph = font
            .glyph(ch)
            .scaled(scale)
            .positioned(point(caret_x, baseline_y));
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= surface.width() || py >= surface.height() {
                    return;
                }
                blend_over(surface.get_pixel_mut(px, py), style.color, coverage);
            });
        }
        caret_x += glyph.unpositioned().h_metrics().advance_width;
    }
}

/// Source-over blend of `color` at the given coverage onto `dst`.
fn blend_over(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let sa = coverage.clamp(0.0, 1.0) * (color.0[3] as f32 / 255.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for i in 0..3 {
        let sc = color.0[i] as f32;
        let dc = dst.0[i] as f32;
        dst.0[i] = ((sc * sa + dc * da * (1.0 - sa)) / out_a).round() as u8;
    }
    dst.0[3] = (out_a * 255.0).round() as u8;
}
