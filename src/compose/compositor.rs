//! The frame compositor.
//!
//! Draw order is a hard contract — reordering changes the visual output:
//!
//! 1. Clear the surface to the configured background.
//! 2. Draw the photo cover-fit into the full surface rectangle, under the
//!    placement transform (scale about center, then offset). The surface
//!    bounds crop the overflow.
//! 3. Draw the frame template stretched to the exact surface bounds (frames
//!    are authored at the surface's aspect ratio, so this is not cover-fit).
//! 4. Draw the caption, centered on its anchor, baseline at `y`.
//!
//! All inputs are validated before the surface is touched, so a failed render
//! leaves nothing behind: the caller's world is unchanged. A missing photo is
//! not an error — the result is the cleared surface plus the frame, which is
//! exactly what the editor shows before an upload.

use super::calculations::{Rect, cover_layout, placed_rect};
use super::params::ComposeParams;
use super::text;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use rusttype::Font;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("invalid photo: {0}")]
    InvalidImage(String),
    #[error("frame template unavailable: {0}")]
    MissingAsset(String),
    #[error("caption font unavailable: {0}")]
    FontUnavailable(String),
    #[error("PNG encoding failed: {0}")]
    Encoding(String),
}

/// Result type for compositor operations.
pub type Result<T> = std::result::Result<T, ComposeError>;

/// Render one composite. See the module docs for the draw order contract.
pub fn compose(
    photo: Option<&RgbaImage>,
    frame: &RgbaImage,
    font: Option<&Font<'_>>,
    params: &ComposeParams,
) -> Result<RgbaImage> {
    // Validate everything up front — no partial surface on failure.
    if frame.width() == 0 || frame.height() == 0 {
        return Err(ComposeError::MissingAsset(
            "frame has zero dimensions".into(),
        ));
    }
    if let Some(photo) = photo
        && (photo.width() == 0 || photo.height() == 0)
    {
        return Err(ComposeError::InvalidImage("zero-dimension photo".into()));
    }
    if params.caption.is_some() && font.is_none() {
        return Err(ComposeError::FontUnavailable(
            "caption requested but no font is configured".into(),
        ));
    }

    let (sw, sh) = (params.surface.width, params.surface.height);
    let mut surface = RgbaImage::from_pixel(sw, sh, params.background.clear_pixel());

    if let Some(photo) = photo {
        let layout = cover_layout(photo.dimensions(), Rect::of_surface(params.surface));
        let rect = placed_rect(layout, params.placement, params.surface);
        let draw_w = rect.width.round().max(1.0) as u32;
        let draw_h = rect.height.round().max(1.0) as u32;
        let resized = if params.filter.is_active() {
            imageops::resize(&params.filter.apply(photo), draw_w, draw_h, FilterType::Lanczos3)
        } else {
            imageops::resize(photo, draw_w, draw_h, FilterType::Lanczos3)
        };
        // overlay clips against the surface bounds on all four sides
        imageops::overlay(&mut surface, &resized, rect.x.round() as i64, rect.y.round() as i64);
    }

    if frame.dimensions() == (sw, sh) {
        imageops::overlay(&mut surface, frame, 0, 0);
    } else {
        let stretched = imageops::resize(frame, sw, sh, FilterType::Lanczos3);
        imageops::overlay(&mut surface, &stretched, 0, 0);
    }

    if let (Some(caption), Some(font)) = (&params.caption, font) {
        text::draw_caption(&mut surface, font, params.caption_style, caption);
    }

    Ok(surface)
}

/// Encode a rendered surface as PNG bytes.
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            surface.as_raw(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ComposeError::Encoding(e.to_string()))?;
    Ok(bytes)
}
