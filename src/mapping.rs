//! Preview-space → export-space coordinate mapping.
//!
//! The editor works against a small preview surface; the exported PNG renders
//! at the frame template's native resolution. Both surfaces share the
//! template's aspect ratio, and the compositor cover-fits the photo per
//! surface, so the *zoom factor is resolution-independent* — only positions
//! rescale. Concretely, for `ratio = export / preview`:
//!
//! - placement offsets multiply by the ratio (per axis),
//! - the scale is carried unchanged,
//! - the caption anchor multiplies by the ratio, and its pixel size by the
//!   vertical ratio, so the exported line holds its preview-relative size.
//!
//! With same-aspect surfaces this makes the export pixel-position-equivalent
//! to the preview up to rounding: every preview point `p` lands at
//! `ratio * p` in the export.
//!
//! Mapping the other way ([`to_preview_placement`]) is the exact inverse;
//! round-tripping returns the original within floating-point tolerance.

use crate::placement::{CaptionPlacement, Placement, SurfaceSize};

/// Rescale a preview-space placement to export-space.
#[must_use]
pub fn to_export_placement(
    placement: Placement,
    preview: SurfaceSize,
    export: SurfaceSize,
) -> Placement {
    let ratio_x = export.width as f64 / preview.width as f64;
    let ratio_y = export.height as f64 / preview.height as f64;
    Placement {
        offset_x: placement.offset_x * ratio_x,
        offset_y: placement.offset_y * ratio_y,
        // cover-fit re-fits the photo per surface, so zoom does not rescale
        scale: placement.scale,
    }
}

/// Rescale an export-space placement back to preview-space.
#[must_use]
pub fn to_preview_placement(
    placement: Placement,
    preview: SurfaceSize,
    export: SurfaceSize,
) -> Placement {
    to_export_placement(placement, export, preview)
}

/// Rescale a caption anchor to export-space.
#[must_use]
pub fn to_export_caption(
    caption: &CaptionPlacement,
    preview: SurfaceSize,
    export: SurfaceSize,
) -> CaptionPlacement {
    CaptionPlacement {
        text: caption.text.clone(),
        x: caption.x * export.width as f64 / preview.width as f64,
        y: caption.y * export.height as f64 / preview.height as f64,
    }
}

/// Rescale a caption pixel size to export-space.
#[must_use]
pub fn to_export_caption_px(px: f32, preview: SurfaceSize, export: SurfaceSize) -> f32 {
    px * (export.height as f64 / preview.height as f64) as f32
}
