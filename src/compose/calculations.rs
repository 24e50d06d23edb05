//! Pure layout math for the compositor.
//!
//! All functions here are pure and testable without any I/O or pixel work.
//! Two pieces combine to position the photo:
//!
//! 1. [`cover_layout`] — aspect-fill ("cover") fit of the photo into a
//!    destination box: one dimension matches the box exactly, the other
//!    overflows and is centered, so the box is always fully covered.
//! 2. [`placed_rect`] — the user's placement transform applied on top:
//!    uniform scale about the surface center, then the drag offset.
//!
//! The compositor always covers the *full surface*, so the surface bounds do
//! the cropping of the overflowing dimension — no explicit clip is needed.

use crate::placement::{Placement, SurfaceSize};

/// An axis-aligned rectangle in surface pixels. May extend outside the
/// surface; drawing clips against the surface bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full rectangle of a surface, anchored at the origin.
    #[must_use]
    pub fn of_surface(surface: SurfaceSize) -> Self {
        Self::new(0.0, 0.0, surface.width as f64, surface.height as f64)
    }
}

/// Compute the cover-fit rectangle for an image drawn into `dest`.
///
/// If the image is relatively wider than the box it is fitted to the box
/// height and overflows horizontally, centered; otherwise it is fitted to the
/// box width and overflows vertically, centered. At least one drawn dimension
/// always equals the box dimension, the other is `>=` it.
///
/// Callers must reject zero-dimension images before reaching this routine
/// (the compositor maps them to `ComposeError::InvalidImage`).
///
/// # Examples
/// ```
/// # use framelet::compose::calculations::{cover_layout, Rect};
/// // 2:1 image into a square box: fit height, overflow width, center
/// let r = cover_layout((100, 50), Rect::new(0.0, 0.0, 100.0, 100.0));
/// assert_eq!((r.width, r.height), (200.0, 100.0));
/// assert_eq!((r.x, r.y), (-50.0, 0.0));
/// ```
#[must_use]
pub fn cover_layout(image: (u32, u32), dest: Rect) -> Rect {
    let (img_w, img_h) = image;
    let img_ratio = img_w as f64 / img_h as f64;
    let box_ratio = dest.width / dest.height;

    if img_ratio > box_ratio {
        // Image is relatively wider: fit to height, center the overflow
        let height = dest.height;
        let width = dest.height * img_ratio;
        Rect::new(dest.x - (width - dest.width) / 2.0, dest.y, width, height)
    } else {
        // Image is relatively taller (or equal): fit to width
        let width = dest.width;
        let height = dest.width / img_ratio;
        Rect::new(dest.x, dest.y - (height - dest.height) / 2.0, width, height)
    }
}

/// Apply a placement transform to a layout rectangle.
///
/// The transform is: translate to the surface center plus the drag offset,
/// scale uniformly, translate back by the center. A point `p` therefore maps
/// to `scale * (p - center) + center + offset`, which scales the photo about
/// the surface center and then shifts it by the drag offset.
#[must_use]
pub fn placed_rect(layout: Rect, placement: Placement, surface: SurfaceSize) -> Rect {
    let (cx, cy) = surface.center();
    let s = placement.scale;
    Rect::new(
        s * (layout.x - cx) + cx + placement.offset_x,
        s * (layout.y - cy) + cy + placement.offset_y,
        s * layout.width,
        s * layout.height,
    )
}
