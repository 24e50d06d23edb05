//! Parameter types for the compositor.
//!
//! These structs describe *what* to render, not *how* to render it. They are
//! the interface between callers that decide on a composite (the CLI, the
//! export orchestration) and the [`compositor`](super::compositor) that does
//! the pixel work.
//!
//! ## Types
//!
//! - [`Background`] — what the surface is cleared to before drawing.
//! - [`CaptionStyle`] — pixel size and fill color for caption text. The
//!   weight comes from the configured font face itself (ship a bold face for
//!   the stock bold look).
//! - [`ComposeParams`] — full specification for one composite.

use crate::compose::filter::PhotoFilter;
use crate::placement::{CaptionPlacement, Placement, SurfaceSize};
use image::Rgba;

/// Surface clear color applied before any drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    /// Fully transparent pixels — the template's own alpha decides the result.
    #[default]
    Transparent,
    /// An opaque solid fill.
    Solid(Rgba<u8>),
}

impl Background {
    /// The pixel every surface position starts from.
    #[must_use]
    pub fn clear_pixel(self) -> Rgba<u8> {
        match self {
            Self::Transparent => Rgba([0, 0, 0, 0]),
            Self::Solid(px) => px,
        }
    }
}

/// Caption rendering style. Size is clamped to a sane floor on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionStyle {
    pub px: f32,
    pub color: Rgba<u8>,
}

impl CaptionStyle {
    #[must_use]
    pub fn new(px: f32, color: Rgba<u8>) -> Self {
        Self {
            px: px.max(1.0),
            color,
        }
    }
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            px: 40.0,
            color: Rgba([255, 255, 255, 255]),
        }
    }
}

/// Full specification of one composite render.
///
/// All coordinates (placement offsets, caption anchor, caption pixel size)
/// are in the coordinate space of `surface` — callers rendering at a
/// different resolution than the one the placement was authored at must map
/// it first (see [`crate::mapping`]).
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeParams {
    pub surface: SurfaceSize,
    pub background: Background,
    pub placement: Placement,
    pub filter: PhotoFilter,
    pub caption: Option<CaptionPlacement>,
    pub caption_style: CaptionStyle,
}

impl ComposeParams {
    /// Parameters for a plain render at `surface` with everything else stock.
    #[must_use]
    pub fn new(surface: SurfaceSize) -> Self {
        Self {
            surface,
            background: Background::default(),
            placement: Placement::default(),
            filter: PhotoFilter::default(),
            caption: None,
            caption_style: CaptionStyle::default(),
        }
    }
}
