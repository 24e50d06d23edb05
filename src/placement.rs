//! Placement data model shared by the session, mapper, and compositor.
//!
//! All coordinates live in *surface pixels*. A placement is always expressed
//! relative to one concrete surface (the preview surface while editing, the
//! template-native surface after mapping) — see [`crate::mapping`] for the
//! conversion between the two.

use serde::{Deserialize, Serialize};

/// Lower bound for the uniform zoom factor.
pub const MIN_SCALE: f64 = 0.1;
/// Upper bound for the uniform zoom factor.
pub const MAX_SCALE: f64 = 5.0;

/// Stock caption anchor when no position has been configured.
pub const DEFAULT_CAPTION_POSITION: [f64; 2] = [100.0, 400.0];

/// User-adjustable photo placement: translation plus uniform zoom.
///
/// Offsets are measured from the surface center and are deliberately
/// unbounded — panning the photo fully out of frame is allowed. The scale is
/// clamped to `[0.1, 5.0]` on every update, so a `Placement` is never
/// partially invalid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Placement {
    /// Horizontal offset in surface pixels, relative to the surface center.
    pub offset_x: f64,
    /// Vertical offset in surface pixels, relative to the surface center.
    pub offset_y: f64,
    /// Uniform zoom factor, clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub scale: f64,
}

impl Placement {
    /// Build a placement, clamping the scale into the valid range.
    #[must_use]
    pub fn new(offset_x: f64, offset_y: f64, scale: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            scale: scale.clamp(MIN_SCALE, MAX_SCALE),
        }
    }

    /// Placement shifted by a drag delta. No clamping — offsets are unbounded.
    #[must_use]
    pub fn dragged(self, dx: f64, dy: f64) -> Self {
        Self {
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
            ..self
        }
    }

    /// Placement with the zoom delta applied and clamped.
    #[must_use]
    pub fn zoomed(self, delta: f64) -> Self {
        Self {
            scale: (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE),
            ..self
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

/// A caption and its anchor point on the surface.
///
/// `x` is the horizontal center of the rendered line; `y` is the text
/// baseline. A caption with empty text does not exist — construction
/// normalizes it away, so downstream code never branches on emptiness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionPlacement {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

impl CaptionPlacement {
    /// Build a caption placement; empty text yields `None`.
    #[must_use]
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            None
        } else {
            Some(Self { text, x, y })
        }
    }
}

/// Pixel dimensions of a drawing surface (preview or export).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width / height ratio. Callers guarantee non-zero height (config
    /// validation and asset loading both reject zero dimensions).
    #[must_use]
    pub fn aspect(self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Surface center in pixel coordinates.
    #[must_use]
    pub fn center(self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Whether two surfaces share an aspect ratio, within a tolerance that
    /// absorbs integer-rounded template dimensions.
    #[must_use]
    pub fn same_aspect(self, other: SurfaceSize) -> bool {
        (self.aspect() - other.aspect()).abs() <= 0.005
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_scale() {
        assert_eq!(Placement::new(0.0, 0.0, 0.0).scale, MIN_SCALE);
        assert_eq!(Placement::new(0.0, 0.0, 99.0).scale, MAX_SCALE);
        assert_eq!(Placement::new(0.0, 0.0, 1.7).scale, 1.7);
    }

    #[test]
    fn dragged_accumulates_without_bounds() {
        let p = Placement::default().dragged(5000.0, -5000.0).dragged(1.5, 2.5);
        assert_eq!(p.offset_x, 5001.5);
        assert_eq!(p.offset_y, -4997.5);
        assert_eq!(p.scale, 1.0);
    }

    #[test]
    fn zoom_converges_to_upper_bound() {
        let mut p = Placement::default();
        for _ in 0..10 {
            p = p.zoomed(10.0);
        }
        assert_eq!(p.scale, MAX_SCALE);
    }

    #[test]
    fn zoom_converges_to_lower_bound() {
        let mut p = Placement::default();
        for _ in 0..10 {
            p = p.zoomed(-10.0);
        }
        assert_eq!(p.scale, MIN_SCALE);
    }

    #[test]
    fn caption_with_empty_text_does_not_exist() {
        assert!(CaptionPlacement::new("", 100.0, 400.0).is_none());
        let c = CaptionPlacement::new("Hello", 100.0, 400.0).unwrap();
        assert_eq!(c.text, "Hello");
    }

    #[test]
    fn surface_aspect_and_center() {
        let s = SurfaceSize::new(320, 400);
        assert_eq!(s.aspect(), 0.8);
        assert_eq!(s.center(), (160.0, 200.0));
    }

    #[test]
    fn same_aspect_tolerates_rounded_templates() {
        let preview = SurfaceSize::new(320, 400);
        assert!(preview.same_aspect(SurfaceSize::new(1600, 2000)));
        // 1080x1350 is the same 4:5 authored at a social-media size
        assert!(preview.same_aspect(SurfaceSize::new(1080, 1350)));
        assert!(!preview.same_aspect(SurfaceSize::new(800, 800)));
    }
}
