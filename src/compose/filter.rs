//! Photo color filters applied before compositing.
//!
//! The photo itself is never mutated — `apply` returns a filtered copy and
//! `None` is a plain clone. Filters act on the photo only; the frame template
//! and caption are always drawn unfiltered.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Color filter for the user photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PhotoFilter {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
}

impl PhotoFilter {
    /// Returns `true` if this filter changes pixels.
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Apply the filter to a copy of `photo`. Alpha is preserved.
    #[must_use]
    pub fn apply(self, photo: &RgbaImage) -> RgbaImage {
        match self {
            Self::None => photo.clone(),
            Self::Grayscale => map_pixels(photo, |[r, g, b, a]| {
                // BT.601 luma
                let y = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32).round() as u8;
                [y, y, y, a]
            }),
            Self::Sepia => map_pixels(photo, |[r, g, b, a]| {
                let (r, g, b) = (r as f32, g as f32, b as f32);
                [
                    (0.393 * r + 0.769 * g + 0.189 * b).min(255.0) as u8,
                    (0.349 * r + 0.686 * g + 0.168 * b).min(255.0) as u8,
                    (0.272 * r + 0.534 * g + 0.131 * b).min(255.0) as u8,
                    a,
                ]
            }),
            Self::Invert => map_pixels(photo, |[r, g, b, a]| [255 - r, 255 - g, 255 - b, a]),
        }
    }
}

fn map_pixels(photo: &RgbaImage, f: impl Fn([u8; 4]) -> [u8; 4]) -> RgbaImage {
    let mut out = photo.clone();
    for px in out.pixels_mut() {
        *px = Rgba(f(px.0));
    }
    out
}

impl FromStr for PhotoFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "grayscale" => Ok(Self::Grayscale),
            "sepia" => Ok(Self::Sepia),
            "invert" => Ok(Self::Invert),
            other => Err(format!(
                "unknown filter '{other}' (expected none, grayscale, sepia, or invert)"
            )),
        }
    }
}
