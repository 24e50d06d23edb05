//! Shared test utilities for the framelet test suite.
//!
//! Synthetic fixtures only — no binary assets are checked in. Frames come
//! from [`window_frame`]: an opaque border with a transparent center window,
//! which is the shape every real campaign frame has, so "does the photo show
//! through" is a one-pixel assertion.

use image::{Rgba, RgbaImage};
use std::path::Path;

/// Border color used by [`window_frame`].
pub const FRAME_BORDER: [u8; 4] = [30, 30, 60, 255];

/// A fully opaque single-color photo.
pub fn solid_photo(width: u32, height: u32, rgb: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

/// A frame template: opaque border one tenth of the width thick, fully
/// transparent window in the middle.
pub fn window_frame(width: u32, height: u32) -> RgbaImage {
    let border = (width / 10).max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        let in_window =
            x >= border && x < width - border && y >= border && y < height - border;
        if in_window {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba(FRAME_BORDER)
        }
    })
}

/// Write an image as PNG, panicking on failure (tests only).
pub fn write_png(path: &Path, img: &RgbaImage) {
    img.save(path).unwrap();
}
