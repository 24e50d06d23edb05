//! Compositing — pure Rust, zero external dependencies.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Cover-fit layout** | pure math ([`calculations`]) |
//! | **Photo resample** | `image::imageops::resize`, Lanczos3 |
//! | **Clipped draw** | `image::imageops::overlay` |
//! | **Caption** | `rusttype` glyph rasterization, source-over blend |
//! | **Encode → PNG** | `image::codecs::png::PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: pure functions for layout math (unit testable)
//! - **Params**: data structures describing one composite
//! - **Assets**: decode + validate photos and frame templates
//! - **Compositor**: the fixed-order render pipeline and PNG encoding

pub mod assets;
pub mod calculations;
mod filter;
mod params;
mod text;

pub mod compositor;

pub use assets::{identify, load_frame, load_photo};
pub use compositor::{ComposeError, compose, encode_png};
pub use filter::PhotoFilter;
pub use params::{Background, CaptionStyle, ComposeParams};
pub use text::{draw_caption, line_width, load_font};
