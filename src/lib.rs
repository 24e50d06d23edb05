//! # Framelet
//!
//! A minimal photo-frame composer. A photo is positioned and zoomed inside a
//! fixed-aspect surface, a decorative frame template is overlaid full-bleed,
//! an optional caption goes on top, and the composite exports as a PNG — the
//! "campaign frame" (twibbon) workflow, as a library plus a small CLI.
//!
//! # Architecture: Author Small, Export Native
//!
//! Editing happens against a small preview surface; the export renders at the
//! frame template's native resolution. Three pieces keep the two pixel-
//! consistent:
//!
//! ```text
//! 1. Session   edits (drag / zoom / caption)  →  revisioned state snapshot
//! 2. Mapping   preview-space placement        →  template-native placement
//! 3. Compose   clear → photo (cover-fit) → frame → caption  →  PNG bytes
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Pixel consistency**: the mapper rescales only what is resolution-
//!   dependent (positions), so what the user framed is what exports.
//! - **Last-writer-wins rendering**: snapshots carry a revision; a render
//!   finishing against a stale revision is discarded instead of flickering
//!   over newer edits.
//! - **Testability**: layout math, state transitions, and mapping are pure
//!   functions exercised without touching a single pixel.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`placement`] | Placement, caption, and surface data model |
//! | [`session`] | Revisioned edit-session state (the reducer) |
//! | [`mapping`] | Preview-space → export-space coordinate rescaling |
//! | [`compose`] | Cover-fit layout math, filters, caption text, the compositor, PNG encoding |
//! | [`export`] | Orchestration: snapshot + decoded assets → saved PNG |
//! | [`save`] | Save collaborator trait + embedded-webview download guard |
//! | [`removal`] | Background-removal HTTP collaborator |
//! | [`config`] | `studio.toml` loading, validation, frame-template discovery |
//! | [`output`] | CLI output formatting — tree-based display of results |
//!
//! # Design Decisions
//!
//! ## Transform-Model Coordinates
//!
//! The placement transform scales the photo uniformly about the surface
//! center and then applies the drag offset, with cover-fit re-fitting the
//! photo per surface. Under that model the zoom factor is resolution-
//! independent: mapping a placement between same-aspect surfaces rescales
//! offsets only. The alternative model (scaling the photo's width/height
//! directly) uses incompatible math and is deliberately not implemented —
//! mixing the two produces visible drift between preview and export.
//!
//! ## Pure-Rust Imaging (No Browser, No Canvas)
//!
//! Compositing uses the `image` crate (Lanczos3 resampling, alpha-aware
//! `overlay`) and `rusttype` for caption glyphs. The binary is fully
//! self-contained: no system image libraries, no font server — a deployment
//! is a binary, a `studio.toml`, a frames directory, and optionally a font
//! file.
//!
//! ## All-or-Nothing Renders
//!
//! Every asset is decoded and validated before a surface is allocated. A
//! failed render therefore leaves no partial state behind — the caller
//! retries the one action that failed. A *missing photo* is not a failure:
//! the result is the frame over the cleared background, exactly what the
//! editor shows before an upload.
//!
//! ## External Collaborators Behind Traits
//!
//! Saving bytes ([`save::SaveTarget`]) and background removal
//! ([`removal::BackgroundRemover`]) are the only side-effecting boundaries,
//! and both are traits with mock implementations in the test suite. The
//! production savers also understand download contexts: a known in-app
//! browser user agent gets the "open externally" instruction instead of a
//! silently-broken download.

pub mod compose;
pub mod config;
pub mod export;
pub mod mapping;
pub mod output;
pub mod placement;
pub mod removal;
pub mod save;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
