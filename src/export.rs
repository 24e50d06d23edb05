//! Export orchestration.
//!
//! Everything between "the user hit download" and "a PNG exists": take a
//! session snapshot authored against the preview surface, rescale it to the
//! frame template's native resolution, run the compositor, encode, and hand
//! the bytes to the save collaborator. Assets arrive already decoded — the
//! join-then-draw rule — so nothing here can half-fail after pixels start
//! moving.

use crate::compose::{
    self, Background, CaptionStyle, ComposeError, ComposeParams,
};
use crate::mapping;
use crate::placement::SurfaceSize;
use crate::save::{SaveError, SaveTarget};
use crate::session::SessionSnapshot;
use image::RgbaImage;
use rusttype::Font;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// One export request: a snapshot plus its decoded assets and styling.
pub struct ExportRequest<'a> {
    pub snapshot: &'a SessionSnapshot,
    pub photo: Option<&'a RgbaImage>,
    pub frame: &'a RgbaImage,
    pub font: Option<&'a Font<'static>>,
    /// The surface the snapshot's coordinates were authored against.
    pub preview: SurfaceSize,
    pub background: Background,
    pub caption_style: CaptionStyle,
}

impl ExportRequest<'_> {
    /// The export surface: the frame template's native resolution.
    #[must_use]
    pub fn export_surface(&self) -> SurfaceSize {
        let (w, h) = self.frame.dimensions();
        SurfaceSize::new(w, h)
    }

    /// Compositor parameters with every preview-space coordinate rescaled to
    /// the export surface.
    #[must_use]
    fn export_params(&self) -> ComposeParams {
        let export = self.export_surface();
        ComposeParams {
            surface: export,
            background: self.background,
            placement: mapping::to_export_placement(self.snapshot.placement, self.preview, export),
            filter: self.snapshot.filter,
            caption: self
                .snapshot
                .caption
                .as_ref()
                .map(|c| mapping::to_export_caption(c, self.preview, export)),
            caption_style: CaptionStyle::new(
                mapping::to_export_caption_px(self.caption_style.px, self.preview, export),
                self.caption_style.color,
            ),
        }
    }
}

/// Render the composite at the frame's native resolution.
pub fn render_export(request: &ExportRequest<'_>) -> Result<RgbaImage, ComposeError> {
    compose::compose(request.photo, request.frame, request.font, &request.export_params())
}

/// Render the composite at the preview surface, with the snapshot's
/// coordinates used as-is. This is what an interactive host shows live.
pub fn render_preview(request: &ExportRequest<'_>) -> Result<RgbaImage, ComposeError> {
    let params = ComposeParams {
        surface: request.preview,
        background: request.background,
        placement: request.snapshot.placement,
        filter: request.snapshot.filter,
        caption: request.snapshot.caption.clone(),
        caption_style: request.caption_style,
    };
    compose::compose(request.photo, request.frame, request.font, &params)
}

/// Full export: render at native resolution, PNG-encode, save.
pub fn export(
    request: &ExportRequest<'_>,
    saver: &dyn SaveTarget,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let surface = render_export(request)?;
    let bytes = compose::encode_png(&surface)?;
    Ok(saver.save(&bytes, filename)?)
}
