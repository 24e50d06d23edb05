//! Asset loading and validation.
//!
//! All decoding happens before the compositor touches a surface, so a render
//! is all-or-nothing: a failed asset never leaves a half-drawn result behind.
//! The error taxonomy encodes the asset's role — a broken *photo* is
//! [`ComposeError::InvalidImage`] (the user picked a bad file), a broken
//! *frame* is [`ComposeError::MissingAsset`] (the deployment is missing a
//! template it promised).

use super::compositor::ComposeError;
use crate::placement::SurfaceSize;
use image::{ImageReader, RgbaImage};
use std::path::Path;

/// Decode a user photo. Undecodable or zero-dimension files are invalid input.
pub fn load_photo(path: &Path) -> Result<RgbaImage, ComposeError> {
    let img = ImageReader::open(path)
        .map_err(|e| ComposeError::InvalidImage(format!("{}: {e}", path.display())))?
        .decode()
        .map_err(|e| ComposeError::InvalidImage(format!("{}: {e}", path.display())))?
        .to_rgba8();
    if img.width() == 0 || img.height() == 0 {
        return Err(ComposeError::InvalidImage(format!(
            "{}: zero-dimension image",
            path.display()
        )));
    }
    Ok(img)
}

/// Decode a frame template. Any failure here aborts the render.
pub fn load_frame(path: &Path) -> Result<RgbaImage, ComposeError> {
    let img = ImageReader::open(path)
        .map_err(|e| ComposeError::MissingAsset(format!("{}: {e}", path.display())))?
        .decode()
        .map_err(|e| ComposeError::MissingAsset(format!("{}: {e}", path.display())))?
        .to_rgba8();
    if img.width() == 0 || img.height() == 0 {
        return Err(ComposeError::MissingAsset(format!(
            "{}: zero-dimension template",
            path.display()
        )));
    }
    Ok(img)
}

/// Read an image's dimensions without decoding pixel data.
pub fn identify(path: &Path) -> Result<SurfaceSize, ComposeError> {
    let (width, height) = image::image_dimensions(path)
        .map_err(|e| ComposeError::MissingAsset(format!("{}: {e}", path.display())))?;
    Ok(SurfaceSize::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{solid_photo, write_png};

    #[test]
    fn photo_round_trips_through_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("photo.png");
        write_png(&path, &solid_photo(64, 48, [1, 2, 3]));

        let loaded = load_photo(&path).unwrap();
        assert_eq!(loaded.dimensions(), (64, 48));
    }

    #[test]
    fn missing_photo_is_invalid_image() {
        let err = load_photo(Path::new("/nonexistent/photo.jpg")).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidImage(_)));
    }

    #[test]
    fn undecodable_photo_is_invalid_image() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"not a png at all").unwrap();

        let err = load_photo(&path).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidImage(_)));
    }

    #[test]
    fn missing_frame_is_missing_asset() {
        let err = load_frame(Path::new("/nonexistent/frame.png")).unwrap_err();
        assert!(matches!(err, ComposeError::MissingAsset(_)));
    }

    #[test]
    fn identify_reads_dimensions_without_decoding() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("frame.png");
        write_png(&path, &solid_photo(320, 400, [0, 0, 0]));

        assert_eq!(identify(&path).unwrap(), SurfaceSize::new(320, 400));
    }
}
