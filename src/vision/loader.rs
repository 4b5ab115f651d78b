//! Image loading

use image::{DynamicImage, ImageReader};
use std::path::Path;
use tracing::debug;

use super::OcrError;

/// Read an image file into memory.
///
/// The format is sniffed from the file contents, so a mislabelled extension
/// still decodes. Missing paths are reported as [`OcrError::NotFound`] before
/// any decoding is attempted.
pub fn load_image(path: &Path) -> Result<DynamicImage, OcrError> {
    if !path.exists() {
        return Err(OcrError::NotFound(path.to_path_buf()));
    }

    let decode_err = |source| OcrError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let image = ImageReader::open(path)
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;

    debug!(
        "Loaded {:?}: {}x{} ({:?})",
        path,
        image.width(),
        image.height(),
        image.color()
    );

    Ok(image)
}
