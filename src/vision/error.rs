//! Pipeline error taxonomy

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the load / pre-process / extract pipeline
#[derive(Debug, Error)]
pub enum OcrError {
    /// The path does not reference an existing file
    #[error("image file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be parsed as an image
    #[error("could not decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The OCR engine failed during recognition
    #[error("text extraction failed: {0}")]
    Extraction(String),
}

#[cfg(test)]
impl OcrError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, OcrError::NotFound(_))
    }

    pub fn is_extraction(&self) -> bool {
        matches!(self, OcrError::Extraction(_))
    }
}
