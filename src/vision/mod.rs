//! Vision/OCR Layer
//!
//! Load -> [Pre-process] -> Extract. The pipeline is synchronous and holds
//! no state between calls; every call owns its buffers end to end.

pub mod error;
pub mod loader;
pub mod ocr;
pub mod preprocess;

pub use error::OcrError;
pub use loader::load_image;
pub use ocr::{OcrEngine, TesseractEngine};
pub use preprocess::{preprocess, preprocess_with_threshold};

use image::DynamicImage;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Default language code handed to the engine
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Per-call recognition settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOptions {
    /// Engine language code (e.g. "eng", "deu"); not validated here
    pub language: String,
    /// Run the grayscale/blur/Otsu chain before recognition
    pub preprocess: bool,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            preprocess: true,
        }
    }
}

impl RecognitionOptions {
    pub fn new(language: impl Into<String>, preprocess: bool) -> Self {
        Self {
            language: language.into(),
            preprocess,
        }
    }
}

/// Everything that determines one extraction result
#[derive(Debug, Clone, Copy)]
pub struct RecognitionRequest<'a> {
    pub image: &'a DynamicImage,
    pub options: &'a RecognitionOptions,
}

impl<'a> RecognitionRequest<'a> {
    pub fn new(image: &'a DynamicImage, options: &'a RecognitionOptions) -> Self {
        Self { image, options }
    }
}

/// Text extraction pipeline over a pluggable OCR engine
pub struct TextExtractor<E: OcrEngine> {
    engine: E,
}

impl<E: OcrEngine> TextExtractor<E> {
    /// Create an extractor around an engine
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Get the underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The exact buffer that will be handed to the engine
    pub fn prepare(image: &DynamicImage, apply_preprocessing: bool) -> DynamicImage {
        if apply_preprocessing {
            let result = preprocess_with_threshold(image);
            debug!("Binarized at threshold {}", result.threshold);
            DynamicImage::ImageLuma8(result.image)
        } else {
            image.clone()
        }
    }

    /// Extract text from an in-memory image.
    ///
    /// The engine's output is returned unchanged, whitespace included.
    pub fn extract(&self, request: &RecognitionRequest<'_>) -> Result<String, OcrError> {
        let start = Instant::now();
        let options = request.options;

        let text = if options.preprocess {
            let prepared = DynamicImage::ImageLuma8(preprocess(request.image));
            self.recognize_prepared(&prepared, &options.language)?
        } else {
            self.recognize_prepared(request.image, &options.language)?
        };

        debug!(
            "Extraction (lang={}, preprocess={}) complete in {:?}",
            options.language,
            options.preprocess,
            start.elapsed()
        );

        Ok(text)
    }

    /// Hand a buffer obtained from [`Self::prepare`] to the engine as-is
    pub fn recognize_prepared(&self, prepared: &DynamicImage, language: &str) -> Result<String, OcrError> {
        self.engine.recognize(prepared, language)
    }

    /// Load an image file and extract its text
    pub fn extract_from_path(&self, path: &Path, options: &RecognitionOptions) -> Result<String, OcrError> {
        info!("Extracting text from {:?}", path);
        let image = load_image(path)?;
        self.extract(&RecognitionRequest::new(&image, options))
    }
}
