//! OCR (Optical Character Recognition) engine boundary
//!
//! The pipeline only needs one capability from an engine: given a pixel
//! buffer and a language code, return the recognized text. Tesseract is
//! driven through its command-line executable, whose location comes from
//! configuration.

use image::{DynamicImage, ImageFormat};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use super::OcrError;
use crate::config::EngineConfig;

/// Text recognition capability used by the extractor
pub trait OcrEngine: Send + Sync {
    /// Recognize all text in `image` using the given language code
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String, OcrError>;
}

/// Tesseract OCR driven through its CLI (`tesseract stdin stdout`)
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    /// Executable to run; a bare name is looked up on PATH
    executable: PathBuf,
    /// Optional `--tessdata-dir`
    tessdata_dir: Option<PathBuf>,
    /// Optional `--psm`
    page_segmentation_mode: Option<u8>,
}

impl TesseractEngine {
    /// Create an engine that runs the given executable
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            tessdata_dir: None,
            page_segmentation_mode: None,
        }
    }

    /// Create an engine from the `[engine]` config section
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut engine = Self::new(&config.tesseract_path);
        if let Some(dir) = &config.tessdata_dir {
            engine = engine.with_tessdata_dir(dir);
        }
        if let Some(psm) = config.page_segmentation_mode {
            engine = engine.with_page_segmentation_mode(psm);
        }
        engine
    }

    pub fn with_tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    pub fn with_page_segmentation_mode(mut self, psm: u8) -> Self {
        self.page_segmentation_mode = Some(psm);
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Build the argument list for one recognition run
    fn recognition_args(&self, language: &str) -> Vec<String> {
        let mut args = vec!["stdin".to_string(), "stdout".to_string()];
        if let Some(dir) = &self.tessdata_dir {
            args.push("--tessdata-dir".to_string());
            args.push(dir.display().to_string());
        }
        args.push("-l".to_string());
        args.push(language.to_string());
        if let Some(psm) = self.page_segmentation_mode {
            args.push("--psm".to_string());
            args.push(psm.to_string());
        }
        args
    }

    fn spawn_error(&self, e: std::io::Error) -> OcrError {
        OcrError::Extraction(format!(
            "failed to start {} ({}). Is Tesseract installed?",
            self.executable.display(),
            e
        ))
    }

    /// List the language codes installed for this Tesseract
    pub fn available_languages(&self) -> Result<Vec<String>, OcrError> {
        let mut command = Command::new(&self.executable);
        if let Some(dir) = &self.tessdata_dir {
            command.arg("--tessdata-dir").arg(dir);
        }
        let output = command
            .arg("--list-langs")
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(OcrError::Extraction(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        // Older versions print the list on stderr
        let listing = if output.stdout.is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };

        Ok(parse_language_list(&String::from_utf8_lossy(listing)))
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String, OcrError> {
        let mut png_data = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png_data), ImageFormat::Png)
            .map_err(|e| OcrError::Extraction(format!("failed to encode image for OCR: {}", e)))?;

        let args = self.recognition_args(language);
        debug!("Running {} {}", self.executable.display(), args.join(" "));

        let mut child = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A broken pipe here means tesseract already exited; its stderr says why
            if let Err(e) = stdin.write_all(&png_data) {
                warn!("Failed to pipe image to tesseract: {}", e);
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| OcrError::Extraction(format!("tesseract did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Extraction(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(
            "Recognized {} characters ({}x{}, lang={})",
            text.chars().count(),
            image.width(),
            image.height(),
            language
        );
        Ok(text)
    }
}

/// Parse `tesseract --list-langs` output into language codes
fn parse_language_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of available languages"))
        .map(str::to_string)
        .collect()
}
