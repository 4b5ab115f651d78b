//! Dashboard state management
//!
//! All GUI state lives in [`AppState`]. User actions are methods on it, and
//! what the view shows (status line, preview pixels) is derived by plain
//! functions of that state.

use crossbeam_channel::{Receiver, TryRecvError};
use image::{imageops::FilterType, DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::dashboard::worker::JobOutcome;
use crate::vision::{load_image, RecognitionOptions};

/// What the status bar reports
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ready,
    /// An image was loaded (file name)
    Loaded(String),
    Recognizing,
    Done,
    Failed,
}

/// Severity of a modal message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Warning,
    Error,
}

/// Modal message shown on top of the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub message: String,
}

impl Dialog {
    pub fn title(&self) -> &'static str {
        match self.kind {
            DialogKind::Warning => "Warning",
            DialogKind::Error => "Error",
        }
    }
}

/// Overall dashboard state
pub struct AppState {
    /// Contents of the path field
    pub path_input: String,
    /// Path of the loaded image
    pub image_path: Option<PathBuf>,
    /// Image as loaded from disk
    pub image: Option<DynamicImage>,
    /// Image shown in the preview (original, or what the engine saw)
    pub displayed: Option<DynamicImage>,
    /// Set when `displayed` changed and the texture must be rebuilt
    pub preview_dirty: bool,
    /// Selected language code
    pub language: String,
    /// Languages offered in the combo box
    pub languages: Vec<String>,
    /// Pre-processing checkbox
    pub preprocess: bool,
    /// Recognized text
    pub text: String,
    pub status: Status,
    /// Pending modal message
    pub dialog: Option<Dialog>,
    /// Maximum preview size
    pub preview_bounds: (u32, u32),
    /// Result channel of the running extraction
    job: Option<Receiver<JobOutcome>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("image_path", &self.image_path)
            .field("language", &self.language)
            .field("preprocess", &self.preprocess)
            .field("status", &self.status)
            .field("text_len", &self.text.len())
            .field("job_running", &self.job.is_some())
            .finish()
    }
}

impl AppState {
    /// Create the initial state from configuration
    pub fn new(config: &AppConfig) -> Self {
        let mut languages = config.engine.languages.clone();
        if !languages.contains(&config.engine.default_language) {
            languages.insert(0, config.engine.default_language.clone());
        }

        Self {
            path_input: String::new(),
            image_path: None,
            image: None,
            displayed: None,
            preview_dirty: false,
            language: config.engine.default_language.clone(),
            languages,
            preprocess: config.preprocessing.enabled,
            text: String::new(),
            status: Status::Ready,
            dialog: None,
            preview_bounds: (config.preview.max_width, config.preview.max_height),
            job: None,
        }
    }

    /// Add installed engine languages not already offered
    pub fn merge_languages(&mut self, installed: impl IntoIterator<Item = String>) {
        for language in installed {
            // "osd" is orientation detection data, not a language
            if language != "osd" && !self.languages.contains(&language) {
                self.languages.push(language);
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    /// Load the image at `path` and show it.
    ///
    /// Refused while an extraction is running, since its result belongs to
    /// the image currently loaded.
    pub fn load(&mut self, path: PathBuf) {
        if self.is_busy() {
            self.dialog = Some(Dialog {
                kind: DialogKind::Warning,
                message: "Wait for the running OCR to finish before loading another image.".to_string(),
            });
            return;
        }

        self.path_input = path.display().to_string();

        match load_image(&path) {
            Ok(image) => {
                info!("Loaded {:?} into the dashboard", path);
                self.status = Status::Loaded(file_name(&path));
                self.displayed = Some(image.clone());
                self.image = Some(image);
                self.image_path = Some(path);
                self.preview_dirty = true;
                self.text.clear();
            }
            Err(e) => {
                warn!("Failed to load {:?}: {}", path, e);
                self.status = Status::Failed;
                self.dialog = Some(Dialog {
                    kind: DialogKind::Error,
                    message: format!("Failed to load image: {}", e),
                });
            }
        }
    }

    /// Load whatever is typed in the path field
    pub fn load_from_input(&mut self) {
        let input = self.path_input.trim();
        if input.is_empty() {
            self.dialog = Some(Dialog {
                kind: DialogKind::Warning,
                message: "Enter an image path or drop a file onto the window.".to_string(),
            });
            return;
        }
        self.load(PathBuf::from(input));
    }

    /// Validate and hand out the inputs of a new extraction.
    ///
    /// Returns `None` (after warning) when there is no image, or when an
    /// extraction is already running.
    pub fn begin_recognition(&mut self) -> Option<(DynamicImage, RecognitionOptions)> {
        if self.is_busy() {
            return None;
        }

        let Some(image) = &self.image else {
            self.dialog = Some(Dialog {
                kind: DialogKind::Warning,
                message: "Please select an image first.".to_string(),
            });
            return None;
        };

        self.status = Status::Recognizing;
        Some((
            image.clone(),
            RecognitionOptions::new(self.language.clone(), self.preprocess),
        ))
    }

    /// Track the channel of a spawned extraction
    pub fn attach_job(&mut self, receiver: Receiver<JobOutcome>) {
        self.job = Some(receiver);
    }

    /// Pick up a finished extraction, if any
    pub fn poll_job(&mut self) {
        let Some(receiver) = &self.job else {
            return;
        };

        match receiver.try_recv() {
            Ok(outcome) => {
                self.job = None;
                self.finish_recognition(outcome);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.job = None;
                self.finish_recognition(JobOutcome {
                    prepared: None,
                    result: Err(crate::vision::OcrError::Extraction(
                        "recognition worker stopped unexpectedly".to_string(),
                    )),
                });
            }
        }
    }

    /// Apply the outcome of an extraction
    pub fn finish_recognition(&mut self, outcome: JobOutcome) {
        if let Some(prepared) = outcome.prepared {
            self.displayed = Some(prepared);
            self.preview_dirty = true;
        }

        match outcome.result {
            Ok(text) => {
                self.text = text;
                self.status = Status::Done;
            }
            Err(e) => {
                self.status = Status::Failed;
                self.dialog = Some(Dialog {
                    kind: DialogKind::Error,
                    message: format!("OCR failed: {}", e),
                });
            }
        }
    }

    /// Reset to the initial, empty state (settings are kept)
    pub fn clear(&mut self) {
        self.path_input.clear();
        self.image_path = None;
        self.image = None;
        self.displayed = None;
        self.preview_dirty = true;
        self.text.clear();
        self.status = Status::Ready;
        self.dialog = None;
    }
}

/// Status bar text for a state
pub fn status_text(status: &Status) -> String {
    match status {
        Status::Ready => "Ready".to_string(),
        Status::Loaded(name) => format!("Selected file: {}", name),
        Status::Recognizing => "Running OCR...".to_string(),
        Status::Done => "OCR complete.".to_string(),
        Status::Failed => "An error occurred.".to_string(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Size that fits `(width, height)` inside the bounds, keeping the aspect
/// ratio. Images that already fit are not enlarged.
pub fn preview_size(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let ratio = (max_width as f32 / width as f32).min(max_height as f32 / height as f32);
    let new_w = ((width as f32 * ratio) as u32).max(1);
    let new_h = ((height as f32 * ratio) as u32).max(1);
    (new_w, new_h)
}

/// RGBA pixels for the preview texture
pub fn preview_image(image: &DynamicImage, max_width: u32, max_height: u32) -> RgbaImage {
    let (w, h) = preview_size(image.width(), image.height(), max_width, max_height);
    if (w, h) == (image.width(), image.height()) {
        image.to_rgba8()
    } else {
        image.resize_exact(w, h, FilterType::Triangle).to_rgba8()
    }
}
