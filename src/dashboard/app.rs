//! Dashboard application entry point

use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::dashboard::components::render_status_bar;
use crate::dashboard::state::AppState;
use crate::dashboard::theme;
use crate::dashboard::views::{
    render_dialog, render_preview_panel, render_text_panel, render_toolbar, PreviewTexture,
    ToolbarAction,
};
use crate::dashboard::worker::spawn_recognition;
use crate::vision::{TesseractEngine, TextExtractor};

/// The main dashboard application
pub struct DashboardApp {
    /// All view state
    state: AppState,
    /// Extraction pipeline shared with worker threads
    extractor: Arc<TextExtractor<TesseractEngine>>,
    /// Preview texture cache
    preview: PreviewTexture,
    /// Whether theme has been applied
    theme_applied: bool,
}

impl DashboardApp {
    /// Create a new dashboard application
    pub fn new(config: &AppConfig, engine: TesseractEngine) -> Self {
        let mut state = AppState::new(config);
        let extractor = Arc::new(TextExtractor::new(engine));

        match extractor.engine().available_languages() {
            Ok(installed) => {
                info!("Tesseract languages: {}", installed.join(", "));
                state.merge_languages(installed);
            }
            Err(e) => warn!("Could not list Tesseract languages: {}", e),
        }

        Self {
            state,
            extractor,
            preview: PreviewTexture::default(),
            theme_applied: false,
        }
    }

    /// Create eframe options for the dashboard window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([900.0, 700.0])
                .with_min_inner_size([800.0, 600.0])
                .with_title("TextGrab - OCR")
                .with_drag_and_drop(true),
            ..Default::default()
        }
    }

    /// Load the first file dropped onto the window
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Option<PathBuf> = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
        if let Some(path) = dropped {
            if self.state.is_busy() {
                return;
            }
            self.state.load(path);
        }
    }

    fn handle_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::None => {}
            ToolbarAction::Load => self.state.load_from_input(),
            ToolbarAction::Recognize => {
                if let Some((image, options)) = self.state.begin_recognition() {
                    info!("Starting OCR (lang={}, preprocess={})", options.language, options.preprocess);
                    let receiver = spawn_recognition(self.extractor.clone(), image, options);
                    self.state.attach_job(receiver);
                }
            }
            ToolbarAction::Clear => self.state.clear(),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme once
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        self.handle_dropped_files(ctx);
        self.state.poll_job();

        // Keep polling while the worker runs
        if self.state.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        let action = egui::TopBottomPanel::top("toolbar")
            .exact_height(44.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                render_toolbar(ui, &mut self.state)
            })
            .inner;
        self.handle_action(action);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.add_space(4.0);
            render_status_bar(ui, &self.state.status);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                render_preview_panel(&mut columns[0], &mut self.state, &mut self.preview);
                render_text_panel(&mut columns[1], &mut self.state);
            });
        });

        render_dialog(ctx, &mut self.state);
    }
}

/// Run the dashboard application
pub fn run_dashboard(config: AppConfig, engine: TesseractEngine) -> Result<(), eframe::Error> {
    let app = DashboardApp::new(&config, engine);
    eframe::run_native(
        "TextGrab",
        DashboardApp::options(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
