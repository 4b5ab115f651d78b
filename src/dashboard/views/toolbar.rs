//! Top control bar

use egui::RichText;

use crate::dashboard::state::AppState;
use crate::dashboard::theme::ThemeColors;

/// Button pressed this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Load,
    Recognize,
    Clear,
}

/// Render the path field, language picker, pre-processing toggle and
/// action buttons. Returns the action the user triggered, if any.
pub fn render_toolbar(ui: &mut egui::Ui, state: &mut AppState) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    let busy = state.is_busy();

    ui.horizontal(|ui| {
        let path_field = ui.add(
            egui::TextEdit::singleline(&mut state.path_input)
                .hint_text("Image path (or drop a file)")
                .desired_width(280.0),
        );
        let submitted = path_field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.add_enabled(!busy, egui::Button::new("Open Image")).clicked() || (submitted && !busy) {
            action = ToolbarAction::Load;
        }

        ui.separator();

        ui.label("Language:");
        egui::ComboBox::from_id_salt("language")
            .width(70.0)
            .selected_text(state.language.as_str())
            .show_ui(ui, |ui| {
                for language in &state.languages {
                    ui.selectable_value(&mut state.language, language.clone(), language.as_str());
                }
            });

        ui.checkbox(&mut state.preprocess, "Pre-process")
            .on_hover_text("Grayscale, 5x5 Gaussian blur and Otsu threshold before OCR");

        let recognize = egui::Button::new(RichText::new("Recognize Text").color(ThemeColors::TEXT_PRIMARY))
            .fill(ThemeColors::ACCENT.gamma_multiply(0.6));
        if ui.add_enabled(!busy, recognize).clicked() {
            action = ToolbarAction::Recognize;
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.add_enabled(!busy, egui::Button::new("Clear")).clicked() {
                action = ToolbarAction::Clear;
            }
        });
    });

    action
}
