//! Status bar component

use egui::{Color32, RichText, Rounding};

use crate::dashboard::state::{status_text, Status};
use crate::dashboard::theme::ThemeColors;

/// Indicator color for a status
pub fn status_color(status: &Status) -> Color32 {
    match status {
        Status::Ready => ThemeColors::TEXT_SECONDARY,
        Status::Loaded(_) => ThemeColors::ACCENT,
        Status::Recognizing => ThemeColors::WARNING,
        Status::Done => ThemeColors::SUCCESS,
        Status::Failed => ThemeColors::ERROR,
    }
}

/// Bottom bar showing the current status with a colored dot
pub fn render_status_bar(ui: &mut egui::Ui, status: &Status) {
    egui::Frame::none()
        .fill(ThemeColors::BG_MEDIUM)
        .rounding(Rounding::same(4.0))
        .inner_margin(egui::Margin::symmetric(10.0, 4.0))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 4.0, status_color(status));

                if *status == Status::Recognizing {
                    ui.spinner();
                }

                ui.label(
                    RichText::new(status_text(status))
                        .size(13.0)
                        .color(ThemeColors::TEXT_PRIMARY),
                );
            });
        });
}
