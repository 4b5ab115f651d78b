//! Modal warning / error window

use egui::{RichText, Vec2};

use crate::dashboard::state::{AppState, DialogKind};
use crate::dashboard::theme::ThemeColors;

/// Show the pending dialog, if any, until the user dismisses it
pub fn render_dialog(ctx: &egui::Context, state: &mut AppState) {
    let Some(dialog) = &state.dialog else {
        return;
    };

    let color = match dialog.kind {
        DialogKind::Warning => ThemeColors::WARNING,
        DialogKind::Error => ThemeColors::ERROR,
    };

    let mut dismissed = false;
    egui::Window::new(dialog.title())
        .collapsible(false)
        .resizable(false)
        .min_width(300.0)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(RichText::new(&dialog.message).color(color));
            ui.add_space(12.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        state.dialog = None;
    }
}
