//! Image preview and recognized text panels

use egui::{Color32, RichText};

use crate::dashboard::state::{preview_image, AppState};
use crate::dashboard::theme::ThemeColors;

/// Cached GPU texture for the preview image
#[derive(Default)]
pub struct PreviewTexture {
    handle: Option<egui::TextureHandle>,
}

impl PreviewTexture {
    /// Rebuild the texture if the displayed image changed
    fn sync(&mut self, ctx: &egui::Context, state: &mut AppState) {
        if !state.preview_dirty {
            return;
        }
        state.preview_dirty = false;

        let Some(image) = &state.displayed else {
            self.handle = None;
            return;
        };

        let (max_w, max_h) = state.preview_bounds;
        let rgba = preview_image(image, max_w, max_h);
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [rgba.width() as usize, rgba.height() as usize],
            rgba.as_raw(),
        );

        match &mut self.handle {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.handle = Some(ctx.load_texture("image_preview", color_image, egui::TextureOptions::LINEAR));
            }
        }
    }
}

fn panel_frame() -> egui::Frame {
    egui::Frame::none()
        .fill(ThemeColors::BG_MEDIUM)
        .rounding(egui::Rounding::same(6.0))
        .inner_margin(10.0)
}

/// Left panel: scaled preview of the displayed image
pub fn render_preview_panel(ui: &mut egui::Ui, state: &mut AppState, texture: &mut PreviewTexture) {
    texture.sync(ui.ctx(), state);

    panel_frame().show(ui, |ui| {
        ui.label(RichText::new("Image").strong().color(ThemeColors::TEXT_SECONDARY));
        ui.separator();

        let available = ui.available_size();
        match &texture.handle {
            Some(handle) => {
                let tex_size = handle.size_vec2();
                // The texture is already bounded; shrink further if the panel is smaller
                let scale = (available.x / tex_size.x).min(available.y / tex_size.y).min(1.0);
                ui.centered_and_justified(|ui| {
                    ui.image((handle.id(), tex_size * scale));
                });
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No image loaded").italics().color(ThemeColors::TEXT_MUTED));
                });
            }
        }
    });
}

/// Right panel: recognized text, selectable and editable
pub fn render_text_panel(ui: &mut egui::Ui, state: &mut AppState) {
    panel_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Recognized Text").strong().color(ThemeColors::TEXT_SECONDARY));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!state.text.is_empty(), egui::Button::new("Copy").small())
                    .clicked()
                {
                    ui.ctx().copy_text(state.text.clone());
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            ui.add(
                egui::TextEdit::multiline(&mut state.text)
                    .font(egui::TextStyle::Monospace)
                    .text_color(Color32::from_rgb(200, 225, 255))
                    .desired_width(f32::INFINITY)
                    .desired_rows(20),
            );
        });
    });
}
