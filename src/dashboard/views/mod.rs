//! Dashboard views

pub mod dialog;
pub mod panels;
pub mod toolbar;

pub use dialog::render_dialog;
pub use panels::{render_preview_panel, render_text_panel, PreviewTexture};
pub use toolbar::{render_toolbar, ToolbarAction};
