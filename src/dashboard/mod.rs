//! Desktop front-end
//!
//! egui window for picking an image, toggling pre-processing, choosing a
//! language and reading back the recognized text.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;
pub mod views;
pub mod worker;

pub use app::run_dashboard;
