//! Reusable UI components for the dashboard

pub mod status_bar;

pub use status_bar::render_status_bar;
