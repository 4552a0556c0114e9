//! Workbench views

pub mod browser;
pub mod settings;

pub use browser::render_browser_view;
pub use settings::render_settings_view;
