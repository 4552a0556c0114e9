//! Workbench UI Module
//!
//! The egui desktop front-end: sidebar navigation, the browser view
//! (tables, SQL entry, results grid) and the settings view.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;
pub mod views;

pub use app::WorkbenchApp;
pub use state::{WorkbenchState, WorkbenchView};
