//! Reusable UI components for the workbench

pub mod result_grid;
pub mod sidebar;
pub mod table_list;

pub use result_grid::render_result_grid;
pub use sidebar::render_sidebar;
pub use table_list::render_table_list;
