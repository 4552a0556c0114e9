//! Table list component
//!
//! The left-hand list of tables in the open database. Clicking a name
//! returns it so the caller can queue a browse command.

use egui::RichText;

use crate::ui::theme::ThemeColors;

/// Render the table list; returns the table clicked this frame, if any.
pub fn render_table_list(
    ui: &mut egui::Ui,
    tables: &[String],
    selected: Option<&str>,
) -> Option<String> {
    let mut clicked = None;

    ui.add_space(8.0);
    ui.label(
        RichText::new("DB Tables")
            .size(12.0)
            .color(ThemeColors::TEXT_MUTED),
    );
    ui.add_space(4.0);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if tables.is_empty() {
                ui.add_space(8.0);
                ui.label(
                    RichText::new("No tables")
                        .italics()
                        .color(ThemeColors::TEXT_MUTED),
                );
                return;
            }
            for name in tables {
                let is_selected = selected == Some(name.as_str());
                if ui.selectable_label(is_selected, name).clicked() {
                    clicked = Some(name.clone());
                }
            }
        });

    clicked
}
