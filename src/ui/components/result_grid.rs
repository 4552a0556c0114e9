//! Results grid component
//!
//! Renders a [`ResultGrid`] as a striped table, one label per cell.

use egui::RichText;
use egui_extras::{Column, TableBuilder};

use crate::session::outcome::ResultGrid;
use crate::ui::theme::ThemeColors;

/// Render a result grid, showing at most `max_rows` rows.
pub fn render_result_grid(ui: &mut egui::Ui, grid: &ResultGrid, max_rows: usize) {
    if grid.column_count() == 0 {
        ui.label(
            RichText::new("The query produced no columns.")
                .italics()
                .color(ThemeColors::TEXT_MUTED),
        );
        return;
    }

    let shown = grid.row_count().min(max_rows);
    if grid.row_count() > shown {
        ui.label(
            RichText::new(format!(
                "Showing the first {} of {} rows.",
                shown,
                grid.row_count()
            ))
            .size(12.0)
            .color(ThemeColors::TEXT_MUTED),
        );
        ui.add_space(4.0);
    }

    // Column widths are keyed by id; scope by column count so switching
    // between results with different shapes does not reuse stale widths.
    ui.push_id(grid.column_count(), |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(60.0).clip(true), grid.column_count())
            .header(22.0, |mut header| {
                for name in &grid.columns {
                    header.col(|ui| {
                        ui.label(RichText::new(name).strong());
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, shown, |mut row| {
                    let cells = &grid.rows[row.index()];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
