//! Browser view - database file, SQL entry, and results
//!
//! Reads the session's current state and queues [`SessionCommand`]s for the
//! app loop; it never mutates the session directly.

use egui::RichText;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;

use crate::session::Session;
use crate::shared::{SessionCommand, SharedAppState};
use crate::ui::components::render_result_grid;
use crate::ui::state::BrowserViewState;
use crate::ui::theme::{color_with_alpha, ThemeColors};

/// Render the browser view
pub fn render_browser_view(
    ui: &mut egui::Ui,
    view_state: &mut BrowserViewState,
    session: &Session,
    shared_state: &Arc<RwLock<SharedAppState>>,
) {
    let max_result_rows = shared_state.read().config.display.max_result_rows;

    // DB file and SQL entry rows
    egui::Grid::new("browser_controls")
        .num_columns(3)
        .spacing([10.0, 8.0])
        .show(ui, |ui| {
            ui.label("DB File:");
            ui.add(
                egui::TextEdit::singleline(&mut view_state.path_input)
                    .hint_text("--- Select a file ---")
                    .desired_width(ui.available_width() - 240.0),
            );
            ui.horizontal(|ui| {
                if ui.button("Open").clicked() {
                    queue_file_command(view_state, shared_state, false);
                }
                if ui.button("New").clicked() {
                    queue_file_command(view_state, shared_state, true);
                }
                if ui.button("Close").clicked() {
                    queue(shared_state, SessionCommand::CloseDatabase);
                }
            });
            ui.end_row();

            ui.label("SQL Command:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut view_state.sql_input)
                    .hint_text("SELECT * FROM table")
                    .desired_width(ui.available_width() - 240.0),
            );
            let enter_pressed =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Run").clicked() || enter_pressed {
                queue_run_command(view_state, session, shared_state);
            }
            ui.end_row();

            ui.label(RichText::new("Last SQL run:").color(ThemeColors::TEXT_MUTED));
            let last = session.last_statement();
            ui.label(if last.is_empty() { "--- none ---" } else { last });
            ui.end_row();
        });

    ui.add_space(8.0);

    // Result message: a guard note, the outcome, or the idle placeholder
    let (status, is_error) = status_line(view_state, session);
    if is_error {
        egui::Frame::none()
            .fill(color_with_alpha(ThemeColors::ACCENT_ERROR, 48))
            .rounding(egui::Rounding::same(5.0))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Result:")
                            .color(ThemeColors::ACCENT_ERROR)
                            .strong(),
                    );
                    ui.label(RichText::new(status).color(ThemeColors::TEXT_PRIMARY));
                });
            });
    } else {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Result:").color(ThemeColors::TEXT_MUTED));
            ui.label(RichText::new(status).color(ThemeColors::ACCENT_SUCCESS));
        });
    }

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    if let Some(grid) = session.result() {
        render_result_grid(ui, grid, max_result_rows);
    }

    let statements_run = shared_state.read().runtime.statements_run;
    if statements_run > 0 {
        ui.add_space(6.0);
        ui.label(
            RichText::new(format!("{statements_run} statements run this session"))
                .size(11.0)
                .color(ThemeColors::TEXT_MUTED),
        );
    }
}

/// Compose the status text shown in the Result row.
fn status_line(view_state: &BrowserViewState, session: &Session) -> (String, bool) {
    if let Some(note) = &view_state.local_status {
        return (note.clone(), false);
    }
    if session.has_error() {
        return (
            format!("{}: {}", session.result_message(), session.error_text()),
            true,
        );
    }
    if session.result_message().is_empty() {
        return ("--- none ---".to_string(), false);
    }
    (session.result_message().to_string(), false)
}

fn queue(shared_state: &Arc<RwLock<SharedAppState>>, command: SessionCommand) {
    shared_state.write().runtime.session_command = Some(command);
}

fn queue_file_command(
    view_state: &mut BrowserViewState,
    shared_state: &Arc<RwLock<SharedAppState>>,
    create: bool,
) {
    let path = view_state.path_input.trim().to_string();
    if path.is_empty() {
        view_state.local_status = Some("No file selected.".to_string());
        return;
    }
    let path = PathBuf::from(path);
    let command = if create {
        SessionCommand::CreateDatabase(path)
    } else {
        SessionCommand::OpenDatabase(path)
    };
    queue(shared_state, command);
}

fn queue_run_command(
    view_state: &mut BrowserViewState,
    session: &Session,
    shared_state: &Arc<RwLock<SharedAppState>>,
) {
    let sql = view_state.sql_input.trim().to_string();
    view_state.sql_input.clear();

    if !session.is_loaded() {
        view_state.local_status = Some("No database loaded.".to_string());
        return;
    }
    if sql.is_empty() {
        view_state.local_status = Some("No SQL to run.".to_string());
        return;
    }
    queue(shared_state, SessionCommand::RunSql(sql));
}
