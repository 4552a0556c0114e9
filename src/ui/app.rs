//! Workbench application entry point
//!
//! Owns the database session exclusively; views queue [`SessionCommand`]s
//! through the shared state and this app drains them once per frame, so
//! every database operation runs synchronously on the UI thread.

use eframe::egui;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{config_dir, save_config};
use crate::session::{quote_identifier, Session};
use crate::shared::{SessionCommand, SharedAppState};
use crate::ui::components::{render_sidebar, render_table_list};
use crate::ui::state::{WorkbenchState, WorkbenchView};
use crate::ui::theme;
use crate::ui::views::{render_browser_view, render_settings_view};

/// The main workbench application
pub struct WorkbenchApp {
    /// Shared application state
    shared_state: Arc<RwLock<SharedAppState>>,
    /// Workbench view state
    workbench_state: WorkbenchState,
    /// The one database session, owned here and nowhere else
    session: Session,
    /// Whether theme has been applied
    theme_applied: bool,
}

impl WorkbenchApp {
    /// Create a new workbench, optionally opening a database at startup
    pub fn new(shared_state: Arc<RwLock<SharedAppState>>, initial_db: Option<PathBuf>) -> Self {
        let busy_timeout = {
            let state = shared_state.read();
            Duration::from_secs(state.config.query.busy_timeout_secs)
        };

        let mut workbench_state = WorkbenchState::default();
        if let Some(path) = initial_db {
            workbench_state.browser.path_input = path.display().to_string();
            shared_state.write().runtime.session_command =
                Some(SessionCommand::OpenDatabase(path));
        }

        Self {
            shared_state,
            workbench_state,
            session: Session::with_busy_timeout(busy_timeout),
            theme_applied: false,
        }
    }

    /// Create eframe options for the workbench window
    pub fn options(shared_state: &Arc<RwLock<SharedAppState>>) -> eframe::NativeOptions {
        let (width, height) = {
            let state = shared_state.read();
            (
                state.config.display.window_width,
                state.config.display.window_height,
            )
        };
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([width, height])
                .with_min_inner_size([720.0, 480.0])
                .with_title("QueryDeck - An SQLite Browser"),
            ..Default::default()
        }
    }

    /// Drain the pending database command, if any
    fn process_session_command(&mut self) {
        let command = self.shared_state.write().runtime.session_command.take();
        let Some(command) = command else { return };

        self.workbench_state.browser.local_status = None;
        match command {
            SessionCommand::OpenDatabase(path) => self.open_database(&path, false),
            SessionCommand::CreateDatabase(path) => self.open_database(&path, true),
            SessionCommand::CloseDatabase => {
                self.session.close();
                self.workbench_state.browser.path_input.clear();
                self.workbench_state.browser.selected_table = None;
                tracing::info!("database closed");
            }
            SessionCommand::RunSql(sql) => {
                self.run_statement(&sql);
            }
            SessionCommand::BrowseTable(table) => {
                self.workbench_state.browser.selected_table = Some(table.clone());
                let sql = format!("SELECT * FROM {}", quote_identifier(&table));
                self.run_statement(&sql);
            }
        }
    }

    fn open_database(&mut self, path: &Path, create: bool) {
        let result = if create {
            self.session.create(path)
        } else {
            self.session.open(path)
        };
        if let Err(e) = result {
            tracing::warn!("open failed: {e}");
        }
        self.workbench_state.browser.selected_table = None;
        self.session.table_names();
    }

    fn run_statement(&mut self, sql: &str) {
        self.session.execute(sql);
        self.shared_state.write().runtime.statements_run += 1;
        // DDL and DML can change the catalog; refresh the cached list so
        // a created or dropped table shows up without reopening the file.
        if !self.session.is_query() {
            self.session.table_names();
        }
    }

    /// Persist settings when a view flagged them as changed
    fn autosave_settings(&mut self) {
        if !self.workbench_state.settings.has_unsaved_changes {
            return;
        }
        self.workbench_state.settings.has_unsaved_changes = false;

        let config = self.shared_state.read().config.clone();
        self.session
            .set_busy_timeout(Duration::from_secs(config.query.busy_timeout_secs));

        match config_dir() {
            Ok(dir) => {
                let path = dir.join("config.toml");
                if let Err(e) = save_config(&config, &path) {
                    tracing::error!("could not save configuration: {e}");
                    self.shared_state
                        .write()
                        .runtime
                        .set_error(format!("Could not save settings: {e}"));
                } else {
                    tracing::debug!("configuration saved to {:?}", path);
                }
            }
            Err(e) => {
                self.shared_state
                    .write()
                    .runtime
                    .set_error(format!("Could not save settings: {e}"));
            }
        }
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Database").clicked() {
                        self.queue_path_command(true);
                        ui.close_menu();
                    }
                    if ui.button("Open Database").clicked() {
                        self.queue_path_command(false);
                        ui.close_menu();
                    }
                    if ui.button("Close Database").clicked() {
                        self.shared_state.write().runtime.session_command =
                            Some(SessionCommand::CloseDatabase);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.workbench_state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    /// Open or create a database from the path typed in the browser view
    fn queue_path_command(&mut self, create: bool) {
        let path = self.workbench_state.browser.path_input.trim().to_string();
        if path.is_empty() {
            self.workbench_state.browser.local_status =
                Some("Enter a database file path first.".to_string());
            self.workbench_state.current_view = WorkbenchView::Browser;
            return;
        }
        let path = PathBuf::from(path);
        self.shared_state.write().runtime.session_command = Some(if create {
            SessionCommand::CreateDatabase(path)
        } else {
            SessionCommand::OpenDatabase(path)
        });
    }

    fn render_about_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("About QueryDeck")
            .open(&mut self.workbench_state.show_about)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.label("A desktop browser and query tool for SQLite database files.");
                ui.add_space(6.0);
                ui.label(concat!("Version ", env!("CARGO_PKG_VERSION")));
            });
    }
}

impl eframe::App for WorkbenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        self.process_session_command();
        self.autosave_settings();

        self.render_menu_bar(ctx);

        egui::SidePanel::left("sidebar")
            .resizable(false)
            .default_width(150.0)
            .show(ctx, |ui| {
                render_sidebar(ui, &mut self.workbench_state.current_view);
            });

        if self.workbench_state.current_view == WorkbenchView::Browser {
            egui::SidePanel::left("table_list")
                .resizable(true)
                .default_width(190.0)
                .show(ctx, |ui| {
                    let clicked = render_table_list(
                        ui,
                        self.session.cached_tables(),
                        self.workbench_state.browser.selected_table.as_deref(),
                    );
                    if let Some(table) = clicked {
                        self.shared_state.write().runtime.session_command =
                            Some(SessionCommand::BrowseTable(table));
                    }
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::none().inner_margin(16.0).show(ui, |ui| {
                match self.workbench_state.current_view {
                    WorkbenchView::Browser => {
                        render_browser_view(
                            ui,
                            &mut self.workbench_state.browser,
                            &self.session,
                            &self.shared_state,
                        );
                    }
                    WorkbenchView::Settings => {
                        render_settings_view(
                            ui,
                            &mut self.workbench_state.settings,
                            &self.shared_state,
                        );
                    }
                }
            });
        });

        self.render_about_window(ctx);
    }
}

/// Run the workbench application
pub fn run_workbench(
    shared_state: Arc<RwLock<SharedAppState>>,
    initial_db: Option<PathBuf>,
) -> Result<(), eframe::Error> {
    let options = WorkbenchApp::options(&shared_state);
    let app = WorkbenchApp::new(shared_state, initial_db);
    eframe::run_native(
        "QueryDeck",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
