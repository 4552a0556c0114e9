//! Shared application state

use std::path::PathBuf;

use crate::config::AppConfig;

/// Central state shared between the main loop and the workbench views
#[derive(Debug, Clone)]
pub struct SharedAppState {
    /// Application configuration
    pub config: AppConfig,
    /// Runtime state (not persisted)
    pub runtime: RuntimeState,
}

impl SharedAppState {
    /// Create a new shared state with the given configuration
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            runtime: RuntimeState::default(),
        }
    }
}

/// Database operation requested by a view, drained by the app each frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Open an existing database file
    OpenDatabase(PathBuf),
    /// Create and open a new database file
    CreateDatabase(PathBuf),
    /// Close the current database
    CloseDatabase,
    /// Run a SQL statement typed by the user
    RunSql(String),
    /// Show the contents of a table picked from the table list
    BrowseTable(String),
}

/// Runtime state that is not persisted
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    /// Pending database command from the UI
    pub session_command: Option<SessionCommand>,
    /// Number of statements run this session
    pub statements_run: usize,
    /// Last application-level error (config save failures and the like)
    pub last_error: Option<String>,
}

impl RuntimeState {
    /// Clear any error state
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }
}
