//! Workbench view state management

/// Current view in the workbench
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkbenchView {
    #[default]
    Browser,
    Settings,
}

impl WorkbenchView {
    /// Get the display name for this view
    pub fn name(&self) -> &'static str {
        match self {
            WorkbenchView::Browser => "Browser",
            WorkbenchView::Settings => "Settings",
        }
    }

    /// Get the icon character for this view
    pub fn icon(&self) -> &'static str {
        match self {
            WorkbenchView::Browser => "B",
            WorkbenchView::Settings => "S",
        }
    }
}

/// Overall workbench state
#[derive(Debug, Default)]
pub struct WorkbenchState {
    /// Current active view
    pub current_view: WorkbenchView,
    /// Whether the About window is open
    pub show_about: bool,
    /// Browser view state
    pub browser: BrowserViewState,
    /// Settings view state
    pub settings: SettingsViewState,
}

/// Browser view state
#[derive(Debug, Default)]
pub struct BrowserViewState {
    /// Database file path as typed by the user
    pub path_input: String,
    /// SQL command as typed by the user
    pub sql_input: String,
    /// Table currently highlighted in the table list
    pub selected_table: Option<String>,
    /// Guard message shown instead of the session outcome
    /// ("No database loaded.", "No SQL to run.")
    pub local_status: Option<String>,
}

/// Settings view state
#[derive(Debug, Default)]
pub struct SettingsViewState {
    /// Currently expanded section
    pub expanded_section: Option<SettingsSection>,
    /// Unsaved changes flag, drained by the app's auto-save
    pub has_unsaved_changes: bool,
}

/// Settings sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSection {
    Query,
    Display,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_names() {
        assert_eq!(WorkbenchView::Browser.name(), "Browser");
        assert_eq!(WorkbenchView::Settings.name(), "Settings");
        assert_eq!(WorkbenchView::default(), WorkbenchView::Browser);
    }
}
