//! Database session adapter
//!
//! Mediates all access to one SQLite database file through a narrow,
//! stateful contract: open/create/close a database, execute a statement,
//! list tables and columns, and read the outcome of the most recent
//! statement. Expected failures (bad SQL, missing file) never cross this
//! boundary as errors; they are captured into the current outcome for the
//! caller to inspect and display.

pub mod outcome;

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;
use tracing::{info, warn};

use self::outcome::{is_select_statement, render_value, ExecutionOutcome, ResultGrid};

/// Lock-wait budget applied to every connection, overridable via config.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Schema catalog query; also doubles as the open-time probe that forces
/// SQLite to actually read the file (connections open lazily, so an
/// unreadable or non-database file only surfaces here).
const CATALOG_QUERY: &str = "SELECT name FROM sqlite_master WHERE type='table'";

/// Internal AUTOINCREMENT bookkeeping table, never surfaced to the user.
const SEQUENCE_TABLE: &str = "sqlite_sequence";

/// Failure to establish a connection to a database file.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
}

/// One open-or-closed relationship to a SQLite database file.
///
/// Owns at most one connection handle; opening a new database closes the
/// previous one first, so two live handles never coexist. All operations
/// are synchronous and the session is single-owner (no internal locking).
pub struct Session {
    /// Last path handed to `open`/`create`, kept after a failed open so the
    /// UI can still show what the user picked.
    path: Option<PathBuf>,
    /// `Some` if and only if the session is loaded.
    conn: Option<Connection>,
    /// Outcome of the most recent statement.
    outcome: ExecutionOutcome,
    /// Cached table list, recomputed by `table_names`.
    tables: Vec<String>,
    busy_timeout: Duration,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a closed session with the default busy timeout.
    pub fn new() -> Self {
        Self::with_busy_timeout(DEFAULT_BUSY_TIMEOUT)
    }

    /// Create a closed session with a custom busy timeout.
    pub fn with_busy_timeout(busy_timeout: Duration) -> Self {
        Self {
            path: None,
            conn: None,
            outcome: ExecutionOutcome::default(),
            tables: Vec::new(),
            busy_timeout,
        }
    }

    /// Change the busy timeout, applying it to the live connection if any.
    pub fn set_busy_timeout(&mut self, busy_timeout: Duration) {
        self.busy_timeout = busy_timeout;
        if let Some(conn) = &self.conn {
            if let Err(e) = conn.busy_timeout(busy_timeout) {
                warn!("could not apply busy timeout: {e}");
            }
        }
    }

    /// Open an existing database file. A nonexistent path is an open
    /// failure; use [`Session::create`] to make a new database.
    ///
    /// Any previously open session is closed first. On failure the session
    /// stays closed but the path is kept for display, and the driver
    /// message is recorded in the outcome.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        self.connect(path.as_ref(), flags)
    }

    /// Open a database file, creating it if it does not exist.
    pub fn create(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        self.connect(path.as_ref(), flags)
    }

    fn connect(&mut self, path: &Path, flags: OpenFlags) -> Result<(), SessionError> {
        self.close();
        self.path = Some(path.to_path_buf());

        let busy_timeout = self.busy_timeout;
        let attempt = Connection::open_with_flags(path, flags).and_then(|conn| {
            conn.busy_timeout(busy_timeout)?;
            probe(&conn)?;
            Ok(conn)
        });

        match attempt {
            Ok(conn) => {
                info!("opened database {}", path.display());
                self.conn = Some(conn);
                Ok(())
            }
            Err(source) => {
                warn!("could not open {}: {source}", path.display());
                self.outcome.message = "Error".to_string();
                self.outcome.has_error = true;
                self.outcome.error = source.to_string();
                Err(SessionError::Open {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }

    /// Release the connection if open and reset all session state.
    /// Idempotent: closing a closed session is just the state reset.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, e)) = conn.close() {
                warn!("error closing database: {e}");
            }
        }
        self.path = None;
        self.tables.clear();
        self.outcome = ExecutionOutcome::default();
    }

    /// Run one SQL statement. The outcome is retrieved through the status
    /// getters; this never returns an error.
    ///
    /// On a closed session this records the statement text and nothing
    /// else. A statement is treated as a query iff its trimmed, lowercased
    /// text starts with `select`; queries produce a [`ResultGrid`], other
    /// statements produce none. If the driver reports the file is not a
    /// database, the handle is discarded and the session closes.
    pub fn execute(&mut self, sql: &str) {
        let sql = sql.trim().to_string();
        self.outcome = ExecutionOutcome::default();
        self.outcome.statement = sql.clone();

        let is_query = is_select_statement(&sql);
        let result = match self.conn.as_ref() {
            Some(conn) => {
                if is_query {
                    run_query(conn, &sql).map(Some)
                } else {
                    run_statement(conn, &sql).map(|()| None)
                }
            }
            None => return,
        };

        self.outcome.is_query = is_query;
        match result {
            Ok(grid) => {
                self.outcome.message = "OK".to_string();
                self.outcome.grid = grid;
            }
            Err(e) => self.record_failure(&e),
        }
    }

    /// Names of user tables in the open database, excluding the internal
    /// sequence table, in catalog order. Empty when closed. The result is
    /// also cached on the session (see [`Session::cached_tables`]).
    ///
    /// A catalog failure is surfaced through the outcome's error fields
    /// rather than silently resetting the session.
    pub fn table_names(&mut self) -> Vec<String> {
        self.tables.clear();
        let result = match self.conn.as_ref() {
            Some(conn) => fetch_table_names(conn),
            None => return Vec::new(),
        };
        match result {
            Ok(names) => {
                self.tables = names.clone();
                names
            }
            Err(e) => {
                self.outcome = ExecutionOutcome::default();
                self.record_failure(&e);
                Vec::new()
            }
        }
    }

    /// Ordered column labels for one table, obtained without fetching rows.
    /// Empty when closed. Failures are surfaced like `table_names`.
    pub fn column_names(&mut self, table: &str) -> Vec<String> {
        let result = match self.conn.as_ref() {
            Some(conn) => fetch_column_names(conn, table),
            None => return Vec::new(),
        };
        match result {
            Ok(columns) => columns,
            Err(e) => {
                self.outcome = ExecutionOutcome::default();
                self.record_failure(&e);
                Vec::new()
            }
        }
    }

    fn record_failure(&mut self, error: &rusqlite::Error) {
        self.outcome.message = "Error".to_string();
        self.outcome.has_error = true;
        self.outcome.error = error.to_string();
        self.outcome.grid = None;
        if is_not_a_database(error) {
            // The connection itself is untrustworthy; discard it rather
            // than allow retried statements against a broken handle.
            warn!("driver reported not-a-database; closing session");
            self.conn = None;
            self.tables.clear();
        }
    }

    // Status reads, all reflecting the most recent operation.

    pub fn is_loaded(&self) -> bool {
        self.conn.is_some()
    }

    /// Path of the last open/create attempt, kept even when it failed.
    pub fn file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_query(&self) -> bool {
        self.outcome.is_query
    }

    pub fn has_error(&self) -> bool {
        self.outcome.has_error
    }

    pub fn error_text(&self) -> &str {
        &self.outcome.error
    }

    pub fn result_message(&self) -> &str {
        &self.outcome.message
    }

    pub fn last_statement(&self) -> &str {
        &self.outcome.statement
    }

    /// The current result grid, if the last statement was a successful
    /// query. Replaced or dropped by the next state-mutating call.
    pub fn result(&self) -> Option<&ResultGrid> {
        self.outcome.grid.as_ref()
    }

    /// Table list as of the last `table_names` call.
    pub fn cached_tables(&self) -> &[String] {
        &self.tables
    }
}

/// Validate that the file behind a fresh connection is a readable database.
fn probe(conn: &Connection) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(CATALOG_QUERY)?;
    let mut rows = stmt.query([])?;
    rows.next()?;
    Ok(())
}

fn run_query(conn: &Connection, sql: &str) -> rusqlite::Result<ResultGrid> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let column_count = columns.len();

    let mut grid = ResultGrid {
        columns,
        rows: Vec::new(),
    };
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(column_count);
        for index in 0..column_count {
            cells.push(render_value(row.get_ref(index)?));
        }
        grid.rows.push(cells);
    }
    Ok(grid)
}

fn run_statement(conn: &Connection, sql: &str) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(sql)?;
    if stmt.column_count() == 0 {
        stmt.execute([])?;
    } else {
        // Row-producing but not classified as a query (PRAGMA and friends);
        // run it and discard the rows instead of failing.
        let mut rows = stmt.query([])?;
        while rows.next()?.is_some() {}
    }
    Ok(())
}

fn fetch_table_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(CATALOG_QUERY)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names.into_iter().filter(|n| n != SEQUENCE_TABLE).collect())
}

fn fetch_column_names(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let sql = format!("SELECT * FROM {} LIMIT 0", quote_identifier(table));
    let stmt = conn.prepare(&sql)?;
    Ok(stmt.column_names().iter().map(|c| c.to_string()).collect())
}

/// Double-quote an identifier so table names with spaces or quotes work.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Unrecoverable-connection classification, keyed off the stable driver
/// error code rather than the error message text.
fn is_not_a_database(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(inner, _) if inner.code == rusqlite::ErrorCode::NotADatabase
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Create a database file with a small `people` table.
    fn people_db(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE people (id INTEGER PRIMARY KEY, first TEXT, last TEXT, dob TEXT);
             INSERT INTO people VALUES (1, 'Ada', 'Lovelace', NULL);",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_new_session_is_closed() {
        let session = Session::new();
        assert!(!session.is_loaded());
        assert!(!session.has_error());
        assert!(session.file_path().is_none());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_open_missing_file_records_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.db");

        let mut session = Session::new();
        assert!(session.open(&path).is_err());
        assert!(!session.is_loaded());
        assert!(session.has_error());
        assert!(!session.error_text().is_empty());
        // Path is kept for display even though the open failed.
        assert_eq!(session.file_path(), Some(path.as_path()));
    }

    #[test]
    fn test_create_makes_new_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.db");

        let mut session = Session::new();
        session.create(&path).unwrap();
        assert!(session.is_loaded());
        assert!(!session.has_error());
        assert!(path.exists());
        assert!(session.table_names().is_empty());
    }

    #[test]
    fn test_open_valid_database() {
        let dir = TempDir::new().unwrap();
        let path = people_db(&dir, "people.db");

        let mut session = Session::new();
        session.open(&path).unwrap();
        assert!(session.is_loaded());
        assert!(!session.has_error());
        assert_eq!(session.table_names(), vec!["people".to_string()]);
    }

    #[test]
    fn test_open_non_database_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "select * from people\nthis is not a database\n").unwrap();

        let mut session = Session::new();
        assert!(session.open(&path).is_err());
        assert!(!session.is_loaded());
        assert!(session.has_error());
        assert_eq!(session.file_path(), Some(path.as_path()));
    }

    #[test]
    fn test_table_names_excludes_sqlite_sequence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seq.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE log (id INTEGER PRIMARY KEY AUTOINCREMENT, note TEXT);
             INSERT INTO log (note) VALUES ('first');",
        )
        .unwrap();
        // The insert into an AUTOINCREMENT table materializes the
        // bookkeeping table; make sure it really exists in the schema.
        let present: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'sqlite_sequence'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(present, 1);
        drop(conn);

        let mut session = Session::new();
        session.open(&path).unwrap();
        assert_eq!(session.table_names(), vec!["log".to_string()]);
        assert_eq!(session.cached_tables(), ["log".to_string()]);
    }

    #[test]
    fn test_select_one_yields_single_cell_grid() {
        let dir = TempDir::new().unwrap();
        let path = people_db(&dir, "people.db");

        let mut session = Session::new();
        session.open(&path).unwrap();
        session.execute("SELECT 1");

        assert!(!session.has_error());
        assert!(session.is_query());
        assert_eq!(session.result_message(), "OK");
        let grid = session.result().unwrap();
        assert_eq!(grid.column_count(), 1);
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.rows[0][0], "1");
    }

    #[test]
    fn test_invalid_sql_records_driver_message() {
        let dir = TempDir::new().unwrap();
        let path = people_db(&dir, "people.db");

        let mut session = Session::new();
        session.open(&path).unwrap();
        session.execute("not valid sql");

        assert!(session.has_error());
        assert!(!session.error_text().is_empty());
        assert!(!session.is_query());
        assert_eq!(session.result_message(), "Error");
        // A plain syntax error does not degrade the session.
        assert!(session.is_loaded());
    }

    #[test]
    fn test_case_insensitive_query_classification() {
        let dir = TempDir::new().unwrap();
        let path = people_db(&dir, "people.db");

        let mut session = Session::new();
        session.open(&path).unwrap();
        session.execute("  sELect first FROM people  ");
        assert!(session.is_query());
        assert!(!session.has_error());
        assert_eq!(session.last_statement(), "sELect first FROM people");
    }

    #[test]
    fn test_non_query_statement_with_rows_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = people_db(&dir, "people.db");

        let mut session = Session::new();
        session.open(&path).unwrap();
        session.execute("PRAGMA user_version");

        assert!(!session.has_error());
        assert!(!session.is_query());
        assert_eq!(session.result_message(), "OK");
        assert!(session.result().is_none());
    }

    #[test]
    fn test_close_resets_everything() {
        let dir = TempDir::new().unwrap();
        let path = people_db(&dir, "people.db");

        let mut session = Session::new();
        session.open(&path).unwrap();
        session.execute("SELECT * FROM people");
        assert!(session.result().is_some());

        session.close();
        assert!(!session.is_loaded());
        assert!(session.file_path().is_none());
        assert!(!session.has_error());
        assert!(session.result().is_none());
        assert!(session.table_names().is_empty());
        assert!(session.cached_tables().is_empty());

        // Closing again is a no-op.
        session.close();
        assert!(!session.is_loaded());
    }

    #[test]
    fn test_execute_on_closed_session_records_statement_only() {
        let mut session = Session::new();
        session.execute("SELECT 1");

        assert_eq!(session.last_statement(), "SELECT 1");
        assert!(!session.has_error());
        assert!(!session.is_query());
        assert!(session.result_message().is_empty());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_round_trip_columns_and_values() {
        let dir = TempDir::new().unwrap();
        let path = people_db(&dir, "people.db");

        let mut session = Session::new();
        session.open(&path).unwrap();

        assert_eq!(
            session.column_names("people"),
            vec!["id", "first", "last", "dob"]
        );

        session.execute("SELECT * FROM people");
        let grid = session.result().unwrap();
        assert_eq!(grid.columns, vec!["id", "first", "last", "dob"]);
        assert_eq!(grid.row_count(), 1);
        // NULL renders as the empty string.
        assert_eq!(grid.rows[0], vec!["1", "Ada", "Lovelace", ""]);
    }

    #[test]
    fn test_second_open_replaces_first_handle() {
        let dir = TempDir::new().unwrap();
        let path_a = dir.path().join("a.db");
        let path_b = dir.path().join("b.db");
        Connection::open(&path_a)
            .unwrap()
            .execute_batch("CREATE TABLE alpha (x)")
            .unwrap();
        Connection::open(&path_b)
            .unwrap()
            .execute_batch("CREATE TABLE beta (x)")
            .unwrap();

        let mut session = Session::new();
        session.open(&path_a).unwrap();
        assert_eq!(session.table_names(), vec!["alpha".to_string()]);

        session.open(&path_b).unwrap();
        assert_eq!(session.file_path(), Some(path_b.as_path()));
        // Only the second database's catalog is visible.
        assert_eq!(session.table_names(), vec!["beta".to_string()]);
    }

    #[test]
    fn test_missing_table_column_listing_surfaces_error() {
        let dir = TempDir::new().unwrap();
        let path = people_db(&dir, "people.db");

        let mut session = Session::new();
        session.open(&path).unwrap();
        let columns = session.column_names("no_such_table");

        assert!(columns.is_empty());
        assert!(session.has_error());
        assert!(!session.error_text().is_empty());
        // A metadata failure does not degrade the session.
        assert!(session.is_loaded());
    }

    #[test]
    fn test_quoted_table_name_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quoted.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE \"odd name\" (a, b)")
            .unwrap();

        let mut session = Session::new();
        session.open(&path).unwrap();
        assert_eq!(session.column_names("odd name"), vec!["a", "b"]);
    }

    #[test]
    fn test_dml_statement_reports_ok_without_grid() {
        let dir = TempDir::new().unwrap();
        let path = people_db(&dir, "people.db");

        let mut session = Session::new();
        session.open(&path).unwrap();
        session.execute(
            "INSERT INTO people VALUES (999, 'John', 'Doe', '1920-12-31')",
        );
        assert!(!session.has_error());
        assert!(!session.is_query());
        assert_eq!(session.result_message(), "OK");
        assert!(session.result().is_none());

        session.execute("SELECT COUNT(*) FROM people");
        assert_eq!(session.result().unwrap().rows[0][0], "2");
    }

    #[test]
    fn test_new_statement_invalidates_previous_grid() {
        let dir = TempDir::new().unwrap();
        let path = people_db(&dir, "people.db");

        let mut session = Session::new();
        session.open(&path).unwrap();
        session.execute("SELECT * FROM people");
        assert!(session.result().is_some());

        session.execute("DELETE FROM people WHERE id = 1");
        assert!(session.result().is_none());
        assert!(!session.has_error());
    }

    #[test]
    fn test_not_a_database_classifier_uses_error_code() {
        let not_a_db = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_NOTADB),
            Some("file is not a database".to_string()),
        );
        assert!(is_not_a_database(&not_a_db));

        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".to_string()),
        );
        assert!(!is_not_a_database(&busy));
        assert!(!is_not_a_database(&rusqlite::Error::QueryReturnedNoRows));
    }

    #[test]
    fn test_quote_identifier_escapes_quotes() {
        assert_eq!(quote_identifier("people"), "\"people\"");
        assert_eq!(quote_identifier("od\"d"), "\"od\"\"d\"");
    }
}
