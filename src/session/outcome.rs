//! Statement outcomes and string-rendered result grids.

use rusqlite::types::ValueRef;

/// Result of the most recently executed statement.
///
/// Replaced wholesale on every `execute` call; dropping the previous
/// outcome also drops its grid, so a stale result is unrepresentable.
#[derive(Debug, Default)]
pub struct ExecutionOutcome {
    /// The trimmed statement text as submitted.
    pub statement: String,
    /// Whether the statement was classified as row-producing.
    pub is_query: bool,
    /// Whether execution failed.
    pub has_error: bool,
    /// Short result message ("OK" or "Error").
    pub message: String,
    /// Driver error message, empty on success.
    pub error: String,
    /// Result rows, present only for a successful query.
    pub grid: Option<ResultGrid>,
}

/// Rows produced by a query, rendered to strings once at execute time.
///
/// `rows[i]` holds one cell per entry in `columns`, in column order.
/// NULL cells render as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultGrid {
    /// Column labels in declaration order.
    pub columns: Vec<String>,
    /// String-rendered cell values, one inner vec per row.
    pub rows: Vec<Vec<String>>,
}

impl ResultGrid {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Classify a statement as a row-producing query.
///
/// Purely syntactic: case-insensitively, ignoring leading whitespace, does
/// the text begin with the literal token `select`? A statement that merely
/// starts with "select" as a prefix of another word misclassifies; that
/// matches the historical behavior of this check and is not corrected here.
pub fn is_select_statement(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("select"))
}

/// Render a single cell value as its display string.
pub(crate) fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => r.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_classification() {
        assert!(is_select_statement("SELECT * FROM people"));
        assert!(is_select_statement("select 1"));
        assert!(is_select_statement("  \n\tSeLeCt name FROM t"));
        // Known syntactic edge: any "select" prefix counts.
        assert!(is_select_statement("selection"));

        assert!(!is_select_statement("sselect * from people"));
        assert!(!is_select_statement("INSERT INTO t VALUES (1)"));
        assert!(!is_select_statement("WITH x AS (SELECT 1) SELECT * FROM x"));
        assert!(!is_select_statement(""));
        assert!(!is_select_statement("   "));
        assert!(!is_select_statement("sel"));
    }

    #[test]
    fn test_render_null_as_empty_string() {
        assert_eq!(render_value(ValueRef::Null), "");
    }

    #[test]
    fn test_render_scalar_values() {
        assert_eq!(render_value(ValueRef::Integer(42)), "42");
        assert_eq!(render_value(ValueRef::Integer(-7)), "-7");
        assert_eq!(render_value(ValueRef::Real(1.5)), "1.5");
        assert_eq!(render_value(ValueRef::Text(b"hello")), "hello");
    }

    #[test]
    fn test_grid_counts() {
        let grid = ResultGrid {
            columns: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into(), "2".into()], vec!["3".into(), "4".into()]],
        };
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.row_count(), 2);

        let empty = ResultGrid::default();
        assert_eq!(empty.column_count(), 0);
        assert_eq!(empty.row_count(), 0);
    }

    #[test]
    fn test_default_outcome_is_clean() {
        let outcome = ExecutionOutcome::default();
        assert!(!outcome.has_error);
        assert!(!outcome.is_query);
        assert!(outcome.statement.is_empty());
        assert!(outcome.message.is_empty());
        assert!(outcome.error.is_empty());
        assert!(outcome.grid.is_none());
    }
}
