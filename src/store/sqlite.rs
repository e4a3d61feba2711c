//! SQLite storage implementation

use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::schema;
use crate::issue::{Issue, Severity};
use crate::report::Summary;
use crate::{Error, Result};

/// SQLite-backed store for the issues table.
///
/// The connection sits behind a mutex so overlapping HTTP requests and
/// the background sweep serialize at the store; everything beyond that
/// is left to SQLite's statement-level atomicity.
pub struct IssueStore {
    conn: Mutex<Connection>,
}

impl IssueStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn: Mutex::new(conn) };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn: Mutex::new(conn) };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock();
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // Recover the guard if a previous caller panicked mid-query.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ========== Sweep Operations ==========

    /// Flip `is_resolved` for every open low-severity issue whose
    /// `created_at` is older than `older_than`. One atomic statement,
    /// never read-then-write, so concurrent runs and writers only ever
    /// see an issue transition once. Returns the number of rows changed;
    /// zero is a valid outcome.
    pub fn resolve_stale_low_severity(&self, older_than: Duration) -> Result<usize> {
        let conn = self.lock();
        let changed = conn.execute(
            r#"
            UPDATE issues
            SET is_resolved = 1
            WHERE is_resolved = 0
              AND severity = 'low'
              AND created_at <= datetime('now', ?1)
            "#,
            [offset_modifier(older_than)],
        )?;
        Ok(changed)
    }

    // ========== Summary Operations ==========

    /// Count issues by status and severity.
    ///
    /// All four counts run inside one read transaction so the numbers
    /// are mutually consistent: `total = open + resolved` holds within
    /// a single summary even while the sweep runs.
    pub fn summary(&self) -> Result<Summary> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let total_issues = count_where(&tx, "SELECT COUNT(*) FROM issues", params![])?;
        let open_issues = count_where(
            &tx,
            "SELECT COUNT(*) FROM issues WHERE is_resolved = 0",
            params![],
        )?;
        let resolved_issues = count_where(
            &tx,
            "SELECT COUNT(*) FROM issues WHERE is_resolved = 1",
            params![],
        )?;
        let high_severity_open = count_where(
            &tx,
            "SELECT COUNT(*) FROM issues WHERE is_resolved = 0 AND severity = ?1",
            params![Severity::High.as_str()],
        )?;

        tx.commit()?;

        Ok(Summary {
            total_issues,
            open_issues,
            resolved_issues,
            high_severity_open,
        })
    }

    // ========== Issue Operations ==========

    /// Insert an issue, backdating `created_at` by `age`.
    ///
    /// Used by the seed command and by tests; issues are otherwise
    /// assumed to be created by an external system.
    pub fn insert_issue(&self, severity: Severity, is_resolved: bool, age: Duration) -> Result<i64> {
        let conn = self.lock();
        conn.execute(
            r#"
            INSERT INTO issues (severity, is_resolved, created_at)
            VALUES (?1, ?2, datetime('now', ?3))
            "#,
            params![severity.as_str(), is_resolved, offset_modifier(age)],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get an issue by id
    pub fn get_issue(&self, id: i64) -> Result<Option<Issue>> {
        let conn = self.lock();
        conn.query_row(
            "SELECT id, severity, is_resolved, created_at FROM issues WHERE id = ?1",
            [id],
            row_to_issue,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Count all issues
    pub fn count_issues(&self) -> Result<u64> {
        let conn = self.lock();
        count_where(&conn, "SELECT COUNT(*) FROM issues", params![])
    }
}

/// SQLite datetime modifier for "now minus `age`"
fn offset_modifier(age: Duration) -> String {
    format!("-{} seconds", age.as_secs())
}

fn count_where(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<u64> {
    let count: i64 = conn.query_row(sql, params, |row| row.get(0))?;
    Ok(count as u64)
}

fn row_to_issue(row: &rusqlite::Row) -> rusqlite::Result<Issue> {
    let severity_str: String = row.get(1)?;

    let severity: Severity = severity_str.parse().map_err(|e: Error| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Issue {
        id: row.get(0)?,
        severity,
        is_resolved: row.get(2)?,
        created_at: row.get(3)?,
    })
}
