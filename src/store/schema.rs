//! Database schema definitions

/// SQL to create the issues table
pub const CREATE_ISSUES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS issues (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    severity TEXT NOT NULL,
    is_resolved INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
"#;

/// SQL to create indexes
///
/// The sweep filters on (is_resolved, severity) and the summary counts
/// by the same columns; created_at serves the staleness cutoff.
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_issues_resolved_severity ON issues(is_resolved, severity)",
    "CREATE INDEX IF NOT EXISTS idx_issues_created_at ON issues(created_at)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_ISSUES_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
