//! # Issuewatch - Issue Maintenance Service
//!
//! Keeps an issue table tidy and observable.
//!
//! Issuewatch provides:
//! - A periodic sweep that auto-resolves stale low-severity issues
//! - A summary reporter aggregating issue counts by status and severity
//! - A lazily-initialized, process-wide handle to the SQLite store
//! - An HTTP surface exposing the summary as JSON and as an HTML dashboard

pub mod config;
pub mod issue;
pub mod report;
pub mod server;
pub mod store;
pub mod sweep;

// Re-exports for convenient access
pub use issue::{Issue, Severity};
pub use report::{Reporter, Summary};
pub use store::{IssueStore, StoreHandle};
pub use sweep::Sweeper;

/// Result type alias for Issuewatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Issuewatch operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required connection setting is missing. Not retryable; every
    /// attempt fails the same way until the configuration is fixed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connect or query transport failure. May be transient.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// One of the summary's constituent queries failed.
    #[error("Aggregation failed: {0}")]
    Aggregation(#[source] Box<Error>),

    #[error("Invalid severity: {0}")]
    InvalidSeverity(String),
}
