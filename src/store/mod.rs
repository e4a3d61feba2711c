//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with a single table:
//! - issues(id, severity, is_resolved, created_at)
//!
//! `IssueStore` owns the connection; `StoreHandle` memoizes one
//! `IssueStore` per process and hands out shared references.

pub mod handle;
pub mod schema;
pub mod sqlite;

pub use handle::StoreHandle;
pub use sqlite::IssueStore;
