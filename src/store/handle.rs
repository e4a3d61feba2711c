//! Process-wide store handle
//!
//! Replaces the usual lazy-global-connection pattern with an explicit
//! handle constructed once in `main` and injected into the sweeper,
//! the reporter, and the HTTP state.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::IssueStore;
use crate::{Error, Result};

/// Lazily-initialized, memoized handle to the issue store.
///
/// The first `acquire` opens the database; every later call reuses the
/// same `IssueStore` for the life of the process. Concurrent first
/// callers collapse into a single open attempt via the cell.
///
/// Failure policy: a failed open is NOT cached. The cell stays empty
/// and the next caller attempts the open again, so a store that was
/// briefly unreachable at startup recovers without a restart. A missing
/// database path, by contrast, fails identically on every call.
pub struct StoreHandle {
    database: Option<PathBuf>,
    store: OnceCell<Arc<IssueStore>>,
}

impl StoreHandle {
    pub fn new(database: Option<PathBuf>) -> Self {
        Self {
            database,
            store: OnceCell::new(),
        }
    }

    /// Get the shared store, opening it on first use.
    pub async fn acquire(&self) -> Result<Arc<IssueStore>> {
        self.store
            .get_or_try_init(|| async {
                let path = self.database.as_deref().ok_or_else(|| {
                    Error::Configuration(format!(
                        "missing database path: pass --database, set {}, or add a `database` key to issuewatch.toml",
                        crate::config::DATABASE_ENV
                    ))
                })?;
                tracing::info!("opening issue store at {}", path.display());
                let store = IssueStore::open(path)?;
                Ok(Arc::new(store))
            })
            .await
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_acquire_reuses_one_store() {
        let dir = tempfile::tempdir().unwrap();
        let handle = StoreHandle::new(Some(dir.path().join("issues.db")));

        let first = handle.acquire().await.unwrap();
        let second = handle.acquire().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_concurrent_first_callers_share_one_store() {
        let dir = tempfile::tempdir().unwrap();
        let handle = Arc::new(StoreHandle::new(Some(dir.path().join("issues.db"))));

        let a = tokio::spawn({
            let handle = handle.clone();
            async move { handle.acquire().await.unwrap() }
        });
        let b = tokio::spawn({
            let handle = handle.clone();
            async move { handle.acquire().await.unwrap() }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_missing_database_fails_every_call() {
        let handle = StoreHandle::new(None);

        for _ in 0..2 {
            match handle.acquire().await {
                Err(Error::Configuration(msg)) => assert!(msg.contains("database")),
                other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
            }
        }
    }

    #[tokio::test]
    async fn test_failed_open_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("not_yet").join("issues.db");
        let handle = StoreHandle::new(Some(nested.clone()));

        // Parent directory missing: the open fails and the cell stays empty.
        assert!(handle.acquire().await.is_err());

        std::fs::create_dir_all(nested.parent().unwrap()).unwrap();
        assert!(handle.acquire().await.is_ok());
    }
}
