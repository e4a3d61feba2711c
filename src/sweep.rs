//! Stale-Issue Resolver - the periodic auto-resolve sweep
//!
//! Runs on a fixed interval and issues one conditional bulk update:
//! open low-severity issues older than the staleness threshold are
//! flipped to resolved. The update is a single atomic statement, so
//! overlapping runs are harmless and a re-run right after a successful
//! sweep matches nothing.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::Result;
use crate::store::StoreHandle;

pub struct Sweeper {
    handle: Arc<StoreHandle>,
    stale_after: Duration,
    interval: Duration,
}

impl Sweeper {
    pub fn new(handle: Arc<StoreHandle>, stale_after: Duration, interval: Duration) -> Self {
        Self {
            handle,
            stale_after,
            interval,
        }
    }

    /// One sweep pass. Returns the number of issues resolved.
    pub async fn run_once(&self) -> Result<usize> {
        let store = self.handle.acquire().await?;
        store.resolve_stale_low_severity(self.stale_after)
    }

    /// One scheduled tick: sweep, then log the outcome. Errors stop
    /// here - the schedule must keep firing, so nothing escapes past
    /// this point.
    pub async fn tick(&self) {
        match self.run_once().await {
            Ok(count) => {
                tracing::info!(
                    "auto-resolved {} stale low-severity issues older than {}s",
                    count,
                    self.stale_after.as_secs()
                );
            }
            Err(e) => {
                tracing::error!("failed to auto-resolve stale issues: {}", e);
            }
        }
    }

    /// Run the sweep loop forever. Intended for `tokio::spawn`.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;
    use crate::store::IssueStore;

    const FIVE_MINUTES: Duration = Duration::from_secs(300);

    fn sweeper_for(db: std::path::PathBuf) -> Sweeper {
        Sweeper::new(
            Arc::new(StoreHandle::new(Some(db))),
            FIVE_MINUTES,
            FIVE_MINUTES,
        )
    }

    #[tokio::test]
    async fn test_run_once_resolves_stale_issues() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("issues.db");

        let store = IssueStore::open(&db).unwrap();
        let old = store.insert_issue(Severity::Low, false, Duration::from_secs(360)).unwrap();
        let young = store.insert_issue(Severity::Low, false, Duration::from_secs(120)).unwrap();
        drop(store);

        let sweeper = sweeper_for(db.clone());
        assert_eq!(sweeper.run_once().await.unwrap(), 1);

        let store = IssueStore::open(&db).unwrap();
        assert!(store.get_issue(old).unwrap().unwrap().is_resolved);
        assert!(!store.get_issue(young).unwrap().unwrap().is_resolved);
    }

    #[tokio::test]
    async fn test_run_once_twice_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("issues.db");

        IssueStore::open(&db)
            .unwrap()
            .insert_issue(Severity::Low, false, Duration::from_secs(600))
            .unwrap();

        let sweeper = sweeper_for(db);
        assert_eq!(sweeper.run_once().await.unwrap(), 1);
        assert_eq!(sweeper.run_once().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_tick_swallows_missing_config() {
        let sweeper = Sweeper::new(
            Arc::new(StoreHandle::new(None)),
            FIVE_MINUTES,
            FIVE_MINUTES,
        );

        // Must log and return rather than propagate or panic.
        sweeper.tick().await;
    }
}
