//! Summary Reporter - issue counts by status and severity
//!
//! One query pass produces a `Summary`; both the JSON payload and the
//! HTML dashboard are rendered from that same value, never recomputed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::store::StoreHandle;
use crate::{Error, Result};

/// The four-count aggregation over the issues table.
///
/// Ephemeral: computed fresh on every reporter run, never persisted.
/// Wire field names are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_issues: u64,
    pub open_issues: u64,
    pub resolved_issues: u64,
    pub high_severity_open: u64,
}

/// Computes the summary through the shared store handle.
pub struct Reporter {
    handle: Arc<StoreHandle>,
}

impl Reporter {
    pub fn new(handle: Arc<StoreHandle>) -> Self {
        Self { handle }
    }

    /// Run the aggregation pass.
    ///
    /// A failed count query surfaces as `Error::Aggregation` wrapping
    /// the cause; acquisition failures (missing configuration, failed
    /// open) pass through unwrapped. There is no partial summary: any
    /// failure means no summary at all.
    pub async fn run(&self) -> Result<Summary> {
        let store = self.handle.acquire().await?;
        store
            .summary()
            .map_err(|e| Error::Aggregation(Box::new(e)))
    }
}

/// Render the summary as a self-contained dashboard page.
pub fn render_dashboard(summary: &Summary, generated_at: DateTime<Utc>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Issue Summary</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; }}
td, th {{ border: 1px solid #ccc; padding: 0.5rem 1rem; text-align: left; }}
.stamp {{ color: #666; font-size: 0.85rem; }}
</style>
</head>
<body>
<h1>Issue Summary</h1>
<table>
<tr><th>Total issues</th><td>{total}</td></tr>
<tr><th>Open issues</th><td>{open}</td></tr>
<tr><th>Resolved issues</th><td>{resolved}</td></tr>
<tr><th>High-severity open</th><td>{high}</td></tr>
</table>
<p class="stamp">Generated at {stamp} UTC</p>
</body>
</html>
"#,
        total = summary.total_issues,
        open = summary.open_issues,
        resolved = summary.resolved_issues,
        high = summary.high_severity_open,
        stamp = generated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// Render an error page in place of the dashboard.
///
/// Always a visibly-marked full error document, never a dashboard with
/// missing or zeroed numbers.
pub fn render_error_page(details: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Issue Summary - Error</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
.error {{ color: #b00020; border: 1px solid #b00020; padding: 1rem; }}
</style>
</head>
<body>
<h1>Issue Summary Unavailable</h1>
<p class="error">Failed to fetch issue summary: {}</p>
</body>
</html>
"#,
        escape_html(details)
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;
    use crate::store::IssueStore;
    use std::time::Duration;

    fn sample_summary() -> Summary {
        Summary {
            total_issues: 10,
            open_issues: 4,
            resolved_issues: 6,
            high_severity_open: 1,
        }
    }

    #[test]
    fn test_summary_wire_field_names() {
        let json = serde_json::to_value(sample_summary()).unwrap();
        assert_eq!(json["totalIssues"], 10);
        assert_eq!(json["openIssues"], 4);
        assert_eq!(json["resolvedIssues"], 6);
        assert_eq!(json["highSeverityOpen"], 1);
    }

    #[test]
    fn test_dashboard_embeds_counts_and_timestamp() {
        let stamp = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let page = render_dashboard(&sample_summary(), stamp);

        assert!(page.contains("<td>10</td>"));
        assert!(page.contains("<td>4</td>"));
        assert!(page.contains("<td>6</td>"));
        assert!(page.contains("<td>1</td>"));
        assert!(page.contains("2026-01-02 03:04:05"));
    }

    #[test]
    fn test_error_page_is_marked_and_escaped() {
        let page = render_error_page("no such table: <issues>");

        assert!(page.contains("Issue Summary Unavailable"));
        assert!(page.contains("no such table: &lt;issues&gt;"));
        assert!(!page.contains("<issues>"));
    }

    #[tokio::test]
    async fn test_reporter_over_seeded_store() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("issues.db");

        let store = IssueStore::open(&db).unwrap();
        for _ in 0..6 {
            store.insert_issue(Severity::Low, true, Duration::ZERO).unwrap();
        }
        for _ in 0..3 {
            store.insert_issue(Severity::Medium, false, Duration::ZERO).unwrap();
        }
        store.insert_issue(Severity::High, false, Duration::ZERO).unwrap();
        drop(store);

        let reporter = Reporter::new(Arc::new(StoreHandle::new(Some(db))));
        let summary = reporter.run().await.unwrap();
        assert_eq!(summary, sample_summary());
    }

    #[tokio::test]
    async fn test_query_failure_yields_aggregation_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("issues.db");

        let handle = Arc::new(StoreHandle::new(Some(db.clone())));
        let reporter = Reporter::new(handle.clone());
        handle.acquire().await.unwrap();

        // Pull the table out from under the cached connection.
        rusqlite::Connection::open(&db)
            .unwrap()
            .execute("DROP TABLE issues", [])
            .unwrap();

        match reporter.run().await {
            Err(Error::Aggregation(cause)) => assert!(!cause.to_string().is_empty()),
            other => panic!("expected aggregation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_reporter_missing_config_is_not_aggregation() {
        let reporter = Reporter::new(Arc::new(StoreHandle::new(None)));

        match reporter.run().await {
            Err(Error::Configuration(_)) => {}
            other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
        }
    }
}
