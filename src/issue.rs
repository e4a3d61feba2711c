//! Issue types - the records this service maintains
//!
//! Issues are owned by the store; this core never creates or deletes
//! them over the wire, it only flips `is_resolved` during the sweep
//! and counts them for the summary.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Issue severity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Candidates for auto-resolution once stale
    Low,
    Medium,
    /// Highlighted separately in the summary while open
    High,
}

impl Severity {
    /// Get the string representation stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Get all severities
    pub fn all() -> &'static [Severity] {
        &[Severity::Low, Severity::Medium, Severity::High]
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" | "med" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(Error::InvalidSeverity(s.to_string())),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked issue row.
///
/// `created_at` is assigned by the store on insert and never modified.
/// The sweep's only mutation is the `is_resolved` flag, and only in the
/// open-to-resolved direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Row id assigned by the store
    pub id: i64,
    /// Severity category
    pub severity: Severity,
    /// Open = false, resolved = true
    pub is_resolved: bool,
    /// Creation timestamp as stored (UTC, `YYYY-MM-DD HH:MM:SS`)
    pub created_at: String,
}
