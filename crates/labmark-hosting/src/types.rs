//! Repository state types shared between the client trait and its backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a single file within a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    /// Also covers statuses the hosting service reports that carry no
    /// content change relevant to grading (e.g. "copied").
    #[serde(other)]
    Unchanged,
}

impl FileStatus {
    /// Whether this status represents a destructive change to an existing
    /// path (the only statuses the tamper rule cares about).
    pub fn is_destructive(&self) -> bool {
        matches!(self, FileStatus::Modified | FileStatus::Removed)
    }
}

/// One file touched by a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Repository-relative path.
    pub path: String,

    /// What the commit did to the path.
    pub status: FileStatus,
}

/// The most recent commit of a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRef {
    /// Full commit SHA.
    pub sha: String,

    /// Hosting-service login of the commit author, when the service could
    /// attribute it to an account.
    pub author_login: Option<String>,

    /// Commit timestamp, when reported.
    pub committed_at: Option<DateTime<Utc>>,
}

/// Conclusion of a single CI check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    /// Still running, skipped, cancelled - anything that is neither a pass
    /// nor an explicit failure.
    #[serde(other)]
    Other,
}

/// A named CI result attached to a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check name as configured in CI.
    pub name: String,

    /// Final conclusion of the run.
    pub conclusion: CheckConclusion,

    /// Link to the run details page.
    pub details_url: Option<String>,
}
