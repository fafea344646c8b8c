//! The `RepoHost` trait - what the grading pipeline needs from a
//! source-hosting service.

use async_trait::async_trait;

use crate::types::{ChangedFile, CheckRun, CommitRef};
use crate::Result;

/// Read-only view of submission repositories on a hosting service.
///
/// Guarantees:
/// - All operations are read-only; calling them in any order or
///   concurrently does not change repository state.
/// - `file_exists` answers `false` for not-found lookups; only transport
///   or service faults surface as errors.
/// - `latest_commit` returns `None` for a repository with no commits,
///   which the pipeline treats as a terminal condition.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Whether an account with this login exists on the hosting service.
    async fn user_exists(&self, username: &str) -> Result<bool>;

    /// Whether `path` exists in the default branch of `org/repo`.
    async fn file_exists(&self, org: &str, repo: &str, path: &str) -> Result<bool>;

    /// The most recent commit of `org/repo`, or `None` if the repository
    /// has no commit history.
    async fn latest_commit(&self, org: &str, repo: &str) -> Result<Option<CommitRef>>;

    /// Files changed by the given commit, in the order the service
    /// reports them.
    async fn commit_files(&self, org: &str, repo: &str, sha: &str) -> Result<Vec<ChangedFile>>;

    /// CI check runs attached to the given commit. An empty list means no
    /// checks have been scheduled yet.
    async fn check_runs(&self, org: &str, repo: &str, sha: &str) -> Result<Vec<CheckRun>>;
}
