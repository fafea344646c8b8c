//! In-memory fake for the `RepoHost` trait (testing only)
//!
//! `FakeRepoHost` satisfies the trait contract without any network access.
//! Tests script the repository state up front and the pipeline under test
//! observes it exactly as it would observe a live service.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::RepoHost;
use crate::types::{ChangedFile, CheckRun, CommitRef};
use crate::{HostError, Result};

#[derive(Default)]
struct FakeState {
    users: HashSet<String>,
    /// "org/repo" -> set of existing paths
    files: HashMap<String, HashSet<String>>,
    /// "org/repo" -> latest commit
    commits: HashMap<String, CommitRef>,
    /// "org/repo@sha" -> changed files
    commit_files: HashMap<String, Vec<ChangedFile>>,
    /// "org/repo@sha" -> check runs
    check_runs: HashMap<String, Vec<CheckRun>>,
    fail_check_runs: bool,
    calls: u64,
}

/// Scriptable in-memory hosting service.
#[derive(Default)]
pub struct FakeRepoHost {
    state: Mutex<FakeState>,
}

fn repo_key(org: &str, repo: &str) -> String {
    format!("{org}/{repo}")
}

fn sha_key(org: &str, repo: &str, sha: &str) -> String {
    format!("{org}/{repo}@{sha}")
}

impl FakeRepoHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing user account.
    pub fn add_user(&self, username: &str) {
        self.state.lock().unwrap().users.insert(username.to_string());
    }

    /// Make a path exist in a repository.
    pub fn add_file(&self, org: &str, repo: &str, path: &str) {
        self.state
            .lock()
            .unwrap()
            .files
            .entry(repo_key(org, repo))
            .or_default()
            .insert(path.to_string());
    }

    /// Set the latest commit of a repository.
    pub fn set_latest_commit(&self, org: &str, repo: &str, commit: CommitRef) {
        self.state
            .lock()
            .unwrap()
            .commits
            .insert(repo_key(org, repo), commit);
    }

    /// Set the changed-file list for a commit.
    pub fn set_commit_files(&self, org: &str, repo: &str, sha: &str, files: Vec<ChangedFile>) {
        self.state
            .lock()
            .unwrap()
            .commit_files
            .insert(sha_key(org, repo, sha), files);
    }

    /// Set the check runs for a commit.
    pub fn set_check_runs(&self, org: &str, repo: &str, sha: &str, runs: Vec<CheckRun>) {
        self.state
            .lock()
            .unwrap()
            .check_runs
            .insert(sha_key(org, repo, sha), runs);
    }

    /// Make every subsequent `check_runs` call fail with a service error.
    pub fn fail_check_runs(&self) {
        self.state.lock().unwrap().fail_check_runs = true;
    }

    /// Total number of trait calls observed. Lets tests assert that a
    /// rejected request never reached the hosting service.
    pub fn calls(&self) -> u64 {
        self.state.lock().unwrap().calls
    }
}

#[async_trait]
impl RepoHost for FakeRepoHost {
    async fn user_exists(&self, username: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        Ok(state.users.contains(username))
    }

    async fn file_exists(&self, org: &str, repo: &str, path: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        Ok(state
            .files
            .get(&repo_key(org, repo))
            .is_some_and(|paths| paths.contains(path)))
    }

    async fn latest_commit(&self, org: &str, repo: &str) -> Result<Option<CommitRef>> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        Ok(state.commits.get(&repo_key(org, repo)).cloned())
    }

    async fn commit_files(&self, org: &str, repo: &str, sha: &str) -> Result<Vec<ChangedFile>> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        Ok(state
            .commit_files
            .get(&sha_key(org, repo, sha))
            .cloned()
            .unwrap_or_default())
    }

    async fn check_runs(&self, org: &str, repo: &str, sha: &str) -> Result<Vec<CheckRun>> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if state.fail_check_runs {
            return Err(HostError::Api {
                status: 503,
                url: format!("fake://{}/check-runs", sha_key(org, repo, sha)),
            });
        }
        Ok(state
            .check_runs
            .get(&sha_key(org, repo, sha))
            .cloned()
            .unwrap_or_default())
    }
}
