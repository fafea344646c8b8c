//! GitHub REST API backend for `RepoHost`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::client::RepoHost;
use crate::types::{ChangedFile, CheckConclusion, CheckRun, CommitRef, FileStatus};
use crate::{HostError, Result};

/// GitHub client configuration
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// API base URL (override for GitHub Enterprise or local stubs)
    pub api_base: String,
    /// Bearer token; unauthenticated requests work but are rate-limited
    pub token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_base: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| "https://api.github.com".to_string()),
            token: std::env::var("GITHUB_TOKEN").ok(),
            timeout_secs: 30,
        }
    }
}

impl GithubConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific API endpoint
    pub fn new(api_base: &str) -> Self {
        GithubConfig {
            api_base: api_base.trim_end_matches('/').to_string(),
            token: None,
            timeout_secs: 30,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

/// `RepoHost` backed by the GitHub REST API.
pub struct GithubClient {
    config: GithubConfig,
    http_client: reqwest::Client,
}

impl GithubClient {
    /// Create a new GitHub client
    pub fn new(config: GithubConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent("labmark-hosting/0.2.0")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        GithubClient {
            config,
            http_client,
        }
    }

    /// Create client from environment variables
    pub fn from_env() -> Self {
        Self::new(GithubConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let mut request = self
            .http_client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// GET a URL and answer whether the resource exists.
    ///
    /// Any non-success status counts as "absent"; only transport failures
    /// are errors.
    async fn probe(&self, url: &str) -> Result<bool> {
        let response = self.get(url).await?;
        debug!(url = %url, status = %response.status(), "probe");
        Ok(response.status().is_success())
    }
}

// Wire shapes - only the fields the pipeline consumes.

#[derive(Deserialize)]
struct WireCommitListEntry {
    sha: String,
    author: Option<WireAccount>,
    commit: Option<WireCommitMeta>,
}

#[derive(Deserialize)]
struct WireAccount {
    login: String,
}

#[derive(Deserialize)]
struct WireCommitMeta {
    author: Option<WireGitAuthor>,
}

#[derive(Deserialize)]
struct WireGitAuthor {
    date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct WireCommitDetail {
    #[serde(default)]
    files: Vec<WireCommitFile>,
}

#[derive(Deserialize)]
struct WireCommitFile {
    filename: String,
    status: FileStatus,
}

#[derive(Deserialize)]
struct WireCheckRunList {
    #[serde(default)]
    check_runs: Vec<WireCheckRun>,
}

#[derive(Deserialize)]
struct WireCheckRun {
    name: String,
    conclusion: Option<CheckConclusion>,
    html_url: Option<String>,
}

#[async_trait]
impl RepoHost for GithubClient {
    async fn user_exists(&self, username: &str) -> Result<bool> {
        self.probe(&self.url(&format!("users/{username}"))).await
    }

    async fn file_exists(&self, org: &str, repo: &str, path: &str) -> Result<bool> {
        self.probe(&self.url(&format!("repos/{org}/{repo}/contents/{path}")))
            .await
    }

    async fn latest_commit(&self, org: &str, repo: &str) -> Result<Option<CommitRef>> {
        let url = self.url(&format!("repos/{org}/{repo}/commits?per_page=1"));
        let response = self.get(&url).await?;

        // GitHub answers 409 for a repository with no commits at all, and
        // 404 when the repository itself is absent. Either way the
        // pipeline sees "no commit history".
        let status = response.status();
        if status.as_u16() == 404 || status.as_u16() == 409 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(HostError::Api {
                status: status.as_u16(),
                url,
            });
        }

        let commits: Vec<WireCommitListEntry> = response.json().await?;
        Ok(commits.into_iter().next().map(|entry| CommitRef {
            sha: entry.sha,
            author_login: entry.author.map(|a| a.login),
            committed_at: entry.commit.and_then(|c| c.author).and_then(|a| a.date),
        }))
    }

    async fn commit_files(&self, org: &str, repo: &str, sha: &str) -> Result<Vec<ChangedFile>> {
        let url = self.url(&format!("repos/{org}/{repo}/commits/{sha}"));
        let response = self.get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HostError::Api {
                status: status.as_u16(),
                url,
            });
        }

        let detail: WireCommitDetail = response.json().await?;
        Ok(detail
            .files
            .into_iter()
            .map(|f| ChangedFile {
                path: f.filename,
                status: f.status,
            })
            .collect())
    }

    async fn check_runs(&self, org: &str, repo: &str, sha: &str) -> Result<Vec<CheckRun>> {
        let url = self.url(&format!("repos/{org}/{repo}/commits/{sha}/check-runs"));
        let response = self.get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HostError::Api {
                status: status.as_u16(),
                url,
            });
        }

        let list: WireCheckRunList = response.json().await?;
        Ok(list
            .check_runs
            .into_iter()
            .map(|run| CheckRun {
                name: run.name,
                conclusion: run.conclusion.unwrap_or(CheckConclusion::Other),
                details_url: run.html_url,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = GithubConfig::new("https://github.example.com/api/v3/");
        assert_eq!(config.api_base, "https://github.example.com/api/v3");
    }

    #[test]
    fn test_config_with_token() {
        let config = GithubConfig::new("https://api.github.com").with_token("ghp_test");
        assert_eq!(config.token.as_deref(), Some("ghp_test"));
    }

    #[test]
    fn test_url_joins_paths() {
        let client = GithubClient::new(GithubConfig::new("https://api.github.com"));
        assert_eq!(
            client.url("repos/org/repo/contents/src/main.c"),
            "https://api.github.com/repos/org/repo/contents/src/main.c"
        );
    }

    #[test]
    fn test_wire_commit_decodes_without_account() {
        // Commits whose author has no hosting account still carry a sha.
        let json = r#"{"sha": "abc123", "author": null, "commit": {"author": {"date": "2025-03-01T10:00:00Z"}}}"#;
        let entry: WireCommitListEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.sha, "abc123");
        assert!(entry.author.is_none());
    }

    #[test]
    fn test_wire_check_run_null_conclusion() {
        let json = r#"{"name": "build", "conclusion": null, "html_url": "https://ci.example.com/1"}"#;
        let run: WireCheckRun = serde_json::from_str(json).unwrap();
        assert!(run.conclusion.is_none());
    }
}
