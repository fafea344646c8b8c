//! Labmark Hosting - repository state inspection for graded submissions
//!
//! This crate talks to the source-hosting service that stores student
//! submission repositories. It answers the questions the grading pipeline
//! asks about a repository:
//!
//! - Does a file exist at a given path?
//! - What is the latest commit, and who authored it?
//! - Which files did that commit change?
//! - What did the CI check runs for that commit conclude?
//!
//! The `RepoHost` trait is the seam; `GithubClient` is the production
//! implementation. In-memory fakes are provided for testing via the
//! `fakes` module.

mod client;
mod error;
pub mod fakes;
mod github;
mod types;

pub use client::RepoHost;
pub use error::HostError;
pub use github::{GithubClient, GithubConfig};
pub use types::{ChangedFile, CheckConclusion, CheckRun, CommitRef, FileStatus};

/// Result type for hosting operations
pub type Result<T> = std::result::Result<T, HostError>;
