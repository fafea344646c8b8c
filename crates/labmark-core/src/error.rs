//! Error taxonomy for the grading pipeline
//!
//! Every failure a caller can observe is a distinct variant with a
//! user-readable message. `Pending` is not here: zero check runs is a
//! valid non-terminal outcome (`GradeOutcome::Pending`), not an error.

use thiserror::Error;

use labmark_hosting::HostError;
use labmark_sheets::SheetError;

#[derive(Error, Debug)]
pub enum GradeError {
    /// No course descriptor matches the requested id
    #[error("course not found: {course_id}")]
    CourseNotFound { course_id: String },

    /// The course descriptor is missing a field the pipeline needs
    #[error("course configuration incomplete: {detail}")]
    ConfigurationMissing { detail: String },

    /// The lab identifier contains no digits to extract a lab number from
    #[error("invalid lab id: {lab_id}")]
    InvalidLabId { lab_id: String },

    /// Required submission files are absent from the repository
    #[error("missing required files: {}", .paths.join(", "))]
    RequiredFilesMissing { paths: Vec<String> },

    /// Protected test files are absent from the repository
    #[error("missing test files: {}", .paths.join(", "))]
    TestFilesMissing { paths: Vec<String> },

    /// No CI workflow definition exists in the repository
    #[error("CI is not configured: no workflow definitions found")]
    CiConfigurationMissing,

    /// The repository has no commit history
    #[error("repository has no commits")]
    NoCommits,

    /// The latest commit modified or removed protected test files
    #[error("protected test files were modified: {}", .paths.join(", "))]
    TamperDetected { paths: Vec<String> },

    /// The check-run listing for the latest commit could not be fetched
    #[error("CI check runs are unavailable")]
    ChecksUnavailable,

    /// The group worksheet does not exist in the gradebook
    #[error("group not found in gradebook: {group}")]
    GroupNotFound { group: String },

    /// The gradebook has no column with the expected header label
    #[error("column not found in gradebook: {label}")]
    ColumnNotFound { label: String },

    /// No gradebook row matches the student's full name
    #[error("student not found in gradebook: {full_name}")]
    StudentNotFound { full_name: String },

    /// No gradebook row carries this hosting username
    #[error("username not registered in gradebook: {username}")]
    UsernameNotRegistered { username: String },

    /// The hosting service has no account with this login
    #[error("unknown hosting account: {username}")]
    UnknownHostUser { username: String },

    /// A different username is already recorded for this student
    #[error("a different account is already registered for this student; contact the instructor")]
    RegistrationConflict,

    /// Source-hosting service failure
    #[error(transparent)]
    Host(#[from] HostError),

    /// Spreadsheet service failure
    #[error(transparent)]
    Sheet(#[from] SheetError),
}
