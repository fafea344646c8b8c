//! Grading pipeline orchestration.
//!
//! One `grade` call is a single deterministic pass: every step either
//! continues the sequence or exits with a typed error, and the gradebook
//! cell is only touched after the verdict is fully computed. `register`
//! records a student's hosting username with the same write-once cell
//! discipline.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use labmark_hosting::RepoHost;
use labmark_sheets::{Gradebook, SheetError, SheetStore, WriteOutcome};

use crate::checks::{CheckReport, Verdict};
use crate::course::CourseProvider;
use crate::error::GradeError;
use crate::lab::parse_lab_number;
use crate::student::Student;
use crate::tamper::TamperGate;
use crate::Result;

/// Header label of the gradebook column holding hosting usernames.
const GITHUB_COLUMN_LABEL: &str = "GitHub";

/// Repository path that must exist for CI to be considered configured.
const WORKFLOWS_DIR: &str = ".github/workflows";

/// Outcome of a registration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterOutcome {
    /// The username was recorded into the student's row.
    Registered,

    /// The identical username was already recorded; nothing changed.
    AlreadyRegistered,
}

impl RegisterOutcome {
    /// Human-readable response message.
    pub fn message(&self) -> &'static str {
        match self {
            RegisterOutcome::Registered => "hosting account recorded",
            RegisterOutcome::AlreadyRegistered => {
                "this hosting account was already recorded for this student"
            }
        }
    }
}

/// File sets the pipeline verified before grading.
#[derive(Debug, Clone, Serialize)]
pub struct FilesChecked {
    /// Required submission files.
    pub required: Vec<String>,

    /// Protected test paths.
    pub tests: Vec<String>,
}

/// Response body for a completed grading request.
#[derive(Debug, Clone, Serialize)]
pub struct GradeReport {
    /// Final verdict.
    pub verdict: Verdict,

    /// Verdict symbol as written to the cell.
    pub symbol: String,

    /// Fraction of passed checks, e.g. "2/2".
    pub passed_fraction: String,

    /// One line per check run.
    pub checks: Vec<String>,

    /// File sets that were verified.
    pub files_checked: FilesChecked,

    /// Whether this request performed the cell write. `false` means the
    /// cell already held a verdict and was left untouched.
    pub cell_written: bool,
}

/// Outcome of a grading request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeOutcome {
    /// Verdict computed; the cell holds it (written now or previously).
    Updated(GradeReport),

    /// No check runs exist yet for the latest commit; nothing recorded.
    Pending,
}

/// End-to-end verification and grading over external collaborators.
pub struct GradePipeline {
    courses: Arc<dyn CourseProvider>,
    host: Arc<dyn RepoHost>,
    sheets: Arc<dyn SheetStore>,
}

impl GradePipeline {
    pub fn new(
        courses: Arc<dyn CourseProvider>,
        host: Arc<dyn RepoHost>,
        sheets: Arc<dyn SheetStore>,
    ) -> Self {
        GradePipeline {
            courses,
            host,
            sheets,
        }
    }

    /// Record a student's hosting username in the gradebook.
    ///
    /// Registration resolves the student's row by exact full-name match,
    /// verifies the hosting account exists, and writes the username only
    /// if the cell is empty. Re-registering the same username is an
    /// idempotent no-op; a different username is a conflict and the stored
    /// identity stays unchanged.
    pub async fn register(
        &self,
        course_id: &str,
        group_id: &str,
        student: &Student,
    ) -> Result<RegisterOutcome> {
        let request_id = Uuid::new_v4();
        let full_name = student.full_name();
        info!(
            request_id = %request_id,
            course_id,
            group_id,
            username = %student.github,
            "registration started"
        );

        let course = self.courses.get_course(course_id).await?;
        let spreadsheet_id = course.spreadsheet_id()?;
        let gradebook = Gradebook::new(self.sheets.clone(), spreadsheet_id, group_id);

        let row = gradebook
            .find_student_row(course.google.student_name_column, &full_name)
            .await
            .map_err(|e| group_error(e, group_id))?
            .ok_or_else(|| GradeError::StudentNotFound {
                full_name: full_name.clone(),
            })?;

        let github_col = gradebook
            .find_column(GITHUB_COLUMN_LABEL)
            .await
            .map_err(|e| group_error(e, group_id))?
            .ok_or_else(|| GradeError::ColumnNotFound {
                label: GITHUB_COLUMN_LABEL.to_string(),
            })?;

        if !self.host.user_exists(&student.github).await? {
            return Err(GradeError::UnknownHostUser {
                username: student.github.clone(),
            });
        }

        let outcome = gradebook
            .write_if_empty(row, github_col, &student.github)
            .await
            .map_err(|e| group_error(e, group_id))?;

        match outcome {
            WriteOutcome::Written => {
                info!(request_id = %request_id, row, col = github_col, "username recorded");
                Ok(RegisterOutcome::Registered)
            }
            WriteOutcome::Occupied { existing } if existing == student.github => {
                Ok(RegisterOutcome::AlreadyRegistered)
            }
            WriteOutcome::Occupied { .. } => Err(GradeError::RegistrationConflict),
        }
    }

    /// Verify a submission and record its verdict.
    ///
    /// The full state machine: parse the lab id, resolve course and lab
    /// config, verify required and test files exist, verify CI is
    /// configured, fetch the latest commit, run the tamper gate, aggregate
    /// check runs, resolve the gradebook cell, and write the verdict if
    /// the cell is empty. Early exits never write.
    pub async fn grade(
        &self,
        course_id: &str,
        group_id: &str,
        lab_id: &str,
        username: &str,
    ) -> Result<GradeOutcome> {
        // Reject malformed lab ids before any external call is made.
        let lab_number = parse_lab_number(lab_id)?;

        let request_id = Uuid::new_v4();
        info!(
            request_id = %request_id,
            course_id,
            group_id,
            lab = lab_number,
            username,
            "grading started"
        );

        let course = self.courses.get_course(course_id).await?;
        let org = course.organization()?;
        let spreadsheet_id = course.spreadsheet_id()?;
        let lab = course
            .lab(lab_number)
            .ok_or_else(|| GradeError::ConfigurationMissing {
                detail: format!("lab {lab_number} is not defined for this course"),
            })?;
        let prefix = lab
            .github_prefix
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| GradeError::ConfigurationMissing {
                detail: format!("lab {lab_number} has no github-prefix"),
            })?;
        let repo = format!("{prefix}-{username}");

        let missing = self.missing_files(org, &repo, &lab.files).await?;
        if !missing.is_empty() {
            return Err(GradeError::RequiredFilesMissing { paths: missing });
        }

        let missing = self.missing_files(org, &repo, &lab.tests).await?;
        if !missing.is_empty() {
            return Err(GradeError::TestFilesMissing { paths: missing });
        }

        if !self.host.file_exists(org, &repo, WORKFLOWS_DIR).await? {
            return Err(GradeError::CiConfigurationMissing);
        }

        let commit = self
            .host
            .latest_commit(org, &repo)
            .await?
            .ok_or(GradeError::NoCommits)?;
        info!(
            request_id = %request_id,
            sha = %commit.sha,
            author = commit.author_login.as_deref().unwrap_or("unknown"),
            "latest commit resolved"
        );

        let changes = self.host.commit_files(org, &repo, &commit.sha).await?;
        let violations = TamperGate::evaluate(
            &lab.tests,
            &changes,
            commit.author_login.as_deref(),
            username,
        );
        if !violations.is_empty() {
            warn!(
                request_id = %request_id,
                sha = %commit.sha,
                violations = violations.len(),
                "protected files modified, grading aborted"
            );
            return Err(GradeError::TamperDetected { paths: violations });
        }

        let runs = self
            .host
            .check_runs(org, &repo, &commit.sha)
            .await
            .map_err(|e| {
                warn!(request_id = %request_id, error = %e, "check-run fetch failed");
                GradeError::ChecksUnavailable
            })?;
        if runs.is_empty() {
            info!(request_id = %request_id, "no check runs yet, verdict pending");
            return Ok(GradeOutcome::Pending);
        }

        let report = CheckReport::from_runs(&runs);
        let verdict = report.verdict();

        let gradebook = Gradebook::new(self.sheets.clone(), spreadsheet_id, group_id);
        let github_col = gradebook
            .find_column(GITHUB_COLUMN_LABEL)
            .await
            .map_err(|e| group_error(e, group_id))?
            .ok_or_else(|| GradeError::ColumnNotFound {
                label: GITHUB_COLUMN_LABEL.to_string(),
            })?;
        let row = gradebook
            .find_row_by_value(github_col, username)
            .await
            .map_err(|e| group_error(e, group_id))?
            .ok_or_else(|| GradeError::UsernameNotRegistered {
                username: username.to_string(),
            })?;

        let col = course.google.student_name_column + lab_number + course.google.lab_column_offset;
        let outcome = gradebook
            .write_if_empty(row, col, verdict.symbol())
            .await
            .map_err(|e| group_error(e, group_id))?;

        let cell_written = matches!(outcome, WriteOutcome::Written);
        if let WriteOutcome::Occupied { existing } = &outcome {
            if existing != verdict.symbol() {
                warn!(
                    request_id = %request_id,
                    row,
                    col,
                    existing = %existing,
                    computed = verdict.symbol(),
                    "cell already holds a different verdict, leaving it untouched"
                );
            }
        }

        info!(
            request_id = %request_id,
            row,
            col,
            verdict = verdict.symbol(),
            fraction = %report.fraction(),
            cell_written,
            "grading finished"
        );

        Ok(GradeOutcome::Updated(GradeReport {
            verdict,
            symbol: verdict.symbol().to_string(),
            passed_fraction: report.fraction(),
            checks: report.summary,
            files_checked: FilesChecked {
                required: lab.files.clone(),
                tests: lab.tests.clone(),
            },
            cell_written,
        }))
    }

    /// Check a set of paths for existence, concurrently, and return the
    /// missing subset in the order the paths were configured.
    async fn missing_files(&self, org: &str, repo: &str, paths: &[String]) -> Result<Vec<String>> {
        let probes = paths.iter().map(|path| {
            let host = self.host.clone();
            async move { host.file_exists(org, repo, path).await.map(|ok| (path, ok)) }
        });

        let mut missing = Vec::new();
        for result in futures::future::join_all(probes).await {
            let (path, exists) = result?;
            if !exists {
                missing.push(path.clone());
            }
        }
        Ok(missing)
    }
}

/// A missing worksheet means the requested group does not exist.
fn group_error(err: SheetError, group: &str) -> GradeError {
    match err {
        SheetError::WorksheetNotFound { .. } => GradeError::GroupNotFound {
            group: group.to_string(),
        },
        other => GradeError::Sheet(other),
    }
}
