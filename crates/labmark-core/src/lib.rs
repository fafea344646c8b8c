//! Labmark Core - submission verification and grading
//!
//! Orchestrates the end-to-end grading decision for one (student, lab)
//! pair: resolve the course descriptor, inspect the submission repository
//! for required artifacts and CI results, enforce the anti-tampering rule
//! on protected test files, aggregate check runs into a verdict, and
//! record that verdict into the gradebook exactly once.
//!
//! External services are reached through trait seams (`RepoHost`,
//! `SheetStore`, `CourseProvider`) so the whole pipeline runs against
//! in-memory fakes in tests.

pub mod checks;
pub mod course;
pub mod error;
pub mod lab;
pub mod pipeline;
pub mod student;
pub mod tamper;

// Re-export key types
pub use checks::{CheckReport, Verdict};
pub use course::{Course, CourseProvider, LabSpec, YamlCourseStore};
pub use error::GradeError;
pub use lab::parse_lab_number;
pub use pipeline::{FilesChecked, GradeOutcome, GradePipeline, GradeReport, RegisterOutcome};
pub use student::Student;
pub use tamper::TamperGate;

/// Result type for grading operations
pub type Result<T> = std::result::Result<T, GradeError>;
