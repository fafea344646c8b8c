//! Course descriptors and the provider that loads them.
//!
//! A course lives in one YAML file. The descriptor names the hosting
//! organization, the gradebook spreadsheet and its column layout, and one
//! entry per lab with the repository prefix, required files, and protected
//! test paths.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::GradeError;
use crate::Result;

fn default_student_name_column() -> u32 {
    2
}

fn default_lab_column_offset() -> u32 {
    1
}

/// Hosting-service section of a course descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GithubSection {
    /// Organization that owns the per-student submission repositories.
    #[serde(default)]
    pub organization: Option<String>,
}

/// Gradebook section of a course descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GoogleSection {
    /// Spreadsheet identifier of the gradebook.
    #[serde(default)]
    pub spreadsheet: Option<String>,

    /// Worksheet holding course metadata rather than a student group.
    #[serde(default)]
    pub info_sheet: Option<String>,

    /// 1-based column holding student full names.
    #[serde(default = "default_student_name_column")]
    pub student_name_column: u32,

    /// Offset added to the lab number when computing a lab's column.
    #[serde(default = "default_lab_column_offset")]
    pub lab_column_offset: u32,
}

impl Default for GoogleSection {
    fn default() -> Self {
        GoogleSection {
            spreadsheet: None,
            info_sheet: None,
            student_name_column: default_student_name_column(),
            lab_column_offset: default_lab_column_offset(),
        }
    }
}

/// One lab entry of a course descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LabSpec {
    /// Short display name, matching the gradebook column header.
    #[serde(default)]
    pub short_name: Option<String>,

    /// Repository name prefix; the submission repo is `{prefix}-{username}`.
    #[serde(default)]
    pub github_prefix: Option<String>,

    /// Paths that must exist in the submission repository.
    #[serde(default)]
    pub files: Vec<String>,

    /// Protected test paths. A trailing `/` marks a directory prefix;
    /// everything else is an exact file path.
    #[serde(default)]
    pub tests: Vec<String>,
}

/// A loaded course descriptor, immutable within a request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Course {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Semester label.
    #[serde(default)]
    pub semester: Option<String>,

    #[serde(default)]
    pub github: GithubSection,

    #[serde(default)]
    pub google: GoogleSection,

    /// Labs keyed by decimal lab number ("1", "2", ...).
    #[serde(default)]
    pub labs: BTreeMap<String, LabSpec>,
}

#[derive(Debug, Deserialize)]
struct CourseFile {
    course: Course,
}

impl Course {
    /// Hosting organization, or `ConfigurationMissing`.
    pub fn organization(&self) -> Result<&str> {
        self.github
            .organization
            .as_deref()
            .filter(|org| !org.is_empty())
            .ok_or_else(|| GradeError::ConfigurationMissing {
                detail: "github.organization is not set".to_string(),
            })
    }

    /// Gradebook spreadsheet id, or `ConfigurationMissing`.
    pub fn spreadsheet_id(&self) -> Result<&str> {
        self.google
            .spreadsheet
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GradeError::ConfigurationMissing {
                detail: "google.spreadsheet is not set".to_string(),
            })
    }

    /// Lab entry for a parsed lab number.
    pub fn lab(&self, number: u32) -> Option<&LabSpec> {
        self.labs.get(&number.to_string())
    }

    /// Parse a descriptor from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let file: CourseFile =
            serde_yaml::from_str(text).map_err(|e| GradeError::ConfigurationMissing {
                detail: format!("invalid course descriptor: {e}"),
            })?;
        Ok(file.course)
    }
}

/// Supplies course descriptors by opaque course id.
#[async_trait]
pub trait CourseProvider: Send + Sync {
    /// Load the course for an opaque id. Descriptors are re-read on every
    /// call; a course is immutable only within one request.
    async fn get_course(&self, course_id: &str) -> Result<Course>;
}

/// `CourseProvider` over a directory of YAML files.
///
/// The opaque course id is a 1-based index into the filename-sorted list
/// of `*.yaml` files in the directory.
pub struct YamlCourseStore {
    dir: PathBuf,
}

impl YamlCourseStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        YamlCourseStore { dir: dir.into() }
    }

    fn descriptor_files(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            GradeError::ConfigurationMissing {
                detail: format!("cannot read courses directory {}: {e}", self.dir.display()),
            }
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().is_some_and(|ext| ext == "yaml")
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl CourseProvider for YamlCourseStore {
    async fn get_course(&self, course_id: &str) -> Result<Course> {
        let index: usize = course_id
            .parse()
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| GradeError::CourseNotFound {
                course_id: course_id.to_string(),
            })?;

        let files = self.descriptor_files()?;
        let path = files
            .get(index - 1)
            .ok_or_else(|| GradeError::CourseNotFound {
                course_id: course_id.to_string(),
            })?;

        debug!(course_id = %course_id, path = %path.display(), "loading course descriptor");

        let text = std::fs::read_to_string(path).map_err(|e| GradeError::ConfigurationMissing {
            detail: format!("cannot read {}: {e}", path.display()),
        })?;
        Course::from_yaml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"
course:
  name: "Operating Systems"
  semester: "Spring 2026"
  github:
    organization: "os-course"
  google:
    spreadsheet: "spread-1"
    info-sheet: "Info"
    student-name-column: 2
    lab-column-offset: 1
  labs:
    "1":
      short-name: "LB1"
      github-prefix: "os-lab1"
      files:
        - "src/main.c"
        - "Makefile"
      tests:
        - "tests/test_main.c"
        - "tests/data/"
"#;

    #[test]
    fn test_parse_descriptor() {
        let course = Course::from_yaml(DESCRIPTOR).unwrap();
        assert_eq!(course.name.as_deref(), Some("Operating Systems"));
        assert_eq!(course.organization().unwrap(), "os-course");
        assert_eq!(course.spreadsheet_id().unwrap(), "spread-1");
        assert_eq!(course.google.student_name_column, 2);
        assert_eq!(course.google.lab_column_offset, 1);

        let lab = course.lab(1).expect("lab 1 should exist");
        assert_eq!(lab.github_prefix.as_deref(), Some("os-lab1"));
        assert_eq!(lab.files, vec!["src/main.c", "Makefile"]);
        assert_eq!(lab.tests, vec!["tests/test_main.c", "tests/data/"]);
        assert!(course.lab(2).is_none());
    }

    #[test]
    fn test_column_layout_defaults() {
        let course = Course::from_yaml(
            "course:\n  github:\n    organization: org\n  google:\n    spreadsheet: s\n",
        )
        .unwrap();
        assert_eq!(course.google.student_name_column, 2);
        assert_eq!(course.google.lab_column_offset, 1);
    }

    #[test]
    fn test_missing_sections_are_typed_errors() {
        let course = Course::from_yaml("course:\n  name: bare\n").unwrap();
        assert!(matches!(
            course.organization(),
            Err(GradeError::ConfigurationMissing { .. })
        ));
        assert!(matches!(
            course.spreadsheet_id(),
            Err(GradeError::ConfigurationMissing { .. })
        ));
    }

    #[test]
    fn test_invalid_yaml_is_configuration_missing() {
        let err = Course::from_yaml("course: [not a mapping").unwrap_err();
        assert!(matches!(err, GradeError::ConfigurationMissing { .. }));
    }

    #[tokio::test]
    async fn test_store_resolves_sorted_one_based_ids() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b-networks.yaml"),
            "course:\n  name: Networks\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a-os.yaml"),
            "course:\n  name: Operating Systems\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a course").unwrap();

        let store = YamlCourseStore::new(dir.path());

        let first = store.get_course("1").await.unwrap();
        assert_eq!(first.name.as_deref(), Some("Operating Systems"));

        let second = store.get_course("2").await.unwrap();
        assert_eq!(second.name.as_deref(), Some("Networks"));
    }

    #[tokio::test]
    async fn test_store_rejects_unknown_ids() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.yaml"), "course:\n  name: A\n").unwrap();

        let store = YamlCourseStore::new(dir.path());

        for id in ["0", "2", "nope", ""] {
            let err = store.get_course(id).await.unwrap_err();
            assert!(
                matches!(err, GradeError::CourseNotFound { .. }),
                "id {id:?} should be CourseNotFound"
            );
        }
    }
}
