//! Anti-tampering rule for protected test files.

use labmark_hosting::ChangedFile;

/// Protected-path evaluation for the latest submission commit.
pub struct TamperGate;

impl TamperGate {
    /// Collect protected-path violations from a commit's changed files.
    ///
    /// The rule applies only when the commit author's login matches the
    /// submitting student's username (case-insensitive); commits authored
    /// by others (CI bots, instructors) are exempt. For a self-authored
    /// commit, a changed file with status modified or removed violates the
    /// policy when its path exactly equals a protected file path, or
    /// starts with a protected directory prefix (a protected path with a
    /// trailing `/`).
    ///
    /// Returns the violated paths in commit order; non-empty means the
    /// grading request must abort without a cell write.
    pub fn evaluate(
        protected: &[String],
        changes: &[ChangedFile],
        author_login: Option<&str>,
        submitter: &str,
    ) -> Vec<String> {
        let self_authored = author_login
            .map(|author| author.eq_ignore_ascii_case(submitter))
            .unwrap_or(false);
        if !self_authored {
            return Vec::new();
        }

        changes
            .iter()
            .filter(|change| change.status.is_destructive())
            .filter(|change| {
                protected.iter().any(|path| {
                    match path.strip_suffix('/') {
                        Some(dir) => change.path.starts_with(&format!("{dir}/")),
                        None => change.path == *path,
                    }
                })
            })
            .map(|change| change.path.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labmark_hosting::FileStatus;

    fn change(path: &str, status: FileStatus) -> ChangedFile {
        ChangedFile {
            path: path.to_string(),
            status,
        }
    }

    fn protected() -> Vec<String> {
        vec!["tests/test_main.c".to_string(), "tests/data/".to_string()]
    }

    #[test]
    fn test_modified_protected_file_is_flagged() {
        let violations = TamperGate::evaluate(
            &protected(),
            &[change("tests/test_main.c", FileStatus::Modified)],
            Some("alice"),
            "alice",
        );
        assert_eq!(violations, vec!["tests/test_main.c"]);
    }

    #[test]
    fn test_removed_file_in_protected_dir_is_flagged() {
        let violations = TamperGate::evaluate(
            &protected(),
            &[change("tests/data/case1.txt", FileStatus::Removed)],
            Some("alice"),
            "alice",
        );
        assert_eq!(violations, vec!["tests/data/case1.txt"]);
    }

    #[test]
    fn test_directory_prefix_requires_separator() {
        // "tests/data-extra" is a sibling of the protected directory, not
        // inside it.
        let violations = TamperGate::evaluate(
            &protected(),
            &[change("tests/data-extra/case1.txt", FileStatus::Modified)],
            Some("alice"),
            "alice",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_added_files_are_not_violations() {
        let violations = TamperGate::evaluate(
            &protected(),
            &[change("tests/data/new_case.txt", FileStatus::Added)],
            Some("alice"),
            "alice",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_foreign_author_is_exempt() {
        let violations = TamperGate::evaluate(
            &protected(),
            &[change("tests/test_main.c", FileStatus::Removed)],
            Some("instructor"),
            "alice",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_unattributed_author_is_exempt() {
        let violations = TamperGate::evaluate(
            &protected(),
            &[change("tests/test_main.c", FileStatus::Removed)],
            None,
            "alice",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_author_match_is_case_insensitive() {
        let violations = TamperGate::evaluate(
            &protected(),
            &[change("tests/test_main.c", FileStatus::Modified)],
            Some("Alice"),
            "alice",
        );
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_violations_keep_commit_order() {
        let violations = TamperGate::evaluate(
            &protected(),
            &[
                change("tests/data/b.txt", FileStatus::Modified),
                change("src/main.c", FileStatus::Modified),
                change("tests/test_main.c", FileStatus::Removed),
            ],
            Some("alice"),
            "alice",
        );
        assert_eq!(violations, vec!["tests/data/b.txt", "tests/test_main.c"]);
    }
}
