//! Student identity.

use serde::{Deserialize, Serialize};

/// A student registering their hosting account for a course group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Family name.
    pub surname: String,

    /// Given name.
    pub name: String,

    /// Patronymic; empty when the student has none.
    #[serde(default)]
    pub patronymic: String,

    /// Hosting-service username to record in the gradebook.
    pub github: String,
}

impl Student {
    /// Full name as recorded in the gradebook name column:
    /// surname, given name, and patronymic joined by single spaces, with
    /// empty parts dropped.
    pub fn full_name(&self) -> String {
        [&self.surname, &self.name, &self.patronymic]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(surname: &str, name: &str, patronymic: &str) -> Student {
        Student {
            surname: surname.to_string(),
            name: name.to_string(),
            patronymic: patronymic.to_string(),
            github: "login".to_string(),
        }
    }

    #[test]
    fn test_full_name_with_patronymic() {
        assert_eq!(
            student("Ivanov", "Ivan", "Petrovich").full_name(),
            "Ivanov Ivan Petrovich"
        );
    }

    #[test]
    fn test_full_name_without_patronymic() {
        assert_eq!(student("Ivanov", "Ivan", "").full_name(), "Ivanov Ivan");
    }

    #[test]
    fn test_full_name_trims_stray_whitespace() {
        assert_eq!(
            student(" Ivanov ", "Ivan", " ").full_name(),
            "Ivanov Ivan"
        );
    }
}
