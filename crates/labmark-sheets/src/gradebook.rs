//! Gradebook row/column resolution and the idempotent cell write.

use std::sync::Arc;

use tracing::debug;

use crate::client::SheetStore;
use crate::Result;

/// Row holding the column labels ("GitHub", lab short names).
pub const HEADER_ROW: u32 = 1;

/// First row holding student data; rows 1 and 2 are headers.
pub const FIRST_DATA_ROW: u32 = 3;

/// Outcome of a conditional cell write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The cell was empty and now holds the new value.
    Written,

    /// The cell already held a value; nothing was written.
    Occupied { existing: String },
}

/// One group worksheet of a course gradebook.
///
/// Lookups are linear scans with first-match-wins semantics. The scan is
/// an implementation detail behind this layer, not part of its contract.
pub struct Gradebook {
    store: Arc<dyn SheetStore>,
    spreadsheet_id: String,
    worksheet: String,
}

impl Gradebook {
    /// Open a group worksheet inside a spreadsheet.
    pub fn new(store: Arc<dyn SheetStore>, spreadsheet_id: &str, worksheet: &str) -> Self {
        Gradebook {
            store,
            spreadsheet_id: spreadsheet_id.to_string(),
            worksheet: worksheet.to_string(),
        }
    }

    /// Worksheet title this gradebook is bound to.
    pub fn worksheet(&self) -> &str {
        &self.worksheet
    }

    /// Find the 1-based row of a student by exact full-name match in the
    /// given column. The two header rows are skipped; the first match wins.
    pub async fn find_student_row(&self, name_column: u32, full_name: &str) -> Result<Option<u32>> {
        self.find_row_by_value(name_column, full_name).await
    }

    /// Find the 1-based row whose cell in `column` equals `value` exactly,
    /// skipping the header rows.
    pub async fn find_row_by_value(&self, column: u32, value: &str) -> Result<Option<u32>> {
        let values = self
            .store
            .col_values(&self.spreadsheet_id, &self.worksheet, column)
            .await?;

        let skip = (FIRST_DATA_ROW - 1) as usize;
        Ok(values
            .iter()
            .skip(skip)
            .position(|cell| cell == value)
            .map(|idx| idx as u32 + FIRST_DATA_ROW))
    }

    /// Find the 1-based column whose header-row cell equals `label` exactly.
    pub async fn find_column(&self, label: &str) -> Result<Option<u32>> {
        let header = self
            .store
            .row_values(&self.spreadsheet_id, &self.worksheet, HEADER_ROW)
            .await?;

        Ok(header
            .iter()
            .position(|cell| cell == label)
            .map(|idx| idx as u32 + 1))
    }

    /// Read a single cell; empty string means the cell is empty.
    pub async fn read_cell(&self, row: u32, col: u32) -> Result<String> {
        self.store
            .read_cell(&self.spreadsheet_id, &self.worksheet, row, col)
            .await
    }

    /// Write `value` into the cell only if it is currently empty.
    ///
    /// This is the idempotence guard for grade cells: once a verdict is
    /// recorded, repeated calls never mutate the sheet. The caller decides
    /// whether an occupied cell with a different value is a conflict.
    pub async fn write_if_empty(&self, row: u32, col: u32, value: &str) -> Result<WriteOutcome> {
        let existing = self.read_cell(row, col).await?;
        if !existing.trim().is_empty() {
            debug!(
                worksheet = %self.worksheet,
                row,
                col,
                existing = %existing,
                "cell already occupied, skipping write"
            );
            return Ok(WriteOutcome::Occupied { existing });
        }

        self.store
            .write_cell(&self.spreadsheet_id, &self.worksheet, row, col, value)
            .await?;
        Ok(WriteOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemorySheetStore;

    fn gradebook_with_rows(rows: Vec<Vec<&str>>) -> Gradebook {
        let store = Arc::new(MemorySheetStore::new());
        store.set_worksheet(
            "sheet-1",
            "A-21",
            rows.into_iter()
                .map(|row| row.into_iter().map(String::from).collect())
                .collect(),
        );
        Gradebook::new(store, "sheet-1", "A-21")
    }

    #[tokio::test]
    async fn test_find_student_row_skips_headers() {
        // "Ivanov Ivan" in the header rows must not match; only the data
        // row starting at row 3 counts.
        let gradebook = gradebook_with_rows(vec![
            vec!["N", "Student", "GitHub"],
            vec!["", "Ivanov Ivan", ""],
            vec!["1", "Ivanov Ivan", "ivanov"],
            vec!["2", "Petrova Anna", "apetrova"],
        ]);

        let row = gradebook.find_student_row(2, "Ivanov Ivan").await.unwrap();
        assert_eq!(row, Some(3));

        let row = gradebook.find_student_row(2, "Petrova Anna").await.unwrap();
        assert_eq!(row, Some(4));
    }

    #[tokio::test]
    async fn test_find_student_row_exact_match_only() {
        let gradebook = gradebook_with_rows(vec![
            vec!["N", "Student"],
            vec!["", ""],
            vec!["1", "Ivanov Ivan Petrovich"],
        ]);

        assert_eq!(
            gradebook.find_student_row(2, "Ivanov Ivan").await.unwrap(),
            None
        );
        assert_eq!(
            gradebook
                .find_student_row(2, "Ivanov Ivan Petrovich")
                .await
                .unwrap(),
            Some(3)
        );
    }

    #[tokio::test]
    async fn test_find_column_on_header_row() {
        let gradebook = gradebook_with_rows(vec![vec!["N", "Student", "GitHub", "LB1"]]);

        assert_eq!(gradebook.find_column("GitHub").await.unwrap(), Some(3));
        assert_eq!(gradebook.find_column("LB1").await.unwrap(), Some(4));
        assert_eq!(gradebook.find_column("Missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_if_empty_writes_once() {
        let gradebook = gradebook_with_rows(vec![
            vec!["N", "Student"],
            vec!["", ""],
            vec!["1", "Ivanov Ivan"],
        ]);

        let outcome = gradebook.write_if_empty(3, 5, "✓").await.unwrap();
        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(gradebook.read_cell(3, 5).await.unwrap(), "✓");

        // Second write is a no-op and reports the existing value.
        let outcome = gradebook.write_if_empty(3, 5, "✗").await.unwrap();
        assert_eq!(
            outcome,
            WriteOutcome::Occupied {
                existing: "✓".to_string()
            }
        );
        assert_eq!(gradebook.read_cell(3, 5).await.unwrap(), "✓");
    }

    #[tokio::test]
    async fn test_whitespace_only_cell_counts_as_empty() {
        let gradebook = gradebook_with_rows(vec![
            vec!["N", "Student"],
            vec!["", ""],
            vec!["1", "Ivanov Ivan", "", "  "],
        ]);

        let outcome = gradebook.write_if_empty(3, 4, "✓").await.unwrap();
        assert_eq!(outcome, WriteOutcome::Written);
    }
}
