//! In-memory fake for the `SheetStore` trait (testing only)
//!
//! `MemorySheetStore` keeps each worksheet as a dense grid of strings and
//! mirrors the trait contract of the live service: 1-based coordinates,
//! trailing empty cells trimmed from row/column reads, `WorksheetNotFound`
//! for unknown titles.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::SheetStore;
use crate::{Result, SheetError};

type Grid = Vec<Vec<String>>;

#[derive(Default)]
struct SheetState {
    /// spreadsheet id -> worksheet title -> grid
    spreadsheets: HashMap<String, HashMap<String, Grid>>,
    writes: u64,
}

/// In-memory spreadsheet service.
#[derive(Default)]
pub struct MemorySheetStore {
    state: Mutex<SheetState>,
}

fn trim_trailing_empty(mut values: Vec<String>) -> Vec<String> {
    while values.last().is_some_and(|v| v.is_empty()) {
        values.pop();
    }
    values
}

impl MemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a worksheet with the given rows (row 1 first).
    pub fn set_worksheet(&self, spreadsheet_id: &str, title: &str, rows: Grid) {
        let mut state = self.state.lock().unwrap();
        state
            .spreadsheets
            .entry(spreadsheet_id.to_string())
            .or_default()
            .insert(title.to_string(), rows);
    }

    /// Number of write operations performed. Lets tests assert that a
    /// failed grading request never touched the sheet.
    pub fn writes(&self) -> u64 {
        self.state.lock().unwrap().writes
    }

    fn with_grid<T>(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        f: impl FnOnce(&Grid) -> T,
    ) -> Result<T> {
        let state = self.state.lock().unwrap();
        let grid = state
            .spreadsheets
            .get(spreadsheet_id)
            .and_then(|sheets| sheets.get(worksheet))
            .ok_or_else(|| SheetError::WorksheetNotFound {
                title: worksheet.to_string(),
            })?;
        Ok(f(grid))
    }
}

#[async_trait]
impl SheetStore for MemorySheetStore {
    async fn worksheet_exists(&self, spreadsheet_id: &str, worksheet: &str) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state
            .spreadsheets
            .get(spreadsheet_id)
            .is_some_and(|sheets| sheets.contains_key(worksheet)))
    }

    async fn row_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: u32,
    ) -> Result<Vec<String>> {
        self.with_grid(spreadsheet_id, worksheet, |grid| {
            trim_trailing_empty(grid.get((row - 1) as usize).cloned().unwrap_or_default())
        })
    }

    async fn col_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        col: u32,
    ) -> Result<Vec<String>> {
        self.with_grid(spreadsheet_id, worksheet, |grid| {
            let idx = (col - 1) as usize;
            trim_trailing_empty(
                grid.iter()
                    .map(|row| row.get(idx).cloned().unwrap_or_default())
                    .collect(),
            )
        })
    }

    async fn read_cell(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: u32,
        col: u32,
    ) -> Result<String> {
        self.with_grid(spreadsheet_id, worksheet, |grid| {
            grid.get((row - 1) as usize)
                .and_then(|r| r.get((col - 1) as usize))
                .cloned()
                .unwrap_or_default()
        })
    }

    async fn write_cell(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: u32,
        col: u32,
        value: &str,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let grid = state
            .spreadsheets
            .get_mut(spreadsheet_id)
            .and_then(|sheets| sheets.get_mut(worksheet))
            .ok_or_else(|| SheetError::WorksheetNotFound {
                title: worksheet.to_string(),
            })?;

        let row_idx = (row - 1) as usize;
        let col_idx = (col - 1) as usize;
        if grid.len() <= row_idx {
            grid.resize(row_idx + 1, Vec::new());
        }
        let row = &mut grid[row_idx];
        if row.len() <= col_idx {
            row.resize(col_idx + 1, String::new());
        }
        row[col_idx] = value.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_worksheet_is_an_error() {
        let store = MemorySheetStore::new();
        store.set_worksheet("sheet-1", "A-21", vec![]);

        let err = store.col_values("sheet-1", "B-22", 1).await.unwrap_err();
        assert!(matches!(err, SheetError::WorksheetNotFound { .. }));
    }

    #[tokio::test]
    async fn test_col_values_trims_trailing_empties() {
        let store = MemorySheetStore::new();
        store.set_worksheet(
            "sheet-1",
            "A-21",
            vec![
                vec!["a".to_string(), "x".to_string()],
                vec!["b".to_string()],
                vec!["".to_string(), "y".to_string()],
            ],
        );

        assert_eq!(
            store.col_values("sheet-1", "A-21", 1).await.unwrap(),
            vec!["a", "b"]
        );
        assert_eq!(
            store.col_values("sheet-1", "A-21", 2).await.unwrap(),
            vec!["x", "", "y"]
        );
    }

    #[tokio::test]
    async fn test_write_cell_grows_grid() {
        let store = MemorySheetStore::new();
        store.set_worksheet("sheet-1", "A-21", vec![]);

        store.write_cell("sheet-1", "A-21", 5, 5, "✓").await.unwrap();
        assert_eq!(store.read_cell("sheet-1", "A-21", 5, 5).await.unwrap(), "✓");
        assert_eq!(store.read_cell("sheet-1", "A-21", 1, 1).await.unwrap(), "");
        assert_eq!(store.writes(), 1);
    }
}
