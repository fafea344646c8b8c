//! The `SheetStore` trait - what the gradebook layer needs from a
//! spreadsheet service.

use async_trait::async_trait;

use crate::Result;

/// Minimal spreadsheet access.
///
/// Rows and columns are 1-based throughout, matching how spreadsheet
/// services number them. An empty cell reads as an empty string.
///
/// Guarantees:
/// - `row_values`/`col_values` return values up to the last non-empty
///   cell; trailing empty cells are not included.
/// - Operations on a worksheet that does not exist fail with
///   `SheetError::WorksheetNotFound`.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Whether a worksheet with this title exists in the spreadsheet.
    async fn worksheet_exists(&self, spreadsheet_id: &str, worksheet: &str) -> Result<bool>;

    /// All values of a row, left to right.
    async fn row_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: u32,
    ) -> Result<Vec<String>>;

    /// All values of a column, top to bottom.
    async fn col_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        col: u32,
    ) -> Result<Vec<String>>;

    /// Value of a single cell; empty string if the cell is empty.
    async fn read_cell(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: u32,
        col: u32,
    ) -> Result<String>;

    /// Overwrite a single cell.
    async fn write_cell(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: u32,
        col: u32,
        value: &str,
    ) -> Result<()>;
}
