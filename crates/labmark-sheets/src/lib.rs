//! Labmark Sheets - spreadsheet-backed gradebook access
//!
//! The gradebook is a spreadsheet with one worksheet per student group:
//! two header rows, then one row per student; one column holds full names,
//! one holds hosting-service usernames, and one column per lab holds the
//! recorded verdict.
//!
//! ## Key components
//!
//! - `SheetStore`: minimal async trait over the spreadsheet service
//! - `GoogleSheetsClient`: Sheets v4 REST implementation
//! - `Gradebook`: row/column resolution and the idempotent cell write
//!
//! In-memory fakes are provided for testing via the `fakes` module.

mod client;
mod error;
pub mod fakes;
mod google;
mod gradebook;

pub use client::SheetStore;
pub use error::SheetError;
pub use google::{GoogleSheetsClient, GoogleSheetsConfig};
pub use gradebook::{Gradebook, WriteOutcome, FIRST_DATA_ROW, HEADER_ROW};

/// Result type for gradebook operations
pub type Result<T> = std::result::Result<T, SheetError>;
