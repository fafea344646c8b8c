//! Google Sheets v4 REST backend for `SheetStore`.
//!
//! Authentication uses a bearer token injected at startup; minting and
//! refreshing service-account tokens happens outside this crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::client::SheetStore;
use crate::{Result, SheetError};

/// Sheets client configuration
#[derive(Debug, Clone)]
pub struct GoogleSheetsConfig {
    /// API base URL (override for local stubs)
    pub api_base: String,
    /// OAuth bearer token for the service account
    pub token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GoogleSheetsConfig {
    fn default() -> Self {
        GoogleSheetsConfig {
            api_base: std::env::var("GOOGLE_SHEETS_API_URL")
                .unwrap_or_else(|_| "https://sheets.googleapis.com".to_string()),
            token: std::env::var("GOOGLE_SHEETS_TOKEN").ok(),
            timeout_secs: 30,
        }
    }
}

impl GoogleSheetsConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific API endpoint
    pub fn new(api_base: &str) -> Self {
        GoogleSheetsConfig {
            api_base: api_base.trim_end_matches('/').to_string(),
            token: None,
            timeout_secs: 30,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

/// `SheetStore` backed by the Google Sheets v4 API.
pub struct GoogleSheetsClient {
    config: GoogleSheetsConfig,
    http_client: reqwest::Client,
}

/// Convert a 1-based column index to its A1 letter form (1 -> A, 27 -> AA).
fn col_letter(col: u32) -> String {
    debug_assert!(col >= 1);
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).expect("column letters are ASCII")
}

#[derive(Deserialize)]
struct WireValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Serialize)]
struct WireValueUpdate<'a> {
    values: [[&'a str; 1]; 1],
}

#[derive(Deserialize)]
struct WireSpreadsheet {
    #[serde(default)]
    sheets: Vec<WireSheet>,
}

#[derive(Deserialize)]
struct WireSheet {
    properties: WireSheetProperties,
}

#[derive(Deserialize)]
struct WireSheetProperties {
    title: String,
}

impl GoogleSheetsClient {
    /// Create a new Sheets client
    pub fn new(config: GoogleSheetsConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent("labmark-sheets/0.2.0")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        GoogleSheetsClient {
            config,
            http_client,
        }
    }

    /// Create client from environment variables
    pub fn from_env() -> Self {
        Self::new(GoogleSheetsConfig::from_env())
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch a value range. A 400 on a quoted range means the worksheet
    /// title did not resolve, which callers see as `WorksheetNotFound`.
    async fn values_get(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        range: &str,
        major_dimension: &str,
    ) -> Result<Vec<Vec<String>>> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/'{}'!{}?majorDimension={}",
            self.config.api_base, spreadsheet_id, worksheet, range, major_dimension
        );
        let response = self.authorize(self.http_client.get(&url)).send().await?;
        let status = response.status();
        debug!(url = %url, status = %status, "values_get");

        if status.as_u16() == 400 {
            return Err(SheetError::WorksheetNotFound {
                title: worksheet.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SheetError::Api {
                status: status.as_u16(),
                url,
            });
        }

        let body: WireValueRange = response.json().await?;
        Ok(body.values)
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsClient {
    async fn worksheet_exists(&self, spreadsheet_id: &str, worksheet: &str) -> Result<bool> {
        let url = format!(
            "{}/v4/spreadsheets/{}?fields=sheets.properties.title",
            self.config.api_base, spreadsheet_id
        );
        let response = self.authorize(self.http_client.get(&url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SheetError::Api {
                status: status.as_u16(),
                url,
            });
        }

        let body: WireSpreadsheet = response.json().await?;
        Ok(body
            .sheets
            .iter()
            .any(|sheet| sheet.properties.title == worksheet))
    }

    async fn row_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: u32,
    ) -> Result<Vec<String>> {
        let rows = self
            .values_get(spreadsheet_id, worksheet, &format!("{row}:{row}"), "ROWS")
            .await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn col_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        col: u32,
    ) -> Result<Vec<String>> {
        let letter = col_letter(col);
        let cols = self
            .values_get(
                spreadsheet_id,
                worksheet,
                &format!("{letter}:{letter}"),
                "COLUMNS",
            )
            .await?;
        Ok(cols.into_iter().next().unwrap_or_default())
    }

    async fn read_cell(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: u32,
        col: u32,
    ) -> Result<String> {
        let cell = format!("{}{}", col_letter(col), row);
        let rows = self
            .values_get(spreadsheet_id, worksheet, &format!("{cell}:{cell}"), "ROWS")
            .await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .unwrap_or_default())
    }

    async fn write_cell(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: u32,
        col: u32,
        value: &str,
    ) -> Result<()> {
        let cell = format!("{}{}", col_letter(col), row);
        let url = format!(
            "{}/v4/spreadsheets/{}/values/'{}'!{}?valueInputOption=RAW",
            self.config.api_base, spreadsheet_id, worksheet, cell
        );
        let body = WireValueUpdate {
            values: [[value]],
        };
        let response = self
            .authorize(self.http_client.put(&url).json(&body))
            .send()
            .await?;
        let status = response.status();
        debug!(url = %url, status = %status, "write_cell");

        if status.as_u16() == 400 {
            return Err(SheetError::WorksheetNotFound {
                title: worksheet.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SheetError::Api {
                status: status.as_u16(),
                url,
            });
        }
        Ok(())
    }
}
