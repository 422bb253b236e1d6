//! Google Sheets REST backend.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::backend::SheetBackend;
use crate::error::{Result, StoreError};
use crate::models::COLUMN_COUNT;

/// Timeout applied to every Sheets API call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for a Google spreadsheet.
#[derive(Clone)]
pub struct SheetsConfig {
    /// API base URL (e.g., "https://sheets.googleapis.com").
    pub api_base: String,
    /// Spreadsheet key from the sheet URL.
    pub spreadsheet_id: String,
    /// Tab name holding the bookings.
    pub sheet_name: String,
    /// Numeric tab ID, needed for row deletion.
    pub sheet_gid: i64,
    /// OAuth bearer token with the spreadsheets scope.
    pub access_token: String,
}

impl SheetsConfig {
    /// Create a configuration for the first tab of a spreadsheet.
    pub fn new(spreadsheet_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            api_base: "https://sheets.googleapis.com".to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: "Sheet1".to_string(),
            sheet_gid: 0,
            access_token: access_token.into(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SHEET_ID` | Spreadsheet key | (required) |
    /// | `SHEETS_ACCESS_TOKEN` | OAuth bearer token | (required) |
    /// | `SHEET_NAME` | Tab name | `Sheet1` |
    /// | `SHEET_GID` | Numeric tab ID | `0` |
    /// | `SHEETS_API_URL` | API base URL | `https://sheets.googleapis.com` |
    pub fn from_env() -> Result<Self> {
        let spreadsheet_id = env::var("SHEET_ID")
            .map_err(|_| StoreError::Config("SHEET_ID is required".to_string()))?;
        let access_token = env::var("SHEETS_ACCESS_TOKEN")
            .map_err(|_| StoreError::Config("SHEETS_ACCESS_TOKEN is required".to_string()))?;

        let mut config = Self::new(spreadsheet_id, access_token);
        if let Ok(name) = env::var("SHEET_NAME") {
            config.sheet_name = name;
        }
        if let Ok(gid) = env::var("SHEET_GID") {
            config.sheet_gid = gid
                .parse()
                .map_err(|_| StoreError::Config(format!("invalid SHEET_GID: {}", gid)))?;
        }
        if let Ok(base) = env::var("SHEETS_API_URL") {
            config.api_base = base;
        }
        Ok(config)
    }

    /// Override the tab name and ID.
    pub fn with_sheet(mut self, name: impl Into<String>, gid: i64) -> Self {
        self.sheet_name = name.into();
        self.sheet_gid = gid;
        self
    }

    /// Override the API base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// URL of a values range.
    pub fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.api_base,
            self.spreadsheet_id,
            urlencoding::encode(range)
        )
    }

    /// URL of the batchUpdate endpoint.
    pub fn batch_update_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.api_base, self.spreadsheet_id
        )
    }

    /// A1 range covering one booking row.
    pub fn row_range(&self, row: usize) -> String {
        format!(
            "'{}'!A{}:{}{}",
            self.sheet_name,
            row,
            column_letter(COLUMN_COUNT),
            row
        )
    }

    /// A1 address of a single cell.
    pub fn cell_range(&self, row: usize, column: usize) -> String {
        format!("'{}'!{}{}", self.sheet_name, column_letter(column), row)
    }
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("api_base", &self.api_base)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_name", &self.sheet_name)
            .field("sheet_gid", &self.sheet_gid)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Column letter for a 1-based column number (1 → `A`).
///
/// Only single-letter columns are needed for the booking layout.
fn column_letter(column: usize) -> char {
    let index = column.clamp(1, 26) - 1;
    (b'A' + index as u8) as char
}

/// `values.get` response body.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Booking sheet stored in Google Sheets.
#[derive(Clone)]
pub struct GoogleSheets {
    http: Client,
    config: SheetsConfig,
}

impl GoogleSheets {
    /// Create a backend for the given spreadsheet.
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(StoreError::Http)?;
        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.config.access_token)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn put_values(&self, range: &str, values: Vec<Vec<String>>) -> Result<()> {
        let url = format!("{}?valueInputOption=RAW", self.config.values_url(range));
        debug!("Sheets update: {}", range);

        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });
        let response = self.authorized(self.http.put(&url)).json(&body).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl SheetBackend for GoogleSheets {
    async fn read_all(&self) -> Result<Vec<Vec<String>>> {
        let range = format!("'{}'", self.config.sheet_name);
        let url = self.config.values_url(&range);
        debug!("Sheets read: {}", range);

        let response = self.authorized(self.http.get(&url)).send().await?;
        let body: ValueRange = Self::check(response).await?.json().await?;
        Ok(body.values)
    }

    async fn write_row(&self, row: usize, values: Vec<String>) -> Result<()> {
        if row == 0 {
            return Err(StoreError::RowOutOfRange { row });
        }
        let range = self.config.row_range(row);
        self.put_values(&range, vec![values]).await
    }

    async fn update_cell(&self, row: usize, column: usize, value: &str) -> Result<()> {
        if row == 0 || column == 0 {
            return Err(StoreError::RowOutOfRange { row });
        }
        let range = self.config.cell_range(row, column);
        self.put_values(&range, vec![vec![value.to_string()]]).await
    }

    async fn delete_rows(&self, start: usize, end: usize) -> Result<()> {
        if start == 0 || start > end {
            return Err(StoreError::RowOutOfRange { row: start });
        }
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": self.config.sheet_gid,
                        "dimension": "ROWS",
                        "startIndex": start - 1,
                        "endIndex": end,
                    }
                }
            }]
        });
        debug!("Sheets delete rows {}..={}", start, end);

        let url = self.config.batch_update_url();
        let response = self.authorized(self.http.post(&url)).json(&body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "google-sheets"
    }
}

impl std::fmt::Debug for GoogleSheets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheets")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let config = SheetsConfig::new("abc", "token").with_sheet("Bookings", 42);
        assert_eq!(config.row_range(3), "'Bookings'!A3:J3");
        assert_eq!(config.cell_range(3, 9), "'Bookings'!I3");
    }

    #[test]
    fn test_values_url_encodes_range() {
        let config = SheetsConfig::new("abc", "token").with_api_base("http://localhost:9000");
        assert_eq!(
            config.values_url("'Sheet1'!A2:J2"),
            "http://localhost:9000/v4/spreadsheets/abc/values/%27Sheet1%27%21A2%3AJ2"
        );
        assert_eq!(
            config.batch_update_url(),
            "http://localhost:9000/v4/spreadsheets/abc:batchUpdate"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = SheetsConfig::new("abc", "very-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), 'A');
        assert_eq!(column_letter(10), 'J');
        assert_eq!(column_letter(26), 'Z');
    }
}
