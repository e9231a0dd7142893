//! Google Sheets backend
//!
//! Appends lead rows to one worksheet of a spreadsheet using the Sheets v4
//! REST API. The client is only constructed when provisioning succeeds, so an
//! existing `SheetsClient` always points at a worksheet that was seen at startup.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{LeadRecord, LeadSink, SinkError};
use crate::credentials::TokenProvider;
use crate::{Error, Result};

/// Sheets API base URL
pub const SHEETS_API_URL: &str = "https://sheets.googleapis.com";

/// OAuth scope for reading and appending spreadsheet values
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Spreadsheet metadata (only sheet titles are requested)
#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Body of a `values:append` call
#[derive(Debug, Serialize)]
struct ValueRange<'a> {
    values: [&'a [String]; 1],
}

/// Extract the spreadsheet ID from a sheet URL, or return the input as an ID
///
/// Accepts `https://docs.google.com/spreadsheets/d/<id>/edit...` as well as a bare ID.
#[must_use]
pub fn spreadsheet_id(spreadsheet: &str) -> &str {
    let spreadsheet = spreadsheet.trim();
    spreadsheet
        .split_once("/spreadsheets/d/")
        .map_or(spreadsheet, |(_, rest)| {
            rest.split(['/', '?', '#']).next().unwrap_or(rest)
        })
}

/// A1 range addressing the first cell of a worksheet, with the title quoted
fn worksheet_range(worksheet: &str) -> String {
    format!("'{}'!A1", worksheet.replace('\'', "''"))
}

/// Provisioned handle to one worksheet
pub struct SheetsClient {
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
    spreadsheet_id: String,
    worksheet: String,
}

impl std::fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsClient")
            .field("base_url", &self.base_url)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("worksheet", &self.worksheet)
            .finish_non_exhaustive()
    }
}

impl SheetsClient {
    /// Provision against the public Sheets API
    ///
    /// # Errors
    ///
    /// Returns error if the spreadsheet cannot be read or lacks the worksheet
    pub async fn provision(
        tokens: Arc<dyn TokenProvider>,
        spreadsheet: &str,
        worksheet: &str,
        timeout: Duration,
    ) -> Result<Self> {
        Self::provision_at(SHEETS_API_URL, tokens, spreadsheet, worksheet, timeout).await
    }

    /// Provision against an explicit API base URL
    ///
    /// `timeout` bounds every request, including appends made later.
    ///
    /// # Errors
    ///
    /// Returns error if the spreadsheet cannot be read or lacks the worksheet
    pub async fn provision_at(
        base_url: &str,
        tokens: Arc<dyn TokenProvider>,
        spreadsheet: &str,
        worksheet: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let id = spreadsheet_id(spreadsheet);
        if id.is_empty() {
            return Err(Error::Sheets("empty spreadsheet id".to_string()));
        }

        let client = Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            tokens,
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: id.to_string(),
            worksheet: worksheet.to_string(),
        };

        let titles = client.sheet_titles().await?;
        if !titles.iter().any(|t| t == worksheet) {
            return Err(Error::Sheets(format!(
                "worksheet {worksheet:?} not found in spreadsheet (have {titles:?})"
            )));
        }

        tracing::info!(
            spreadsheet = %client.spreadsheet_id,
            worksheet = %client.worksheet,
            "lead sheet provisioned"
        );

        Ok(client)
    }

    /// Spreadsheet being written to
    #[must_use]
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Worksheet being written to
    #[must_use]
    pub fn worksheet(&self) -> &str {
        &self.worksheet
    }

    async fn sheet_titles(&self) -> Result<Vec<String>> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/v4/spreadsheets/{}", self.base_url, self.spreadsheet_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Sheets(format!(
                "spreadsheet lookup failed: {status} - {body}"
            )));
        }

        let meta: SpreadsheetMeta = response.json().await?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    /// Append one row after the last row of the worksheet's table
    ///
    /// # Errors
    ///
    /// Returns error if the token or the append request fails
    pub async fn append_row(&self, row: &[String]) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let range = urlencoding::encode(&worksheet_range(&self.worksheet)).into_owned();
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{range}:append",
            self.base_url, self.spreadsheet_id
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&ValueRange { values: [row] })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Sheets(format!("append failed: {status} - {body}")));
        }

        Ok(())
    }
}

#[async_trait]
impl LeadSink for SheetsClient {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn append(&self, record: &LeadRecord) -> std::result::Result<(), SinkError> {
        self.append_row(&record.to_row())
            .await
            .map_err(|e| SinkError::Remote(e.to_string()))
    }
}
