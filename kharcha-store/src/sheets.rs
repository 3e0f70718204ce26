//! Google Sheets v4 adapter: the spreadsheet is the system of record.
//!
//! Reads use `values:get` (formatted values, header row included), writes use
//! `values:append`. Auth is a pre-issued OAuth bearer token supplied
//! out-of-band; no token refresh or retry logic lives here.

use anyhow::{bail, Context, Result};
use kharcha_core::{RawRow, EXPECTED_HEADERS};
use serde::Deserialize;
use serde_json::json;

use crate::store::{rows_to_maps, ExpenseStore};

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub struct SheetsStore {
    sheet_id: String,
    token: String,
    /// A1 range covering the expense tab.
    range: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Subset of `spreadsheets.get` needed to map a tab title to its grid id.
#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId")]
    sheet_id: i64,
    title: String,
}

impl SpreadsheetMeta {
    fn grid_id(&self, title: &str) -> Option<i64> {
        self.sheets
            .iter()
            .find(|s| s.properties.title == title)
            .map(|s| s.properties.sheet_id)
    }
}

impl SheetsStore {
    pub fn new(sheet_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            token: token.into(),
            range: "Sheet1".to_string(),
        }
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }

    async fn get_values(&self) -> Result<Vec<Vec<String>>> {
        let url = format!("{API_BASE}/{}/values/{}", self.sheet_id, self.range);
        let client = reqwest::Client::new();
        let resp = client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .context("reading sheet values")?;

        let status = resp.status();
        if !status.is_success() {
            bail!(
                "sheet read failed: {} {}",
                status,
                resp.text().await.unwrap_or_default()
            );
        }

        let vr: ValueRange = resp.json().await.context("decoding sheet values")?;
        Ok(vr.values)
    }

    async fn append_values(&self, row: &[String]) -> Result<()> {
        let url = format!(
            "{API_BASE}/{}/values/{}:append?valueInputOption=USER_ENTERED",
            self.sheet_id, self.range
        );
        let client = reqwest::Client::new();
        let resp = client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .context("appending sheet row")?;

        let status = resp.status();
        if !status.is_success() {
            bail!(
                "sheet append failed: {} {}",
                status,
                resp.text().await.unwrap_or_default()
            );
        }
        Ok(())
    }

    /// Grid id of the configured tab. `insertDimension` is keyed by grid id,
    /// not by A1 title, so this must be resolved before any row insert.
    async fn resolve_grid_id(&self, client: &reqwest::Client) -> Result<i64> {
        let url = format!(
            "{API_BASE}/{}?fields=sheets.properties(sheetId,title)",
            self.sheet_id
        );
        let resp = client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .context("reading spreadsheet metadata")?;

        let status = resp.status();
        if !status.is_success() {
            bail!(
                "spreadsheet metadata read failed: {} {}",
                status,
                resp.text().await.unwrap_or_default()
            );
        }

        let meta: SpreadsheetMeta = resp.json().await.context("decoding spreadsheet metadata")?;
        meta.grid_id(&self.range)
            .ok_or_else(|| anyhow::anyhow!("no tab named '{}' in spreadsheet", self.range))
    }

    /// Push every row of the configured tab down by one, then write the
    /// expected header into row 1.
    async fn insert_header(&self) -> Result<()> {
        let client = reqwest::Client::new();
        let grid_id = self.resolve_grid_id(&client).await?;

        let url = format!("{API_BASE}/{}:batchUpdate", self.sheet_id);
        let body = json!({
            "requests": [{
                "insertDimension": {
                    "range": {
                        "sheetId": grid_id,
                        "dimension": "ROWS",
                        "startIndex": 0,
                        "endIndex": 1
                    },
                    "inheritFromBefore": false
                }
            }]
        });
        let resp = client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("inserting header row")?;
        let status = resp.status();
        if !status.is_success() {
            bail!(
                "header insert failed: {} {}",
                status,
                resp.text().await.unwrap_or_default()
            );
        }

        let url = format!(
            "{API_BASE}/{}/values/{}!A1:D1?valueInputOption=RAW",
            self.sheet_id, self.range
        );
        let resp = client
            .put(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "values": [EXPECTED_HEADERS] }))
            .send()
            .await
            .context("writing header row")?;
        let status = resp.status();
        if !status.is_success() {
            bail!(
                "header write failed: {} {}",
                status,
                resp.text().await.unwrap_or_default()
            );
        }
        Ok(())
    }
}

impl ExpenseStore for SheetsStore {
    fn append_row(&self, row: &[String]) -> Result<()> {
        run_blocking(self.append_values(row))
    }

    fn read_all_rows(&self) -> Result<Vec<RawRow>> {
        let values = run_blocking(self.get_values())?;
        Ok(rows_to_maps(values))
    }

    fn ensure_header(&self) -> Result<()> {
        let values = run_blocking(self.get_values())?;
        let expected: Vec<String> = EXPECTED_HEADERS.iter().map(|s| s.to_string()).collect();
        if values.first().map(|r| r.as_slice()) == Some(expected.as_slice()) {
            return Ok(());
        }
        run_blocking(self.insert_header())
    }
}

/// The bot binary runs under #[tokio::main], so we're often already inside a
/// runtime; creating a nested runtime and calling block_on there panics.
///
/// Strategy:
/// - If a runtime is already running: use block_in_place + Handle::block_on
/// - Otherwise: create a runtime and block_on
fn run_blocking<T>(fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        tokio::task::block_in_place(|| handle.block_on(fut))
    } else {
        let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
        rt.block_on(fut)
    }
}
