use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::models::Anken;

/// Errors that can occur when fetching the listing sheet
///
/// `Clone` so the cache layer can hand the original variant back to
/// every waiter of a coalesced refresh.
#[derive(Debug, Clone, Error)]
pub enum SheetError {
    #[error("スプレッドシートの取得に失敗しました: {0}")]
    SourceUnavailable(String),

    #[error("無効なスプレッドシートURLです: {0}")]
    InvalidSource(String),

    #[error("CSVの解析に失敗しました: {0}")]
    SourceMalformed(String),
}

impl From<csv::Error> for SheetError {
    fn from(e: csv::Error) -> Self {
        SheetError::SourceMalformed(e.to_string())
    }
}

static SHEET_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/spreadsheets/d/([^/]+)").unwrap());
static GID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?&]gid=(\d+)").unwrap());

const FETCH_TIMEOUT_SECS: u64 = 30;

/// Google Sheets CSV export client
///
/// The sheet is column-oriented: row 1 holds listing names, row 2 holds
/// the full listing texts, one listing per column.
pub struct SheetClient {
    client: Client,
    sheet_url: String,
}

impl SheetClient {
    pub fn new(sheet_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, sheet_url }
    }

    /// Fetch and parse the configured sheet into listings
    pub async fn fetch_anken(&self) -> Result<Vec<Anken>, SheetError> {
        let export_url = to_export_url(&self.sheet_url)?;

        let response = self
            .client
            .get(&export_url)
            .header("Accept", "text/csv")
            .send()
            .await
            .map_err(|e| SheetError::SourceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SheetError::SourceUnavailable(format!(
                "{} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("")
            )));
        }

        let csv_text = response
            .text()
            .await
            .map_err(|e| SheetError::SourceUnavailable(e.to_string()))?;

        parse_csv_to_anken(&csv_text)
    }
}

/// Rewrite a sharing URL into its CSV export form, preserving the sheet
/// tab (gid) when present. URLs already pointing at an export pass
/// through untouched.
pub fn to_export_url(url: &str) -> Result<String, SheetError> {
    if url.contains("/export") {
        return Ok(url.to_string());
    }

    let sheet_id = SHEET_ID_RE
        .captures(url)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| SheetError::InvalidSource(url.to_string()))?;

    let gid = GID_RE
        .captures(url)
        .map(|caps| format!("&gid={}", &caps[1]))
        .unwrap_or_default();

    Ok(format!(
        "https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv{gid}"
    ))
}

/// Turn the raw CSV export into listings. Fewer than two rows means the
/// sheet has no data yet and yields an empty set rather than an error.
pub fn parse_csv_to_anken(csv_text: &str) -> Result<Vec<Anken>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
        if rows.len() == 2 {
            break;
        }
    }

    if rows.len() < 2 {
        return Ok(Vec::new());
    }

    let name_row = &rows[0];
    let text_row = &rows[1];
    let mut ankens = Vec::new();

    for (col, raw_name) in name_row.iter().enumerate() {
        let name = raw_name.trim();
        let full_text = text_row.get(col).map(|t| t.trim()).unwrap_or("");
        if name.is_empty() && full_text.is_empty() {
            continue;
        }
        ankens.push(Anken {
            id: format!("anken_{}", col + 1),
            name: if name.is_empty() {
                format!("案件{}", col + 1)
            } else {
                name.to_string()
            },
            full_text: full_text.to_string(),
        });
    }

    Ok(ankens)
}
