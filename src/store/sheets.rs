//! Google Sheets v4 backend.
//!
//! The table is one worksheet of a spreadsheet. Its first row is the header;
//! every later row is a record. The worksheet is created on first access if
//! it does not exist yet; once seen, it is not looked up again.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use super::credentials::{self, CredentialSource};
use super::{Record, RowStore, zip_header};
use crate::error::OvertimeError;
use crate::model::overtime::{HEADERS, StoredRecord};

pub const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const NEW_SHEET_ROWS: u32 = 1000;
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: i64,
}

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
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

pub struct SheetsStore {
    http: Client,
    api_base: String,
    spreadsheet_id: String,
    sheet_name: String,
    sources: Vec<CredentialSource>,
    token: Mutex<Option<AccessToken>>,
    ready: AtomicBool,
    creating: futures_util::lock::Mutex<()>,
}

impl SheetsStore {
    pub fn new(spreadsheet_id: String, sheet_name: String, sources: Vec<CredentialSource>) -> Self {
        Self {
            http: Client::new(),
            api_base: API_BASE.to_string(),
            spreadsheet_id,
            sheet_name,
            sources,
            token: Mutex::new(None),
            ready: AtomicBool::new(false),
            creating: futures_util::lock::Mutex::new(()),
        }
    }

    /// Points the store at another Sheets-compatible endpoint.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn cached_token(&self, now: i64) -> Option<String> {
        let guard = self.token.lock().ok()?;
        guard
            .as_ref()
            .filter(|t| t.expires_at - TOKEN_REFRESH_MARGIN_SECS > now)
            .map(|t| t.value.clone())
    }

    /// Access token for the API, fetched through the jwt-bearer grant when
    /// the cached one is missing or about to expire.
    async fn access_token(&self) -> Result<String, OvertimeError> {
        let now = chrono::Utc::now().timestamp();
        if let Some(token) = self.cached_token(now) {
            return Ok(token);
        }

        let key = credentials::resolve(&self.sources)?;
        let assertion = credentials::signed_assertion(&key, now)?;

        let response = self
            .http
            .post(&key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "Token exchange rejected");
            return Err(OvertimeError::StoreUnavailable(format!(
                "token exchange failed with status {status}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        debug!(expires_in = token.expires_in, "Fetched spreadsheet access token");

        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(AccessToken {
                value: token.access_token.clone(),
                expires_at: now + token.expires_in,
            });
        }
        Ok(token.access_token)
    }

    fn url(&self, segments: &[&str]) -> Result<Url, OvertimeError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| OvertimeError::StoreUnavailable(format!("bad API url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| OvertimeError::StoreUnavailable("bad API url".into()))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    /// A1 range covering the whole worksheet.
    fn sheet_range(&self) -> String {
        format!("'{}'", self.sheet_name.replace('\'', "''"))
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<Response, OvertimeError> {
        let token = self.access_token().await?;
        Ok(request.bearer_auth(token).send().await?)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, OvertimeError> {
        let response = self.authorized(request).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(api_failure(status, &body))
    }

    async fn worksheet_exists(&self) -> Result<bool, OvertimeError> {
        let mut url = self.url(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");

        let meta: SpreadsheetMeta = self.send(self.http.get(url)).await?.json().await?;
        Ok(meta
            .sheets
            .iter()
            .any(|s| s.properties.title == self.sheet_name))
    }

    async fn append_values(&self, cells: &[&str]) -> Result<(), OvertimeError> {
        let range = format!("{}:append", self.sheet_range());
        let mut url = self.url(&["values", &range])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        self.send(self.http.post(url).json(&json!({ "values": [cells] })))
            .await?;
        Ok(())
    }

    /// Adds the worksheet. `false` when a sheet with that title appeared
    /// since it was looked up.
    async fn add_worksheet(&self) -> Result<bool, OvertimeError> {
        let url = self.url(&[])?;
        let url = Url::parse(&format!("{url}:batchUpdate"))
            .map_err(|e| OvertimeError::StoreUnavailable(format!("bad API url: {e}")))?;
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": self.sheet_name,
                        "gridProperties": {
                            "rowCount": NEW_SHEET_ROWS,
                            "columnCount": HEADERS.len(),
                        }
                    }
                }
            }]
        });

        let response = self.authorized(self.http.post(url).json(&body)).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST && body.contains("already exists") {
            info!(sheet = %self.sheet_name, "Worksheet was created by another writer");
            return Ok(false);
        }
        Err(api_failure(status, &body))
    }

    /// Creates the worksheet with its header row unless it already exists.
    async fn ensure_worksheet(&self) -> Result<(), OvertimeError> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }

        let _creating = self.creating.lock().await;
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }

        if !self.worksheet_exists().await? {
            info!(sheet = %self.sheet_name, "Worksheet missing, creating it");
            // The writer that wins the addSheet owns the header row.
            if self.add_worksheet().await? {
                self.append_values(&HEADERS).await?;
            }
        }

        self.ready.store(true, Ordering::Release);
        Ok(())
    }
}

fn api_failure(status: StatusCode, body: &str) -> OvertimeError {
    error!(%status, body = %body, "Spreadsheet API request failed");
    OvertimeError::StoreUnavailable(format!("spreadsheet API returned {status}"))
}

/// Header row plus data rows into records. An empty sheet has no records.
fn records_from_values(values: Vec<Vec<String>>) -> Vec<Record> {
    let mut rows = values.into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };

    rows.filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .map(|cells| zip_header(&header, &cells))
        .collect()
}

#[async_trait]
impl RowStore for SheetsStore {
    async fn append_row(&self, row: &StoredRecord) -> Result<(), OvertimeError> {
        self.ensure_worksheet().await?;
        self.append_values(&row.cells()).await
    }

    async fn all_records(&self) -> Result<Vec<Record>, OvertimeError> {
        self.ensure_worksheet().await?;

        let range = self.sheet_range();
        let mut url = self.url(&["values", &range])?;
        url.query_pairs_mut()
            .append_pair("valueRenderOption", "FORMATTED_VALUE");

        let body: ValueRange = self.send(self.http.get(url)).await?.json().await?;
        Ok(records_from_values(body.values))
    }
}
