#![doc = "Google Sheets adapter: implements the core SheetAdapter trait over the Sheets v4 values API."]
//
//! # Sheets Integration (CLI <-> Core)
//!
//! This module bridges the [`sheetpress_core::sheet::SheetAdapter`] abstraction to the
//! Google Sheets REST API. Every range read becomes one
//! `GET {base_url}/spreadsheets/{id}/values/{range}?key={api_key}` request, with the
//! range written in A1 notation by the core.
//!
//! - Construct [`SheetsClient`] with [`SheetsClient::new_from_env`]; the API key is read
//!   from the environment variable named in the config (`SHEETS_API_KEY` by default),
//!   which `main` may have populated from `.env`.
//! - Only API-key access is supported, which is enough for a sheet shared by link.
//! - Transport, status and decoding failures map onto [`SheetError`] variants carrying the
//!   requested range.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::env;

use sheetpress_core::sheet::{Grid, SheetAdapter, SheetError, Span};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_API_KEY_ENV: &str = "SHEETS_API_KEY";

/// Response body of the values endpoint. `values` is omitted for an empty range.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    api_key: String,
}

impl SheetsClient {
    pub fn new(spreadsheet_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reads the API key from `api_key_env`. `.env` loading is left to the binary.
    pub fn new_from_env(
        spreadsheet_id: &str,
        api_key_env: &str,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        match env::var(api_key_env) {
            Ok(api_key) => {
                tracing::info!(
                    api_key_set = !api_key.is_empty(),
                    spreadsheet_id,
                    "Initialized SheetsClient from environment"
                );
                Ok(Self::new(spreadsheet_id, api_key))
            }
            Err(e) => {
                tracing::error!(error = ?e, var = api_key_env, "Sheets API key missing in environment");
                Err(format!("environment variable {api_key_env} is not set: {e}").into())
            }
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// The values endpoint for `range`, without the API key.
    pub fn values_url(&self, range: &str) -> Result<Url, SheetError> {
        let invalid = |message: String| SheetError::Request {
            range: range.to_string(),
            message,
        };
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("invalid base url {:?}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("base url {:?} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(["spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }
}

#[async_trait]
impl SheetAdapter for SheetsClient {
    async fn fetch_range(&self, page: &str, rows: Span, cols: Span) -> Result<Grid, SheetError> {
        let range = Span::to_a1_range(page, rows, cols);
        let url = self.values_url(&range)?;
        tracing::debug!(range = %range, spreadsheet_id = %self.spreadsheet_id, "Requesting sheet range");

        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                // The url carries the api key.
                let e = e.without_url();
                tracing::error!(error = ?e, range = %range, "Sheets request failed");
                SheetError::Request {
                    range: range.clone(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), range = %range, "Sheets API returned an error status");
            return Err(SheetError::Status {
                range,
                status: status.as_u16(),
                body,
            });
        }

        let body: ValueRange = response.json().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!(error = ?e, range = %range, "Failed to decode Sheets response");
            SheetError::Decode {
                range: range.clone(),
                message: e.to_string(),
            }
        })?;

        tracing::debug!(range = %range, rows = body.values.len(), "Fetched sheet range");
        Ok(body.values)
    }
}
