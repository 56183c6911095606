//! Google Sheets `values:append` client.

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde_json::json;
use termin_common::HTTP_CLIENT;
use termin_config::SheetsConfig;
use thiserror::Error;
use tracing::debug;

use crate::auth::get_sheets_auth_token;

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_RANGE: &str = "Sheet1!A1";

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Missing configuration: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Sheets API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Appends rows to the booking spreadsheet.
///
/// The relay handler only talks to this trait, so tests can swap in a mock
/// and production uses [`GoogleSheetsClient`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SheetAppender: Send + Sync {
    /// Appends `row` after the last filled row of the configured range.
    ///
    /// # Arguments
    ///
    /// * `row` - Cell values in column order
    ///
    /// # Errors
    ///
    /// Returns a `SheetsError` when the row could not be stored.
    async fn append_row(&self, row: Vec<String>) -> Result<(), SheetsError>;
}

/// Sheets API v4 client that appends one row per call.
///
/// Each append fetches a fresh access token through
/// [`get_sheets_auth_token`] and posts the row with `valueInputOption=RAW`,
/// so cell contents are stored exactly as submitted.
///
/// # Examples
///
/// ```no_run
/// use termin_config::SheetsConfig;
/// use termin_sheets::client::{GoogleSheetsClient, SheetAppender};
///
/// # async fn run() -> Result<(), termin_sheets::client::SheetsError> {
/// let client = GoogleSheetsClient::new(SheetsConfig {
///     spreadsheet_id: Some("sheet-123".to_string()),
///     ..SheetsConfig::default()
/// });
/// client.append_row(vec!["October 20th, 2026".to_string()]).await?;
/// # Ok(())
/// # }
/// ```
pub struct GoogleSheetsClient {
    client: Client,
    config: SheetsConfig,
}

impl GoogleSheetsClient {
    pub fn new(config: SheetsConfig) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            config,
        }
    }

    fn range(&self) -> &str {
        self.config.range.as_deref().unwrap_or(DEFAULT_RANGE)
    }

    /// `{api_base}/v4/spreadsheets/{id}/values/{range}:append`
    pub fn append_url(&self) -> Result<Url, SheetsError> {
        let spreadsheet_id = self
            .config
            .spreadsheet_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SheetsError::Config("Missing spreadsheet id".to_string()))?;
        let api_base = self.config.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
        let append = format!("{}:append", self.range());

        let mut url = Url::parse(api_base)
            .map_err(|e| SheetsError::Config(format!("invalid api_base {}: {}", api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::Config(format!("api_base {} cannot be a base", api_base)))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                spreadsheet_id,
                "values",
                append.as_str(),
            ]);
        Ok(url)
    }

    /// Posts one row using an already obtained access token.
    ///
    /// # Arguments
    ///
    /// * `token` - A bearer token with the spreadsheets scope
    /// * `row` - Cell values in column order
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The spreadsheet id or `api_base` is unusable (`SheetsError::Config`)
    /// * The request cannot be sent (`SheetsError::Request`)
    /// * The API answers with a non-success status (`SheetsError::Api`)
    pub async fn append_with_token(&self, token: &str, row: &[String]) -> Result<(), SheetsError> {
        let url = self.append_url()?;
        debug!("Appending row to {}", url);

        let response = self
            .client
            .post(url)
            .query(&[("valueInputOption", "RAW")])
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .json(&json!({ "values": [row] }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(SheetsError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SheetAppender for GoogleSheetsClient {
    async fn append_row(&self, row: Vec<String>) -> Result<(), SheetsError> {
        // Check the target before spending a token request on it.
        self.append_url()?;
        let token = get_sheets_auth_token(&self.config).await?;
        self.append_with_token(&token, &row).await
    }
}
