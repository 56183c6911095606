//! Service-account authentication for the Google Sheets API.
//!
//! Credentials come either from a key file (`sheets.key_path`) or from the
//! bare `client_email` / `private_key` pair, as deployed through environment
//! variables. Keys pasted into an env var usually carry literal `\n`
//! sequences; those are turned back into newlines before parsing.

use std::path::Path;
use termin_config::SheetsConfig;
use yup_oauth2::{
    parse_service_account_key, read_service_account_key, ServiceAccountAuthenticator,
    ServiceAccountKey,
};

use crate::client::SheetsError;

/// Read/write access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Replaces escaped `\n` sequences with real line breaks.
pub fn unescape_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Builds the service-account key described by `config`.
///
/// `key_path` wins over inline credentials when both are set. Inline keys
/// have their escaped newlines restored and get the Google token endpoint
/// filled in.
///
/// # Arguments
///
/// * `config` - The Sheets section holding either a key file path or the
///   `client_email` / `private_key` pair
///
/// # Returns
///
/// * `Result<ServiceAccountKey, SheetsError>` - The parsed key, ready for
///   `ServiceAccountAuthenticator`.
///
/// # Errors
///
/// Returns `SheetsError::Config` if:
/// * The key file at `key_path` cannot be read or parsed
/// * `private_key` or `client_email` is missing or empty
/// * The inline private key is not a valid PEM key
pub async fn service_account_key(config: &SheetsConfig) -> Result<ServiceAccountKey, SheetsError> {
    if let Some(key_path) = config.key_path.as_deref() {
        return read_service_account_key(Path::new(key_path))
            .await
            .map_err(|e| SheetsError::Config(format!("cannot read {}: {}", key_path, e)));
    }

    let private_key = config
        .private_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| SheetsError::Config("Missing private key".to_string()))?;
    let client_email = config
        .client_email
        .as_deref()
        .filter(|email| !email.is_empty())
        .ok_or_else(|| SheetsError::Config("Missing client email".to_string()))?;

    let key_json = serde_json::json!({
        "type": "service_account",
        "client_email": client_email,
        "private_key": unescape_private_key(private_key),
        "token_uri": GOOGLE_TOKEN_URI,
    });
    parse_service_account_key(key_json.to_string())
        .map_err(|e| SheetsError::Config(format!("invalid service account key: {}", e)))
}

/// Obtains an OAuth2 access token with the spreadsheets scope.
///
/// Builds the service-account key from `config` and exchanges it with
/// Google's OAuth2 service for a bearer token.
///
/// # Arguments
///
/// * `config` - The Sheets section carrying the service-account credentials
///
/// # Returns
///
/// * `Result<String, SheetsError>` - On success, the access token as a String.
///
/// # Errors
///
/// This function will return an error if:
/// * The credentials are missing or malformed (`SheetsError::Config`)
/// * Authentication with Google's OAuth2 service fails (`SheetsError::Auth`)
/// * No token is returned from the authentication service (`SheetsError::Auth`)
pub async fn get_sheets_auth_token(config: &SheetsConfig) -> Result<String, SheetsError> {
    let sa_key = service_account_key(config).await?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| SheetsError::Auth(e.to_string()))?;

    let access_token = auth
        .token(&[SHEETS_SCOPE])
        .await
        .map_err(|e| SheetsError::Auth(e.to_string()))?;

    match access_token.token() {
        Some(token) => Ok(token.to_string()),
        None => Err(SheetsError::Auth("No token available".to_string())),
    }
}
