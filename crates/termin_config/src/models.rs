// --- File: crates/termin_config/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Endpoint the widget has always posted finished bookings to.
pub const DEFAULT_ENDPOINT_URL: &str =
    "https://consultation-ten.vercel.app/api/consultation/form/21654665456454545454758784545";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    pub level: Option<String>, // "trace" .. "error", defaults to info
    pub dir: Option<String>,   // daily rolling file when set
    #[serde(default)]
    pub journald: bool, // only honoured on Linux
}

// --- Weekday slot overrides ---
// Each list replaces the built-in slots for that weekday. Labels are "HH:MM".
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SlotsConfig {
    pub mon: Option<Vec<String>>,
    pub tue: Option<Vec<String>>,
    pub wed: Option<Vec<String>>,
    pub thu: Option<Vec<String>>,
    pub fri: Option<Vec<String>>,
    pub sat: Option<Vec<String>>,
    pub sun: Option<Vec<String>>,
}

// --- Booking Form Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FormConfig {
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    pub relay_url: Option<String>, // e.g. http://127.0.0.1:8080/api/submit
    pub draft_dir: Option<String>,
    pub draft_ttl_secs: Option<u64>, // defaults to one hour
    pub time_zone: Option<String>,   // IANA name, defaults to Europe/Berlin
    #[serde(default)]
    pub slots: Option<SlotsConfig>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            relay_url: None,
            draft_dir: None,
            draft_ttl_secs: None,
            time_zone: None,
            slots: None,
        }
    }
}

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_string()
}

// --- Google Sheets Relay Config ---
// Secrets usually arrive via GOOGLE_CLIENT_EMAIL / GOOGLE_PRIVATE_KEY / GOOGLE_SHEET_ID.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SheetsConfig {
    pub client_email: Option<String>,
    pub private_key: Option<String>,
    pub key_path: Option<String>, // service account JSON, used when private_key is unset
    pub spreadsheet_id: Option<String>,
    pub range: Option<String>,    // defaults to "Sheet1!A1"
    pub api_base: Option<String>, // defaults to https://sheets.googleapis.com
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_form: bool,
    #[serde(default)]
    pub use_sheets: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub form: Option<FormConfig>,
    #[serde(default)]
    pub sheets: Option<SheetsConfig>,
}
