use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};

pub mod env_vars;
pub mod models;
pub use models::*;

/// Directory holding `default.*` and `<RUN_ENV>.*` config files.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Loads the application configuration.
///
/// Sources, later ones winning: `config/default`, `config/{RUN_ENV}`, then
/// `TERMIN__*` environment variables. `secret_from_env` markers are resolved
/// afterwards, and unset Google credentials fall back to their bare env names.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_dir = env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));
    load_config_from(&config_dir)
}

/// Same as [`load_config`] with an explicit config directory.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    tracing::debug!(
        "loading config from {} and {}",
        default_path.display(),
        env_path.display()
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(&prefix).separator(env_vars::CONFIG_SEPARATOR));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    let mut config = apply_env_overrides_from_marker(raw_config)?;
    apply_legacy_sheet_env(&mut config);
    Ok(config)
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("config is not serializable: {err}")))?;
    env_vars::inject_env_vars(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("config invalid after env injection: {err}")))
}

/// Fills unset sheet credentials from `GOOGLE_CLIENT_EMAIL`, `GOOGLE_PRIVATE_KEY`
/// and `GOOGLE_SHEET_ID`, creating the section if any of them is present.
fn apply_legacy_sheet_env(config: &mut AppConfig) {
    let lookup = |path: &str| env::var(env_vars::legacy_path_to_env_var(path)).ok();
    let client_email = lookup("sheets.client_email");
    let private_key = lookup("sheets.private_key");
    let spreadsheet_id = lookup("sheets.spreadsheet_id");

    if config.sheets.is_none()
        && client_email.is_none()
        && private_key.is_none()
        && spreadsheet_id.is_none()
    {
        return;
    }

    let sheets = config.sheets.get_or_insert_with(SheetsConfig::default);
    // Markers nothing resolved count as unset.
    for value in [
        &mut sheets.client_email,
        &mut sheets.private_key,
        &mut sheets.spreadsheet_id,
    ] {
        if value.as_deref() == Some(env_vars::SECRET_MARKER) {
            *value = None;
        }
    }
    if sheets.client_email.is_none() {
        sheets.client_email = client_email;
    }
    if sheets.private_key.is_none() {
        sheets.private_key = private_key;
    }
    if sheets.spreadsheet_id.is_none() {
        sheets.spreadsheet_id = spreadsheet_id;
    }
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment once.
///
/// The file is taken from `DOTENV_OVERRIDE`, else from a first command line
/// argument starting with `.env`, else `.env`. Returns the path used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_sections_from_default_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
use_form = true
use_sheets = true

[server]
host = "0.0.0.0"
port = 3000

[form]
draft_ttl_secs = 600

[form.slots]
sat = ["10:00"]

[sheets]
spreadsheet_id = "sheet-123"
range = "Buchungen!A1"
"#,
        )
        .unwrap();

        let config = load_config_from(dir.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.use_form && config.use_sheets);

        let form = config.form.unwrap();
        assert_eq!(form.endpoint_url, DEFAULT_ENDPOINT_URL);
        assert_eq!(form.draft_ttl_secs, Some(600));
        assert_eq!(form.slots.unwrap().sat, Some(vec!["10:00".to_string()]));

        let sheets = config.sheets.unwrap();
        assert_eq!(sheets.spreadsheet_id.as_deref(), Some("sheet-123"));
        assert_eq!(sheets.range.as_deref(), Some("Buchungen!A1"));
    }

    #[test]
    fn unresolved_markers_do_not_leak_into_sheets() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[sheets]
client_email = "secret_from_env"
"#,
        )
        .unwrap();

        let config = load_config_from(dir.path()).unwrap();
        let sheets = config.sheets.unwrap();
        assert_ne!(sheets.client_email.as_deref(), Some(env_vars::SECRET_MARKER));
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.use_form);
        assert!(config.form.is_none());
    }
}
