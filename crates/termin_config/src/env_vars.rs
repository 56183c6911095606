//! Environment variable naming for Termin configuration.
//!
//! Config values map to `TERMIN__SECTION__KEY`, secrets to
//! `TERMIN_SECRET_SECTION_KEY`. The Google credentials also answer to the
//! bare names the widget was deployed with (`GOOGLE_PRIVATE_KEY` and friends).

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "TERMIN";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "TERMIN_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Config value replaced from the environment when loading.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Bare variable names for config paths that predate the prefixed scheme.
pub const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("sheets.client_email", "GOOGLE_CLIENT_EMAIL"),
    ("sheets.private_key", "GOOGLE_PRIVATE_KEY"),
    ("sheets.spreadsheet_id", "GOOGLE_SHEET_ID"),
];

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// `"server.host"` becomes `"TERMIN__SERVER__HOST"`.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `"sheets.private_key"` becomes `"TERMIN_SECRET_SHEETS_PRIVATE_KEY"`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a path to its legacy environment variable name
///
/// Paths listed in [`LEGACY_ALIASES`] use their alias, everything else
/// becomes `SERVICE_KEY` (`"sheets.range"` -> `"SHEETS_RANGE"`).
pub fn legacy_path_to_env_var(path: &str) -> String {
    if let Some((_, alias)) = LEGACY_ALIASES.iter().find(|(p, _)| *p == path) {
        return alias.to_string();
    }

    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Check if a path is a secret path
///
/// Paths containing "secret", "key", "password" or "token" are considered secret.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("key")
        || path_lower.contains("password")
        || path_lower.contains("token")
}

/// Get an environment variable for a path
///
/// Secrets are looked up under the secret scheme, other values under the
/// config scheme; both fall back to the legacy name.
pub fn get_env_var(path: &str) -> Option<String> {
    let primary = if is_secret_path(path) {
        secret_path_to_env_var(path)
    } else {
        config_path_to_env_var(path)
    };
    env::var(&primary)
        .ok()
        .or_else(|| env::var(legacy_path_to_env_var(path)).ok())
}

/// Inject environment variables into a JSON value
///
/// Recursively replaces `"secret_from_env"` strings with the value of the
/// matching environment variable. Returns `true` if anything was replaced.
pub fn inject_env_vars(value: &mut serde_json::Value) -> bool {
    use serde_json::Value;

    fn walk(path: Vec<String>, obj: &mut Value) -> bool {
        let mut replaced = false;

        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    replaced |= walk(new_path, v);
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter_mut().enumerate() {
                    let mut new_path = path.clone();
                    new_path.push(i.to_string());
                    replaced |= walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                if let Some(env_val) = get_env_var(&path_str) {
                    *s = env_val;
                    replaced = true;
                } else {
                    tracing::warn!("env var for {} not found", path_str);
                }
            }
            _ => {}
        }

        replaced
    }

    walk(vec![], value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_to_env_var() {
        assert_eq!(config_path_to_env_var("server.host"), "TERMIN__SERVER__HOST");
        assert_eq!(
            config_path_to_env_var("form.draft_dir"),
            "TERMIN__FORM__DRAFT_DIR"
        );
    }

    #[test]
    fn test_secret_path_to_env_var() {
        assert_eq!(
            secret_path_to_env_var("sheets.private_key"),
            "TERMIN_SECRET_SHEETS_PRIVATE_KEY"
        );
    }

    #[test]
    fn test_legacy_path_uses_google_aliases() {
        assert_eq!(
            legacy_path_to_env_var("sheets.private_key"),
            "GOOGLE_PRIVATE_KEY"
        );
        assert_eq!(
            legacy_path_to_env_var("sheets.spreadsheet_id"),
            "GOOGLE_SHEET_ID"
        );
        assert_eq!(legacy_path_to_env_var("sheets.range"), "SHEETS_RANGE");
    }

    #[test]
    fn test_is_secret_path() {
        assert!(is_secret_path("sheets.private_key"));
        assert!(!is_secret_path("server.host"));
        assert!(!is_secret_path("sheets.client_email"));
    }

    #[test]
    fn test_inject_env_vars_replaces_markers() {
        env::set_var("TERMIN_SECRET_TESTING_API_TOKEN", "s3cr3t");
        let mut value = serde_json::json!({
            "testing": {"api_token": "secret_from_env", "name": "plain"}
        });
        assert!(inject_env_vars(&mut value));
        assert_eq!(value["testing"]["api_token"], "s3cr3t");
        assert_eq!(value["testing"]["name"], "plain");
        env::remove_var("TERMIN_SECRET_TESTING_API_TOKEN");
    }
}
