//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `UHOME_CLIENT_ID` is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `UHOME_CLIENT_ID` (required): OAuth client id
//! - `UHOME_CLIENT_SECRET`: OAuth client secret
//! - `UHOME_REDIRECT_URI`: redirect target, also where the callback listener binds
//! - `UHOME_SCOPE`: requested scope
//! - `UHOME_AUTH_URL`: authorization endpoint
//! - `UHOME_TOKEN_URL`: token endpoint
//! - `UHOME_API_URL`: action endpoint
//! - `UHOME_LISTEN_ADDR`: socket address overriding the redirect host/port
//! - `UHOME_CALLBACK_TIMEOUT_SECS`: how long to wait for the browser redirect
//! - `UHOME_API_TIMEOUT_SECS`: per-request timeout for the action API
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./uhome.json` or `./uhome.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use uhome_domain::{ApiConfig, AuthConfig, Config, Result, UHomeError};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the client id is
/// not set there, falls back to loading from a config file.
///
/// # Errors
/// Returns `UHomeError::Config` if:
/// - An environment variable is set but unparseable
/// - No client id is set and no config file is found
/// - File format is invalid
/// - Validation fails
pub fn load() -> Result<Config> {
    if env_opt("UHOME_CLIENT_ID").is_none() {
        tracing::debug!("UHOME_CLIENT_ID not set, trying config file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// Only `UHOME_CLIENT_ID` is required; every other setting falls back to
/// its default.
///
/// # Errors
/// Returns `UHomeError::Config` if the client id is missing or a value
/// cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    let defaults = AuthConfig::default();
    let api_defaults = ApiConfig::default();

    let auth = AuthConfig {
        client_id: env_var("UHOME_CLIENT_ID")?,
        client_secret: env_opt("UHOME_CLIENT_SECRET"),
        redirect_uri: env_opt("UHOME_REDIRECT_URI").unwrap_or(defaults.redirect_uri),
        scope: env_opt("UHOME_SCOPE").unwrap_or(defaults.scope),
        authorization_url: env_opt("UHOME_AUTH_URL").unwrap_or(defaults.authorization_url),
        token_url: env_opt("UHOME_TOKEN_URL").unwrap_or(defaults.token_url),
        listen_addr: env_parse::<SocketAddr>("UHOME_LISTEN_ADDR")?,
        callback_timeout_secs: env_parse("UHOME_CALLBACK_TIMEOUT_SECS")?
            .unwrap_or(defaults.callback_timeout_secs),
    };

    let api = ApiConfig {
        action_url: env_opt("UHOME_API_URL").unwrap_or(api_defaults.action_url),
        timeout_secs: env_parse("UHOME_API_TIMEOUT_SECS")?.unwrap_or(api_defaults.timeout_secs),
    };

    let config = Config { auth, api };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `UHomeError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Validation fails
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(UHomeError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            UHomeError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| UHomeError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| UHomeError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| UHomeError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(UHomeError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("uhome.json"),
        dir.join("uhome.toml"),
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key)
        .ok_or_else(|| UHomeError::Config(format!("Missing required environment variable: {key}")))
}

/// Optional environment variable; empty values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| UHomeError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use tempfile::Builder;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ALL_VARS: &[&str] = &[
        "UHOME_CLIENT_ID",
        "UHOME_CLIENT_SECRET",
        "UHOME_REDIRECT_URI",
        "UHOME_SCOPE",
        "UHOME_AUTH_URL",
        "UHOME_TOKEN_URL",
        "UHOME_API_URL",
        "UHOME_LISTEN_ADDR",
        "UHOME_CALLBACK_TIMEOUT_SECS",
        "UHOME_API_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_with_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("UHOME_CLIENT_ID", "client-123");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.auth.client_id, "client-123");
        assert_eq!(config.auth.client_secret, None);
        assert_eq!(
            config.auth,
            AuthConfig { client_id: "client-123".into(), ..AuthConfig::default() }
        );
        assert_eq!(config.api, ApiConfig::default());

        clear_env();
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("UHOME_CLIENT_ID", "client");
        std::env::set_var("UHOME_CLIENT_SECRET", "secret");
        std::env::set_var("UHOME_REDIRECT_URI", "http://localhost:9999/cb");
        std::env::set_var("UHOME_API_URL", "http://127.0.0.1:1234/action");
        std::env::set_var("UHOME_LISTEN_ADDR", "127.0.0.1:9999");
        std::env::set_var("UHOME_CALLBACK_TIMEOUT_SECS", "5");
        std::env::set_var("UHOME_API_TIMEOUT_SECS", "7");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.auth.client_secret.as_deref(), Some("secret"));
        assert_eq!(config.auth.redirect_uri, "http://localhost:9999/cb");
        assert_eq!(config.auth.listen_addr, Some("127.0.0.1:9999".parse().unwrap()));
        assert_eq!(config.auth.callback_timeout_secs, 5);
        assert_eq!(config.api.action_url, "http://127.0.0.1:1234/action");
        assert_eq!(config.api.timeout_secs, 7);

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_client_id() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, UHomeError::Config(msg) if msg.contains("UHOME_CLIENT_ID")));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("UHOME_CLIENT_ID", "client");
        std::env::set_var("UHOME_API_TIMEOUT_SECS", "soon");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, UHomeError::Config(msg) if msg.contains("UHOME_API_TIMEOUT_SECS")));

        clear_env();
    }

    #[test]
    fn test_load_reports_invalid_env_value_instead_of_falling_back() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("UHOME_CLIENT_ID", "client");
        std::env::set_var("UHOME_API_TIMEOUT_SECS", "soon");

        let err = load().unwrap_err();
        assert!(matches!(&err, UHomeError::Config(msg) if msg.contains("UHOME_API_TIMEOUT_SECS")));
        assert!(!err.to_string().contains("No config file found"));

        clear_env();
    }

    #[test]
    fn test_load_from_file_toml() {
        let mut file = Builder::new().suffix(".toml").tempfile().expect("temp file");
        writeln!(
            file,
            r#"
[auth]
client_id = "toml-client"
scope = "openapi extra"

[api]
timeout_secs = 3
"#
        )
        .expect("write config");

        let config = load_from_file(Some(file.path().to_path_buf())).expect("toml config");
        assert_eq!(config.auth.client_id, "toml-client");
        assert_eq!(config.auth.scope, "openapi extra");
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(config.api.action_url, ApiConfig::default().action_url);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = parse_config("", Path::new("config.yaml")).unwrap_err();
        assert!(matches!(err, UHomeError::Config(msg) if msg.contains("yaml")));
    }
}
