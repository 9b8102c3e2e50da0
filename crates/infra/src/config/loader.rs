//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Environment variables, when `FRAPLIN_SITE_URL` is set
//! 2. Otherwise the first config file found by [`probe_config_paths`]
//!
//! Every loaded configuration is validated before it is returned.
//!
//! ## Environment Variables
//! - `FRAPLIN_SITE_URL`: Site base URL (required)
//! - `FRAPLIN_API_TOKEN`: Site `api_key:api_secret`
//! - `FRAPLIN_CLOUD_TOKEN`: Frappe Cloud account token
//! - `FRAPLIN_AUTHORITY_URL`: Site login endpoint override
//! - `FRAPLIN_BATCH_SIZE`: Records per page
//! - `FRAPLIN_TIMEOUT_SECS`: Per request timeout in seconds
//! - `FRAPLIN_DUPLICATE_INFO_POLICY`: `last_wins`, `first_wins` or `reject`
//!
//! ## File Locations
//! `fraplin.{json,toml}` and `config/fraplin.{json,toml}` in the current
//! directory and its parent, then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use fraplin_domain::{
    CloudConfig, DuplicateInfoPolicy, FetchConfig, FraplinConfig, FraplinError, Result,
    SiteConfig,
};

pub const ENV_SITE_URL: &str = "FRAPLIN_SITE_URL";
pub const ENV_API_TOKEN: &str = "FRAPLIN_API_TOKEN";
pub const ENV_CLOUD_TOKEN: &str = "FRAPLIN_CLOUD_TOKEN";
pub const ENV_AUTHORITY_URL: &str = "FRAPLIN_AUTHORITY_URL";
pub const ENV_BATCH_SIZE: &str = "FRAPLIN_BATCH_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "FRAPLIN_TIMEOUT_SECS";
pub const ENV_DUPLICATE_INFO_POLICY: &str = "FRAPLIN_DUPLICATE_INFO_POLICY";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["fraplin.json", "fraplin.toml", "config/fraplin.json", "config/fraplin.toml"];

/// Load configuration from the environment, falling back to a file.
///
/// # Errors
/// Returns `FraplinError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> Result<FraplinConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from `FRAPLIN_*` environment variables.
///
/// # Errors
/// Returns `FraplinError::Config` if `FRAPLIN_SITE_URL` is missing, a
/// numeric or policy value does not parse, or validation fails.
pub fn load_from_env() -> Result<FraplinConfig> {
    let url = env_var(ENV_SITE_URL)?;
    let api_token = env_opt(ENV_API_TOKEN);

    let cloud = env_opt(ENV_CLOUD_TOKEN).map(|token| {
        let mut cloud = CloudConfig::new(token);
        if let Some(authority_url) = env_opt(ENV_AUTHORITY_URL) {
            cloud.authority_url = authority_url;
        }
        cloud
    });

    let defaults = FetchConfig::default();
    let fetch = FetchConfig {
        batch_size: env_parse(ENV_BATCH_SIZE, "batch size")?.unwrap_or(defaults.batch_size),
        timeout_seconds: env_parse(ENV_TIMEOUT_SECS, "timeout")?
            .unwrap_or(defaults.timeout_seconds),
        duplicate_info_policy: env_opt(ENV_DUPLICATE_INFO_POLICY)
            .map(|raw| DuplicateInfoPolicy::from_str(&raw))
            .transpose()?
            .unwrap_or(defaults.duplicate_info_policy),
    };

    let config = FraplinConfig { site: SiteConfig { url, api_token }, cloud, fetch };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a JSON or TOML file.
///
/// If `path` is `None`, [`probe_config_paths`] picks the file.
///
/// # Errors
/// Returns `FraplinError::Config` if the file is missing, unreadable,
/// malformed, or fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<FraplinConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FraplinError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FraplinError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FraplinError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse by file extension; anything other than `.toml` is read as JSON.
fn parse_config(contents: &str, path: &Path) -> Result<FraplinConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FraplinError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FraplinError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(FraplinError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        FraplinError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Unset and blank variables are both treated as absent.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| FraplinError::Config(format!("Invalid {what}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 7] = [
        ENV_SITE_URL,
        ENV_API_TOKEN,
        ENV_CLOUD_TOKEN,
        ENV_AUTHORITY_URL,
        ENV_BATCH_SIZE,
        ENV_TIMEOUT_SECS,
        ENV_DUPLICATE_INFO_POLICY,
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_SITE_URL, "https://erp.example.com");
        std::env::set_var(ENV_CLOUD_TOKEN, "cloud-token");
        std::env::set_var(ENV_AUTHORITY_URL, "http://localhost:9000/login");
        std::env::set_var(ENV_BATCH_SIZE, "250");
        std::env::set_var(ENV_TIMEOUT_SECS, "5");
        std::env::set_var(ENV_DUPLICATE_INFO_POLICY, "First_Wins");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.site.url, "https://erp.example.com");
        assert!(config.site.api_token.is_none());
        let cloud = config.cloud.expect("cloud section");
        assert_eq!(cloud.token, "cloud-token");
        assert_eq!(cloud.authority_url, "http://localhost:9000/login");
        assert_eq!(config.fetch.batch_size, 250);
        assert_eq!(config.fetch.timeout_seconds, 5);
        assert_eq!(config.fetch.duplicate_info_policy, DuplicateInfoPolicy::FirstWins);
    }

    #[test]
    fn test_load_from_env_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_SITE_URL, "https://erp.example.com");
        std::env::set_var(ENV_API_TOKEN, "key:secret");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.site.api_token.as_deref(), Some("key:secret"));
        assert!(config.cloud.is_none());
        assert_eq!(config.fetch, FetchConfig::default());
    }

    #[test]
    fn test_load_from_env_missing_site_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_API_TOKEN, "key:secret");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(FraplinError::Config(msg)) if msg.contains(ENV_SITE_URL)));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_SITE_URL, "https://erp.example.com");
        std::env::set_var(ENV_API_TOKEN, "key:secret");
        std::env::set_var(ENV_BATCH_SIZE, "lots");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(FraplinError::Config(msg)) if msg.contains("batch size")));
    }

    #[test]
    fn test_load_from_env_rejects_unknown_policy() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_SITE_URL, "https://erp.example.com");
        std::env::set_var(ENV_API_TOKEN, "key:secret");
        std::env::set_var(ENV_DUPLICATE_INFO_POLICY, "merge");

        let result = load_from_env();
        clear_env();

        match result {
            Err(FraplinError::Config(msg)) => {
                assert!(msg.contains("last_wins, first_wins, reject"));
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_env_requires_a_credential() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_SITE_URL, "https://erp.example.com");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(FraplinError::Config(_))));
    }

    #[test]
    fn test_load_from_file_json() {
        let path = temp_config(
            r#"{
                "site": {"url": "https://erp.example.com", "api_token": "key:secret"},
                "fetch": {"batch_size": 500}
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).expect("json config");
        assert_eq!(config.site.url, "https://erp.example.com");
        assert_eq!(config.fetch.batch_size, 500);
        assert_eq!(config.fetch.timeout_seconds, 30);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let path = temp_config(
            r#"
[site]
url = "https://erp.example.com"

[cloud]
token = "cloud-token"

[fetch]
duplicate_info_policy = "reject"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).expect("toml config");
        assert_eq!(config.cloud.map(|c| c.token).as_deref(), Some("cloud-token"));
        assert_eq!(config.fetch.duplicate_info_policy, DuplicateInfoPolicy::Reject);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_validates() {
        let path = temp_config(
            r#"{
                "site": {"url": "https://erp.example.com", "api_token": "k:s"},
                "fetch": {"batch_size": 0}
            }"#,
            "json",
        );

        let result = load_from_file(Some(path.clone()));
        assert!(matches!(result, Err(FraplinError::Config(msg)) if msg.contains("batch_size")));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/fraplin.json")));
        assert!(matches!(result, Err(FraplinError::Config(_))));
    }

    #[test]
    fn test_parse_config_unsupported_extension() {
        let result = parse_config("site: {}", Path::new("fraplin.yaml"));
        assert!(matches!(result, Err(FraplinError::Config(msg)) if msg.contains("yaml")));
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let result = parse_config(r#"{ "site": "#, Path::new("fraplin.json"));
        assert!(matches!(result, Err(FraplinError::Config(msg)) if msg.contains("JSON")));
    }
}
