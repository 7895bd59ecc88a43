//! Client configuration: API location, credentials and timeout.
//!
//! Each setting is resolved independently, first match wins:
//! explicit override, then environment variable, then config file, then
//! the built-in default.
//!
//! # Example
//!
//! ```toml
//! [api]
//! base_url = "https://maintenance.example.com"
//! token = "eyJhbGciOi..."
//! timeout_secs = 10
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "millwright.toml";

pub const ENV_API_URL: &str = "MILLWRIGHT_API_URL";
pub const ENV_TOKEN: &str = "MILLWRIGHT_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "MILLWRIGHT_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read '{path}': {message}")]
    Read { path: PathBuf, message: String },

    #[error("could not parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid {setting} '{value}': {reason}")]
    Invalid {
        setting: &'static str,
        value: String,
        reason: String,
    },
}

// ── File format ───────────────────────────────────────────────────────────────

/// Top-level `millwright.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub api: ApiSection,
}

/// `[api]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read `explicit` if given (it must exist), else `./millwright.toml` if
    /// present, else an empty config.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::read(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

// ── Resolved configuration ────────────────────────────────────────────────────

/// Values given explicitly (command-line flags).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server root without trailing slash; requests go to `<base_url>/api/...`.
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: normalize_base_url(&base_url.into()),
            ..Default::default()
        }
    }

    /// Resolve against the process environment.
    pub fn resolve(overrides: ConfigOverrides, file: &ConfigFile) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, file, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        file: &ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let base_url = overrides
            .base_url
            .or_else(|| env(ENV_API_URL))
            .or_else(|| file.api.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                setting: "api url",
                value: base_url,
                reason: "expected an http:// or https:// URL".to_string(),
            });
        }

        let token = overrides
            .token
            .or_else(|| env(ENV_TOKEN))
            .or_else(|| file.api.token.clone())
            .filter(|t| !t.is_empty());

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match env(ENV_TIMEOUT_SECS) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                    setting: "timeout",
                    value: raw.clone(),
                    reason: "expected a whole number of seconds".to_string(),
                })?,
                None => file.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        };

        Ok(ClientConfig {
            base_url: normalize_base_url(&base_url),
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn file(toml_src: &str) -> ConfigFile {
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config =
            ClientConfig::resolve_with(ConfigOverrides::default(), &ConfigFile::default(), env_of(&[]))
                .unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = file(
            r#"
            [api]
            base_url = "http://file:1"
            token = "file-token"
            timeout_secs = 5
            "#,
        );
        let env = env_of(&[(ENV_API_URL, "http://env:2/"), (ENV_TOKEN, "env-token")]);
        let overrides = ConfigOverrides {
            base_url: Some("http://flag:3".into()),
            ..Default::default()
        };
        let config = ClientConfig::resolve_with(overrides, &file, env).unwrap();
        assert_eq!(config.base_url, "http://flag:3");
        assert_eq!(config.token.as_deref(), Some("env-token"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let env = env_of(&[(ENV_API_URL, "http://env:2/")]);
        let config =
            ClientConfig::resolve_with(ConfigOverrides::default(), &ConfigFile::default(), env)
                .unwrap();
        assert_eq!(config.base_url, "http://env:2");
    }

    #[test]
    fn bad_timeout_env_is_rejected() {
        let env = env_of(&[(ENV_TIMEOUT_SECS, "soon")]);
        let err = ClientConfig::resolve_with(ConfigOverrides::default(), &ConfigFile::default(), env)
            .unwrap_err();
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let overrides = ConfigOverrides {
            base_url: Some("localhost:5000".into()),
            ..Default::default()
        };
        let err = ClientConfig::resolve_with(overrides, &ConfigFile::default(), env_of(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { setting: "api url", .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str("[api]\nbase_uri = \"http://x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            ConfigFile::discover(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));

        let present = dir.path().join("millwright.toml");
        std::fs::write(&present, "[api]\ntimeout_secs = 3\n").unwrap();
        let loaded = ConfigFile::discover(Some(&present)).unwrap();
        assert_eq!(loaded.api.timeout_secs, Some(3));
    }
}
