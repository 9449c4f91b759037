use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

/// Default REST API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Errors raised while loading or validating a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported configuration format `{0}`; use yaml, json or toml")]
    UnsupportedFormat(String),
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid {name} value `{value}`")]
    InvalidValue { name: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for talking to the job board API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub api_base_url: String,

    /// Logging filter directive (e.g. `info`, `frontend=debug`).
    pub log_level: String,

    /// Page size applied to list queries that do not set one.
    pub page_size: u32,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates a default configuration.
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            log_level: "info".to_string(),
            page_size: crate::models::filters::DEFAULT_LIMIT,
            request_timeout_secs: 30,
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// File values win over defaults; `JOBBOARD_*` variables only fill in
    /// values the file left at their defaults; `api_override` wins over both.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, an environment
    /// variable holds an invalid value, or the result fails validation.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_config(
        config_path: Option<PathBuf>,
        api_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration file");
                Self::from_file(&path)?
            }
            None => Self::with_defaults(),
        };

        config.apply_env_overrides(|name| std::env::var(name).ok())?;

        if let Some(url) = api_override {
            config.api_base_url = url;
        }

        config.normalize();
        config.validate()?;
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => {
                serde_yml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            Some("toml") => {
                toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Serializes the configuration in the given format (`yaml`, `json`, `toml`).
    ///
    /// # Errors
    /// Returns an error for unknown formats or serialization failures.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn render(&self, format: &str) -> Result<String, ConfigError> {
        match format {
            "yaml" | "yml" => {
                serde_yml::to_string(self).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            "json" => serde_json::to_string_pretty(self)
                .map_err(|err| ConfigError::Parse(err.to_string())),
            "toml" => toml::to_string(self).map_err(|err| ConfigError::Parse(err.to_string())),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Fills values still at their defaults from `JOBBOARD_*` variables.
    ///
    /// # Errors
    /// Returns an error when a numeric variable does not parse.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::with_defaults();

        if self.api_base_url == defaults.api_base_url {
            if let Some(url) = lookup("JOBBOARD_API_URL") {
                self.api_base_url = url;
            }
        }
        if self.log_level == defaults.log_level {
            if let Some(level) = lookup("JOBBOARD_LOG_LEVEL") {
                self.log_level = level;
            }
        }
        if self.page_size == defaults.page_size {
            if let Some(value) = lookup("JOBBOARD_PAGE_SIZE") {
                self.page_size = value.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "JOBBOARD_PAGE_SIZE",
                    value,
                })?;
            }
        }
        if self.request_timeout_secs == defaults.request_timeout_secs {
            if let Some(value) = lookup("JOBBOARD_REQUEST_TIMEOUT_SECS") {
                self.request_timeout_secs =
                    value.parse().map_err(|_| ConfigError::InvalidValue {
                        name: "JOBBOARD_REQUEST_TIMEOUT_SECS",
                        value,
                    })?;
            }
        }
        Ok(())
    }

    fn normalize(&mut self) {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        self.api_base_url = trimmed.to_string();
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.is_empty() {
            return Err(ConfigError::Invalid("api_base_url must not be empty".into()));
        }
        if !(self.api_base_url.starts_with("http://")
            || self.api_base_url.starts_with("https://")
            || self.api_base_url.starts_with('/'))
        {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must be an http(s) URL or an absolute path, got `{}`",
                self.api_base_url
            )));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be greater than 0".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_with_defaults() {
        let config = ClientConfig::with_defaults();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_fill_default_values() {
        let mut config = ClientConfig::with_defaults();
        config
            .apply_env_overrides(env_from(&[
                ("JOBBOARD_API_URL", "https://jobs.example.com/api"),
                ("JOBBOARD_PAGE_SIZE", "25"),
            ]))
            .unwrap();

        assert_eq!(config.api_base_url, "https://jobs.example.com/api");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn env_does_not_override_file_values() {
        let mut config = ClientConfig {
            log_level: "warn".to_string(),
            ..ClientConfig::with_defaults()
        };
        config
            .apply_env_overrides(env_from(&[("JOBBOARD_LOG_LEVEL", "trace")]))
            .unwrap();
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn invalid_numeric_env_is_rejected() {
        let mut config = ClientConfig::with_defaults();
        let err = config
            .apply_env_overrides(env_from(&[("JOBBOARD_PAGE_SIZE", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("JOBBOARD_PAGE_SIZE"));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let config = ClientConfig {
            api_base_url: "ftp://nope".to_string(),
            ..ClientConfig::with_defaults()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            page_size: 0,
            ..ClientConfig::with_defaults()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn load_yaml_file_and_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.yaml");
        fs::write(
            &path,
            "api_base_url: \"https://staging.example.com/api/\"\nlog_level: debug\n",
        )
        .unwrap();

        let config = ClientConfig::load_config(Some(path.clone()), None).unwrap();
        assert_eq!(config.api_base_url, "https://staging.example.com/api");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.page_size, 10);

        let config =
            ClientConfig::load_config(Some(path), Some("http://127.0.0.1:9000/api".into()))
                .unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000/api");
    }

    #[test]
    #[serial]
    fn load_toml_and_json_files() {
        let dir = TempDir::new().unwrap();
        let toml_path = dir.path().join("client.toml");
        fs::write(&toml_path, "page_size = 50\n").unwrap();
        let config = ClientConfig::load_config(Some(toml_path), None).unwrap();
        assert_eq!(config.page_size, 50);

        let json_path = dir.path().join("client.json");
        fs::write(&json_path, r#"{"request_timeout_secs": 5}"#).unwrap();
        let config = ClientConfig::load_config(Some(json_path), None).unwrap();
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.ini");
        fs::write(&path, "page_size=1").unwrap();
        let err = ClientConfig::load_config(Some(path), None).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn render_roundtrips_through_yaml() {
        let config = ClientConfig::with_defaults();
        let yaml = config.render("yaml").unwrap();
        let parsed: ClientConfig = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
        assert!(config.render("ini").is_err());
    }
}
