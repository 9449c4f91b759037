//! Frontend configuration module
//!
//! Build-time settings for the browser bundle, which cannot read config files
//! or the environment at run time.

use shared::config::ClientConfig;
use shared::models::filters::DEFAULT_LIMIT;

const DEFAULT_API_URL: &str = "/api";

/// Frontend configuration baked in at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Base URL of the REST API
    pub api_base_url: String,
    /// Page size for list queries
    pub page_size: u32,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("JOBBOARD_API_URL")
                .unwrap_or(DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            page_size: option_env!("JOBBOARD_PAGE_SIZE")
                .and_then(|value| value.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_LIMIT),
        }
    }
}

impl FrontendConfig {
    /// Create a new frontend configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// The same settings as a [`ClientConfig`], for building the API client.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.api_base_url.clone(),
            page_size: self.page_size,
            ..ClientConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = FrontendConfig::new();
        assert!(!config.api_base_url().is_empty());
        assert!(!config.api_base_url().ends_with('/'));
        assert!(config.page_size > 0);
    }

    #[test]
    fn converts_to_client_config() {
        let config = FrontendConfig {
            api_base_url: "https://jobs.example.com/api".into(),
            page_size: 25,
        };
        let client = config.to_client_config();
        assert_eq!(client.api_base_url, "https://jobs.example.com/api");
        assert_eq!(client.page_size, 25);
        assert_eq!(client.log_level, "info");
    }
}
