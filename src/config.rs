//! Gateway Configuration
//!
//! Base URL and timeout are baked in at build time from `API_BASE_URL` and
//! `API_TIMEOUT_MS`.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl GatewayConfig {
    /// Read the build-time environment
    pub fn from_env() -> Self {
        Self::from_values(option_env!("API_BASE_URL"), option_env!("API_TIMEOUT_MS"))
    }

    /// Build from raw values; blank or unparsable entries keep the default
    pub fn from_values(base_url: Option<&str>, timeout_ms: Option<&str>) -> Self {
        let defaults = Self::default();
        let base_url = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        let timeout = timeout_ms
            .and_then(|ms| ms.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout);
        Self { base_url, timeout }
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
