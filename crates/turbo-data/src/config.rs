//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default renewal endpoint.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh-token";

/// Timeout configuration for backend calls.
///
/// There is no retry budget: a request that times out fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection timeout in milliseconds.
    pub connect_ms: u64,
    /// Total operation timeout in milliseconds.
    pub total_ms: u64,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self {
            connect_ms: connect.as_millis() as u64,
            total_ms: total.as_millis() as u64,
        }
    }

    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self::new(total / 4, total)
    }

    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn total(&self) -> Duration {
        Duration::from_millis(self.total_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: 3_000,
            total_ms: 15_000,
        }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend API root, e.g. `https://market.example.com/api`.
    pub base_url: String,
    /// Timeouts.
    pub timeout: TimeoutConfig,
    /// Path of the token renewal endpoint.
    pub refresh_path: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Check the settings before building a client.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url is required".to_string());
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!(
                "base_url must start with http:// or https://: {}",
                self.base_url
            ));
        }
        if self.timeout.total_ms == 0 {
            return Err("timeout.total_ms must be greater than zero".to_string());
        }
        if self.timeout.connect_ms > self.timeout.total_ms {
            return Err("timeout.connect_ms cannot exceed timeout.total_ms".to_string());
        }
        if !self.refresh_path.starts_with('/') {
            return Err(format!("refresh_path must start with '/': {}", self.refresh_path));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout: TimeoutConfig::default(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.refresh_path, "/auth/refresh-token");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"https://market.test/api","timeout":{"total_ms":500}}"#)
                .unwrap();
        assert_eq!(config.base_url, "https://market.test/api");
        assert_eq!(config.timeout.total(), Duration::from_millis(500));
        assert_eq!(config.timeout.connect_ms, 3_000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        assert!(ClientConfig::new("market.test").validate().is_err());
        assert!(ClientConfig::new("").validate().is_err());
    }

    #[test]
    fn test_from_total() {
        let timeout = TimeoutConfig::from_total(Duration::from_secs(8));
        assert_eq!(timeout.connect(), Duration::from_secs(2));
        assert_eq!(timeout.total(), Duration::from_secs(8));
    }
}
