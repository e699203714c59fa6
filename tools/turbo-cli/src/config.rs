//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_auth::{Actor, Role};
use turbo_data::ClientConfig;

/// File names searched for, nearest directory first.
pub const CONFIG_NAMES: [&str; 3] = ["turbo.toml", ".turbo.toml", "turbo.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend connection.
    #[serde(default)]
    pub api: ClientConfig,

    /// Who the CLI acts as.
    #[serde(default)]
    pub session: SessionConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Apply `TURBO_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("TURBO_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(token) = lookup("TURBO_ACCESS_TOKEN") {
            self.session.access_token = Some(token);
        }
        if let Some(token) = lookup("TURBO_REFRESH_TOKEN") {
            self.session.refresh_token = Some(token);
        }
    }

    /// A copy that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.session.access_token = config.session.access_token.map(|_| REDACTED.to_string());
        config.session.refresh_token = config.session.refresh_token.map(|_| REDACTED.to_string());
        config
    }

    /// Errors and warnings found in the configuration.
    pub fn check(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if let Err(e) = self.api.validate() {
            errors.push(format!("api: {}", e));
        }

        let session = &self.session;
        if session.access_token.is_none() {
            warnings.push("session.access_token is not set, requests will be rejected".to_string());
        }
        if session.refresh_token.is_some() && session.access_token.is_none() {
            warnings.push("session.refresh_token is set without an access token".to_string());
        }
        if session.user_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            warnings.push("session.user_id is not set, `orders advance` and `orders list --all` need it".to_string());
        }

        (errors, warnings)
    }
}

const REDACTED: &str = "********";

/// Session settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// The logged in user's id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// The logged in user's role.
    #[serde(default)]
    pub role: Role,

    /// Bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Token used to renew the bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl SessionConfig {
    /// The actor the session represents.
    pub fn actor(&self) -> Option<Actor> {
        self.user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(|id| Actor::new(id, self.role))
    }
}

/// Generate a default turbo.toml config file.
pub fn generate_default_config() -> String {
    r#"# TurboCommerce CLI configuration

[api]
base_url = "http://localhost:5000/api"
refresh_path = "/auth/refresh-token"

[api.timeout]
connect_ms = 3000
total_ms = 15000

[session]
# user_id = "your-user-id"
role = "user"
# Prefer TURBO_ACCESS_TOKEN and TURBO_REFRESH_TOKEN over storing tokens here.
# access_token = ""
# refresh_token = ""
"#
    .to_string()
}
