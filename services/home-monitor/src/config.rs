//! Configuration types for the home monitor dashboard

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`ApiConfig::base_url`]
pub const ENV_API_BASE_URL: &str = "HOME_MONITOR_API_BASE_URL";

/// Environment variable overriding [`ApiConfig::default_model`]
pub const ENV_DEFAULT_MODEL: &str = "HOME_MONITOR_DEFAULT_MODEL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base path or absolute URL of the backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Origin that relative base paths are resolved against
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Preferred AI model, selected by default when the backend offers it
    #[serde(default)]
    pub default_model: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            origin: default_origin(),
            default_model: None,
        }
    }
}

impl ApiConfig {
    /// Absolute base URL without a trailing slash
    pub fn resolved_base_url(&self) -> String {
        let base = self.base_url.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            return base.trim_end_matches('/').to_string();
        }

        let origin = self.origin.trim().trim_end_matches('/');
        let path = base.trim_matches('/');
        if path.is_empty() {
            origin.to_string()
        } else {
            format!("{}/{}", origin, path)
        }
    }
}

/// Local view server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
        }
    }
}

impl Config {
    /// Apply environment overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using the given variable lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(base_url) = non_empty(ENV_API_BASE_URL) {
            tracing::debug!("{} overrides API base URL: {}", ENV_API_BASE_URL, base_url);
            self.api.base_url = base_url;
        }
        if let Some(model) = non_empty(ENV_DEFAULT_MODEL) {
            tracing::debug!("{} overrides default model: {}", ENV_DEFAULT_MODEL, model);
            self.api.default_model = Some(model);
        }
    }
}

fn default_base_url() -> String {
    "/api".to_string()
}

fn default_origin() -> String {
    "http://localhost:8000".to_string()
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    11120
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::HomeMonitorError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
