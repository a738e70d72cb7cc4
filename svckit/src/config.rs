use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ApiError;
use crate::filters::DEFAULT_PAGE_SIZE;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminDashConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            recent_limit: default_recent_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: default_log_file(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from(".glohorizon/credentials.json")
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_recent_limit() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("admin-dash.log")
}

/// Load configuration from a YAML/TOML file overlaid by `ADMIN_DASH__*`
/// environment variables. The file is optional; every field has a default.
pub fn load_config(path: &str) -> Result<AdminDashConfig, ApiError> {
    let config = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(Environment::with_prefix("ADMIN_DASH").separator("__"))
        .build()?;

    let settings: AdminDashConfig = config.try_deserialize()?;
    debug!(
        base_url = %settings.api.base_url,
        timeout_secs = settings.api.timeout_secs,
        "Loaded admin-dash configuration"
    );

    if settings.dashboard.page_size == 0 {
        return Err(ApiError::Config("dashboard.page_size must be positive".to_string()));
    }
    if settings.api.timeout_secs == 0 {
        return Err(ApiError::Config("api.timeout_secs must be positive".to_string()));
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_file_missing() {
        let settings = load_config("does/not/exist/admin-dash").unwrap();
        assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.api.timeout(), Duration::from_secs(30));
        assert_eq!(settings.dashboard.page_size, 10);
        assert_eq!(settings.dashboard.recent_limit, 5);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "api:\n  base_url: https://api.example.com/api\n  timeout_secs: 5").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let settings = load_config(&path).unwrap();

        assert_eq!(settings.api.base_url, "https://api.example.com/api");
        assert_eq!(settings.api.timeout_secs, 5);
        assert_eq!(settings.dashboard.page_size, 10);
        assert_eq!(settings.observability.log_level, "info");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "dashboard:\n  page_size: 0").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        assert!(matches!(load_config(&path), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "api:
  timeout_secs: 0").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        assert!(matches!(load_config(&path), Err(ApiError::Config(_))));
    }
}
