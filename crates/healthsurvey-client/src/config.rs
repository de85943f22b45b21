use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConfigError, StorageError};
use crate::gateway::{DEFAULT_BASE_URL, GatewayConfig};
use crate::session::FileStorage;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "HEALTHSURVEY_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub monitor: MonitorSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.api.base_url)
            .map_err(|e| format!("api.base_url is not a valid URL: {e}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err("api.base_url must use http or https".into());
        }
        if self.api.timeout_ms == 0 {
            return Err("api.timeout_ms must be > 0".into());
        }
        if self.monitor.interval_secs == 0 {
            return Err("monitor.interval_secs must be > 0".into());
        }
        let profile = &self.storage.profile;
        if profile.is_empty() || profile.contains(['/', '\\']) {
            return Err("storage.profile must be a non-empty name without path separators".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.interval_secs)
    }

    pub fn gateway_config(&self) -> Result<GatewayConfig, ConfigError> {
        let base_url = Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::Invalid(format!("api.base_url: {e}")))?;
        Ok(GatewayConfig::new(base_url).with_timeout(self.timeout()))
    }

    /// File-backed session storage for the configured profile.
    pub fn session_storage(&self) -> Result<FileStorage, StorageError> {
        FileStorage::for_profile(self.storage.dir.as_deref(), &self.storage.profile)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory for persisted session files. Defaults to `~/.healthsurvey`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Name of the stored session; lets one machine keep several logins.
    #[serde(default = "default_profile")]
    pub profile: String,
}

fn default_profile() -> String {
    "default".into()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: None,
            profile: default_profile(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    30
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::{API_URL_ENV, ClientConfig};
    use crate::error::ConfigError;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_FILE: &str = "healthsurvey.toml";

    /// Loads `path` (or `./healthsurvey.toml` when present), then applies
    /// `HEALTHSURVEY__SECTION__KEY` overrides and `HEALTHSURVEY_API_URL`.
    pub fn load_config(path: Option<&str>) -> Result<ClientConfig, ConfigError> {
        let mut builder = Config::builder();
        let file = path.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if file.exists() {
            builder = builder.add_source(File::from(file));
        } else if path.is_some() {
            return Err(ConfigError::Build(format!(
                "config file not found: {}",
                file.display()
            )));
        }
        // e.g. HEALTHSURVEY__API__TIMEOUT_MS=5000
        builder = builder.add_source(
            Environment::with_prefix("HEALTHSURVEY")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| ConfigError::Build(e.to_string()))?;
        let mut merged: ClientConfig = cfg
            .try_deserialize()
            .map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            merged.api.base_url = url.trim().to_string();
        }
        merged.validate().map_err(ConfigError::Invalid)?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ClientConfig::default();
        cfg.validate().expect("defaults validate");
        assert_eq!(cfg.api.base_url, "http://localhost:8000/api");
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.probe_interval(), Duration::from_secs(30));
        let gw = cfg.gateway_config().unwrap();
        assert_eq!(gw.login_path, "/login");
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = ClientConfig::default();
        cfg.api.base_url = "ftp://example.org".into();
        assert!(cfg.validate().unwrap_err().contains("http or https"));

        let mut cfg = ClientConfig::default();
        cfg.api.timeout_ms = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ClientConfig::default();
        cfg.storage.profile = "../etc".into();
        assert!(cfg.validate().is_err());

        let mut cfg = ClientConfig::default();
        cfg.logging.level = "loud".into();
        assert!(cfg.validate().unwrap_err().contains("logging.level"));
    }
}
