//! Configuration module for the panel front ends
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional `panel.toml` (or the file named by `PANEL_CONFIG`), then
//! environment variables prefixed with `PANEL_`.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// Default backend location
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
/// Same-origin path prefix forwarding to the messaging gateway
pub const DEFAULT_GATEWAY_PREFIX: &str = "/wabot";
/// Header carrying the session token
pub const DEFAULT_AUTH_HEADER: &str = "X-Auth";
/// Directory name under the user's config dir holding the token store
pub const STATE_DIR_NAME: &str = "wabot-admin";

/// Panel configuration struct
#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    /// Base URL of the admin backend
    pub base_url: String,
    /// Path prefix of the gateway proxy
    pub gateway_prefix: String,
    /// Name of the header carrying the token
    pub auth_header: String,
    /// Directory holding the persisted token
    pub state_dir: PathBuf,
    /// Optional request timeout; requests never time out when unset
    pub request_timeout_secs: Option<u64>,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
}

impl PanelConfig {
    /// Load the configuration from defaults, an optional file and the environment
    ///
    /// # Environment Variables
    /// - `PANEL_CONFIG`: config file name without extension (default: "panel")
    /// - `PANEL_BASE_URL`: backend base URL (default: "http://127.0.0.1:8080")
    /// - `PANEL_GATEWAY_PREFIX`: gateway proxy prefix (default: "/wabot")
    /// - `PANEL_AUTH_HEADER`: token header name (default: "X-Auth")
    /// - `PANEL_STATE_DIR`: token store directory
    /// - `PANEL_REQUEST_TIMEOUT_SECS`: request timeout in seconds (default: none)
    /// - `PANEL_LOG_LEVEL`: fallback log level (default: "warn")
    pub fn from_env() -> ClientResult<Self> {
        let file = std::env::var("PANEL_CONFIG").unwrap_or_else(|_| "panel".to_string());

        let settings = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)
            .and_then(|b| b.set_default("gateway_prefix", DEFAULT_GATEWAY_PREFIX))
            .and_then(|b| b.set_default("auth_header", DEFAULT_AUTH_HEADER))
            .and_then(|b| {
                b.set_default("state_dir", default_state_dir().to_string_lossy().to_string())
            })
            .and_then(|b| b.set_default("log_level", "warn"))
            .map_err(|e| ClientError::Configuration(e.to_string()))?
            .add_source(File::with_name(&file).required(false))
            .add_source(Environment::with_prefix("PANEL"))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        let config: PanelConfig = settings
            .try_deserialize()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        config.validated()
    }

    /// Configuration pointing at `base_url` with every other setting defaulted
    pub fn new(base_url: impl Into<String>, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            gateway_prefix: DEFAULT_GATEWAY_PREFIX.to_string(),
            auth_header: DEFAULT_AUTH_HEADER.to_string(),
            state_dir: state_dir.into(),
            request_timeout_secs: None,
            log_level: "warn".to_string(),
        }
    }

    /// Replace the base URL when the command line supplied one
    pub fn with_base_url(mut self, base_url: Option<String>) -> ClientResult<Self> {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        self.validated()
    }

    /// Request timeout, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn validated(mut self) -> ClientResult<Self> {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            return Err(ClientError::Configuration("base_url must not be empty".into()));
        }
        if !self.gateway_prefix.starts_with('/') {
            self.gateway_prefix.insert(0, '/');
        }
        self.gateway_prefix = self.gateway_prefix.trim_end_matches('/').to_string();
        if self.auth_header.trim().is_empty() {
            return Err(ClientError::Configuration("auth_header must not be empty".into()));
        }
        Ok(self)
    }
}

fn default_state_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STATE_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_panel_config_from_env_defaults() {
        // SAFETY: serialized with the other environment tests
        unsafe {
            std::env::set_var("PANEL_CONFIG", "panel-defaults-test-absent");
            for key in [
                "PANEL_BASE_URL",
                "PANEL_GATEWAY_PREFIX",
                "PANEL_AUTH_HEADER",
                "PANEL_STATE_DIR",
                "PANEL_REQUEST_TIMEOUT_SECS",
                "PANEL_LOG_LEVEL",
            ] {
                std::env::remove_var(key);
            }
        }
        let config = PanelConfig::from_env();
        unsafe {
            std::env::remove_var("PANEL_CONFIG");
        }

        let config = config.expect("Failed to create panel config");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.gateway_prefix, "/wabot");
        assert_eq!(config.auth_header, "X-Auth");
        assert!(config.request_timeout().is_none());
        assert!(config.state_dir.ends_with(STATE_DIR_NAME));
    }

    #[test]
    #[serial]
    fn test_panel_config_env_override() {
        // SAFETY: serialized with the other environment tests
        unsafe {
            std::env::set_var("PANEL_BASE_URL", "http://admin.local:9000/");
            std::env::set_var("PANEL_REQUEST_TIMEOUT_SECS", "15");
        }
        let config = PanelConfig::from_env();
        unsafe {
            std::env::remove_var("PANEL_BASE_URL");
            std::env::remove_var("PANEL_REQUEST_TIMEOUT_SECS");
        }

        let config = config.expect("Failed to create panel config");
        assert_eq!(config.base_url, "http://admin.local:9000");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_cli_base_url_override() {
        let config = PanelConfig::new(DEFAULT_BASE_URL, "/tmp/state")
            .with_base_url(Some("https://panel.example.com/".to_string()))
            .unwrap();
        assert_eq!(config.base_url, "https://panel.example.com");

        let err = PanelConfig::new(DEFAULT_BASE_URL, "/tmp/state")
            .with_base_url(Some("  ".to_string()))
            .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_gateway_prefix_normalized() {
        let mut config = PanelConfig::new(DEFAULT_BASE_URL, "/tmp/state");
        config.gateway_prefix = "wabot/".to_string();
        let config = config.with_base_url(None).unwrap();
        assert_eq!(config.gateway_prefix, "/wabot");
    }
}
