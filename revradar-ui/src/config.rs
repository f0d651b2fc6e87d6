//! Configuration resolution for revradar-ui
//!
//! Combines command-line overrides with the shared TOML config to produce
//! the settings the front end runs with.

use revradar_common::config::{resolve_api_base_url, TomlConfig};
use revradar_common::Result;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Resolved client settings
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    /// Backend base URL, without trailing slash
    pub api_base_url: String,
    /// Transport timeout for each analysis request
    pub request_timeout: Duration,
    /// Default log filter directive
    pub log_level: String,
}

impl ClientSettings {
    /// Resolve settings from CLI arguments and the TOML config
    ///
    /// **Priority** for the base URL: CLI → ENV → TOML → default
    pub fn resolve(cli_api_url: Option<&str>, config_path: Option<&Path>) -> Result<Self> {
        let toml_config = TomlConfig::load_or_default(config_path)?;
        Self::from_toml(cli_api_url, &toml_config)
    }

    pub fn from_toml(cli_api_url: Option<&str>, toml_config: &TomlConfig) -> Result<Self> {
        let api_base_url = resolve_api_base_url(cli_api_url, toml_config)?;
        let request_timeout = toml_config.request_timeout();

        info!(
            api_base_url = %api_base_url,
            timeout_secs = request_timeout.as_secs(),
            "Client settings resolved"
        );

        Ok(Self {
            api_base_url,
            request_timeout,
            log_level: toml_config.logging.level.clone(),
        })
    }
}
