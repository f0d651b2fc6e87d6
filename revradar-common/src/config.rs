//! Configuration loading and API base URL resolution
//!
//! The analysis backend base URL is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`REVRADAR_API_URL`)
//! 3. TOML config file (`api_base_url`)
//! 4. Compiled default (`http://localhost:8000`)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Compiled default backend location
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the backend location
pub const API_URL_ENV_VAR: &str = "REVRADAR_API_URL";

/// Transport timeout applied when the TOML config does not set one
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Contents of `config.toml`
///
/// Every field is optional; a missing file is equivalent to an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Analysis backend base URL
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Transport timeout for analysis requests (seconds)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the config file, falling back to defaults when it does not exist
    ///
    /// `path` overrides the platform default location. An existing file that
    /// cannot be read or parsed is still an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => path,
            None => {
                warn!("Could not determine config directory, using defaults");
                return Ok(Self::default());
            }
        };

        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let config = Self::load(&path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Transport timeout for analysis requests
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

/// Platform config file location (`<config_dir>/revradar/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("revradar").join("config.toml"))
}

/// Resolve the backend base URL from CLI → ENV → TOML → default
///
/// Blank values at any tier are skipped. The winning value is validated and
/// has any trailing `/` removed.
pub fn resolve_api_base_url(cli_arg: Option<&str>, toml_config: &TomlConfig) -> Result<String> {
    // Priority 1: Command-line argument
    if let Some(url) = cli_arg.filter(|u| is_set(u)) {
        info!("API base URL taken from command line");
        return normalize_base_url(url);
    }

    // Priority 2: Environment variable
    if let Ok(url) = std::env::var(API_URL_ENV_VAR) {
        if is_set(&url) {
            info!("API base URL loaded from {}", API_URL_ENV_VAR);
            return normalize_base_url(&url);
        }
    }

    // Priority 3: TOML config file
    if let Some(url) = toml_config.api_base_url.as_deref().filter(|u| is_set(u)) {
        info!("API base URL loaded from TOML config");
        return normalize_base_url(url);
    }

    // Priority 4: Compiled default
    Ok(DEFAULT_API_BASE_URL.to_string())
}

/// Validate scheme and strip trailing slashes
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host_part = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| {
            Error::Config(format!(
                "API base URL must start with http:// or https://, got {:?}",
                raw
            ))
        })?;

    if host_part.is_empty() {
        return Err(Error::Config(format!("API base URL has no host: {:?}", raw)));
    }

    Ok(trimmed.to_string())
}

fn is_set(value: &str) -> bool {
    !value.trim().is_empty()
}
