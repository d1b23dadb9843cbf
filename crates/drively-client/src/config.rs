//! # Client Configuration
//!
//! Where the backend lives and how the client talks to it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DRIVELY_API_URL=https://api.drively.example/api/v1                 │
//! │     DRIVELY_API_TOKEN=eyJhbGciOi...                                    │
//! │     DRIVELY_TIMEOUT_SECS=15                                            │
//! │     DRIVELY_CACHE_TTL_SECS=30                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/drively/client.toml (Linux)                              │
//! │     ~/Library/Application Support/com.drively.drively/client.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:5000/api/v1, 10s timeout, 60s cache               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! base_url = "https://api.drively.example/api/v1"
//! timeout_secs = 10
//!
//! [cache]
//! enabled = true
//! ttl_secs = 60
//! max_entries = 1000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every path is appended to, e.g. `https://host/api/v1`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token. Usually supplied through `DRIVELY_API_TOKEN` rather
    /// than written to disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:5000/api/v1".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("drively-client/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

// =============================================================================
// Cache Settings
// =============================================================================

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// How long a cached read stays fresh (seconds).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Upper bound on cached reads. Car searches are keyed by their query,
    /// so this keeps a long browsing session from growing without limit.
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

fn default_true() -> bool {
    true
}

fn default_ttl() -> u64 {
    60
}

fn default_max_entries() -> u64 {
    1_000
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            enabled: true,
            ttl_secs: default_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub cache: CacheSettings,
}

impl ClientConfig {
    /// Config pointing at `base_url` with everything else defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.api.base_url = base_url.into();
        config
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file. The token is never written.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        let write_failed =
            |err: std::io::Error| ClientError::ConfigSaveFailed(format!("{}: {}", path.display(), err));

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_failed)?;
        }

        let mut on_disk = self.clone();
        on_disk.api.token = None;
        let contents = toml::to_string_pretty(&on_disk)?;
        std::fs::write(&path, contents).map_err(write_failed)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = self.base_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DRIVELY_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(token) = std::env::var("DRIVELY_API_TOKEN") {
            if !token.trim().is_empty() {
                self.api.token = Some(token.trim().to_string());
            }
        }

        if let Ok(timeout) = std::env::var("DRIVELY_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid DRIVELY_TIMEOUT_SECS"),
            }
        }

        if let Ok(ttl) = std::env::var("DRIVELY_CACHE_TTL_SECS") {
            match ttl.parse::<u64>() {
                Ok(secs) => self.cache.ttl_secs = secs,
                Err(_) => warn!(value = %ttl, "Ignoring invalid DRIVELY_CACHE_TTL_SECS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "drively", "drively")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Parsed base URL.
    pub fn base_url(&self) -> ClientResult<Url> {
        Ok(Url::parse(&self.api.base_url)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Cache lifetime, or `None` when caching is off.
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache.enabled && self.cache.ttl_secs > 0 && self.cache.max_entries > 0)
            .then(|| Duration::from_secs(self.cache.ttl_secs))
    }
}
