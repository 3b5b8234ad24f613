//! Relay configuration.
//!
//! Loaded from an optional TOML file; every section falls back to defaults,
//! and command-line overrides are applied on top before validation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use meowfacts_core::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Upper bound on the outbound timeout.
pub const MAX_TIMEOUT_MS: u64 = 300_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RelayConfig {
    pub listener: ListenerConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Remote fact service settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,

    /// Covers connect, send and body read of the single outbound call.
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence when set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "meowfacts_server=info,meowfacts_core=info,tower_http=info".to_string(),
        }
    }
}

/// Values given on the command line. `None` keeps the file/default value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_address: Option<String>,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl RelayConfig {
    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: RelayConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides and re-validate.
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self, ConfigError> {
        if let Some(bind_address) = overrides.bind_address {
            self.listener.bind_address = bind_address;
        }
        if let Some(base_url) = overrides.base_url {
            self.upstream.base_url = base_url;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.upstream.timeout_ms = timeout_ms;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        self.upstream_url()?;
        if self.upstream.timeout_ms == 0 || self.upstream.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "upstream.timeout_ms must be between 1 and {MAX_TIMEOUT_MS}, got {}",
                self.upstream.timeout_ms
            )));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listener.bind_address.parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "listener.bind_address '{}' is not a socket address",
                self.listener.bind_address
            ))
        })
    }

    /// The upstream base URL; must be http(s) and able to carry a query.
    pub fn upstream_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.upstream.base_url).map_err(|e| {
            ConfigError::Invalid(format!(
                "upstream.base_url '{}' is not a URL: {e}",
                self.upstream.base_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "upstream.base_url '{}' must be an http or https URL",
                self.upstream.base_url
            )));
        }
        Ok(url)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream.timeout_ms)
    }
}
