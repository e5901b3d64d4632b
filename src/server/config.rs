//! Configuration loading for marketscoped.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.marketscope/config.toml` (user)
//! 3. `/etc/marketscope/config.toml` (system)
//!
//! Unlike the API key, no file is required: without one the compiled-in
//! defaults apply.
//!
//! The API key is loaded separately with mandatory permission checks:
//! 1. `~/.marketscope/secrets.toml` (user, must be 0600)
//! 2. `/etc/marketscope/secrets.toml` (system, must be 0600)
//! 3. `OPENAI_API_KEY` environment variable

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::providers::RetryConfig;
use crate::types::{
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GenerateOptions, millis,
};
use crate::{MarketscopeError, Result};

/// Environment variable consulted when no secrets file provides a key.
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000).
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            limits: LimitsConfig::default(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:3000".to_string()
}

/// Resource limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Wall-clock ceiling for one HTTP request in seconds (default: 30).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

/// Outbound generation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-attempt timeout in milliseconds (default: 8000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Additional attempts after the first failure (default: 2).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Pause between attempts in milliseconds (default: 1000).
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
    /// Provider base URL override (e.g. a proxy).
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_interval_ms: default_retry_interval_ms(),
            base_url: None,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_timeout_ms() -> u64 {
    8_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_interval_ms() -> u64 {
    1000
}

impl GenerationConfig {
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions::new(&self.model)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
    }

    pub fn retry(&self) -> RetryConfig {
        RetryConfig::new()
            .max_retries(self.max_retries)
            .retry_interval(Duration::from_millis(self.retry_interval_ms))
            .attempt_timeout(Duration::from_millis(self.timeout_ms))
    }
}

impl Config {
    /// Load configuration from the standard locations, falling back to
    /// defaults when no file exists. An explicit path must exist.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a specific config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MarketscopeError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MarketscopeError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MarketscopeError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".marketscope").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/marketscope/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Endpoint wall-clock ceiling.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.limits.request_timeout_secs)
    }

    /// Startup checks. Every attempt, pause and retry together must fit
    /// below the endpoint ceiling so a slow provider yields a clean 504
    /// envelope instead of the ceiling's bare timeout response.
    pub fn validate(&self) -> Result<()> {
        if self.generation.timeout_ms == 0 {
            return Err(MarketscopeError::Configuration(
                "generation.timeout_ms must be positive".to_string(),
            ));
        }
        let worst_case = self.generation.retry().worst_case();
        if worst_case >= self.request_timeout() {
            return Err(MarketscopeError::Configuration(format!(
                "generation worst case ({}ms: timeout_ms {} x {} attempts plus retry pauses) \
                 must be below server.limits.request_timeout_secs ({}s)",
                millis(worst_case),
                self.generation.timeout_ms,
                self.generation.max_retries.saturating_add(1),
                self.server.limits.request_timeout_secs
            )));
        }
        self.server
            .address
            .parse::<std::net::SocketAddr>()
            .map_err(|e| {
                MarketscopeError::Configuration(format!(
                    "Invalid address {:?}: {e}",
                    self.server.address
                ))
            })?;
        Ok(())
    }
}

/// Secrets configuration (API key).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub openai: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (the key may come from the
    /// environment).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".marketscope").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/marketscope/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load a specific secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            MarketscopeError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MarketscopeError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            MarketscopeError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(MarketscopeError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// API key from the secrets file, falling back to [`API_KEY_ENV_VAR`].
    pub fn api_key(&self) -> Option<String> {
        self.openai
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Like [`api_key`](Self::api_key), but a missing key is a fatal
    /// configuration error.
    pub fn require_api_key(&self) -> Result<String> {
        self.api_key().ok_or_else(|| {
            MarketscopeError::Configuration(format!(
                "{API_KEY_ENV_VAR} environment variable is not set and no secrets file provides [openai].api_key"
            ))
        })
    }
}
