//! Configuration loading, validation, and management for the concierge.
//!
//! Loads configuration from `~/.concierge/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The root configuration structure.
///
/// Maps directly to `~/.concierge/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Streaming endpoint configuration
    #[serde(default)]
    pub stream: StreamConfig,

    /// Knowledge source configuration
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. `["*"]` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}
fn default_allowed_origins() -> Vec<String> {
    vec!["*".into()]
}
fn default_true() -> bool {
    true
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds before a cached answer is treated as absent
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Characters per streamed chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Delay between chunks, to simulate typing
    #[serde(default = "default_pace_ms")]
    pub pace_ms: u64,
}

fn default_chunk_size() -> usize {
    80
}
fn default_pace_ms() -> u64 {
    20
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            pace_ms: default_pace_ms(),
        }
    }
}

impl StreamConfig {
    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// TOML file with `[[records]]` that replaces the built-in guide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// Upper bound on the pacing delay between stream chunks.
const MAX_PACE_MS: u64 = 5_000;

impl AppConfig {
    /// Load configuration from the default path (~/.concierge/config.toml).
    ///
    /// Environment variables override file values:
    /// - `CONCIERGE_HOST`
    /// - `CONCIERGE_PORT`
    /// - `CONCIERGE_CACHE_TTL_SECS`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("CONCIERGE_HOST") {
            self.gateway.host = host;
        }
        if let Some(port) = lookup("CONCIERGE_PORT") {
            self.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("CONCIERGE_PORT is not a port: {port}"))
            })?;
        }
        if let Some(ttl) = lookup("CONCIERGE_CACHE_TTL_SECS") {
            self.cache.ttl_secs = ttl.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "CONCIERGE_CACHE_TTL_SECS is not a number: {ttl}"
                ))
            })?;
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".concierge")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.port must be non-zero".into(),
            ));
        }
        if self.gateway.allowed_origins.is_empty() {
            return Err(ConfigError::ValidationError(
                "gateway.allowed_origins must list at least one origin (use \"*\" for any)".into(),
            ));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "cache.ttl_secs must be at least 1".into(),
            ));
        }
        if self.stream.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "stream.chunk_size must be at least 1".into(),
            ));
        }
        if self.stream.pace_ms > MAX_PACE_MS {
            return Err(ConfigError::ValidationError(format!(
                "stream.pace_ms must be at most {MAX_PACE_MS}"
            )));
        }
        Ok(())
    }

    /// Knowledge file path, if one is configured.
    pub fn knowledge_path(&self) -> Option<PathBuf> {
        self.knowledge.file.as_ref().map(PathBuf::from)
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.cache.ttl(), Duration::from_secs(600));
        assert_eq!(config.stream.chunk_size, 80);
        assert_eq!(config.stream.pace(), Duration::from_millis(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.cache.ttl_secs, config.cache.ttl_secs);
        assert_eq!(parsed.gateway.allowed_origins, vec!["*"]);
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let mut config = AppConfig::default();
        config.stream.chunk_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_ttl_rejected() {
        let mut config = AppConfig::default();
        config.cache.ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn excessive_pace_rejected() {
        let mut config = AppConfig::default();
        config.stream.pace_ms = 60_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        let config = result.unwrap();
        assert_eq!(config.gateway.port, 8000);
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("8000"));
        assert!(toml_str.contains("ttl_secs = 600"));
        assert!(toml_str.contains("chunk_size = 80"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[gateway]
port = 9090

[stream]
pace_ms = 0

[knowledge]
file = "/srv/concierge/cards.toml"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.gateway.port, 9090);
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.stream.pace_ms, 0);
        assert_eq!(config.stream.chunk_size, 80);
        assert!(config.cache.enabled);
        assert_eq!(
            config.knowledge_path(),
            Some(PathBuf::from("/srv/concierge/cards.toml"))
        );
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gateway\nport = ").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn invalid_file_values_rejected_on_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[stream]\nchunk_size = 0").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CONCIERGE_HOST", "0.0.0.0"),
            ("CONCIERGE_PORT", "8123"),
            ("CONCIERGE_CACHE_TTL_SECS", "30"),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.gateway.port, 8123);
        assert_eq!(config.cache.ttl_secs, 30);
    }

    #[test]
    fn bad_env_port_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(|k| (k == "CONCIERGE_PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("CONCIERGE_PORT"));
    }
}
