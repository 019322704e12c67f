//! Configuration management for the soda review service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{Result, ReviewError};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Name reported by the health check endpoint
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

/// Which document store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Mongodb,
}

impl std::str::FromStr for StoreBackend {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "mongodb" | "mongo" => Ok(StoreBackend::Mongodb),
            other => Err(ReviewError::ConfigError(format!(
                "Unknown store backend: {other}"
            ))),
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// Connection string (mongodb backend only)
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// Connection probes attempted at startup before giving up
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    #[serde(default = "default_connect_backoff_ms")]
    pub connect_backoff_ms: u64,

    /// Per-operation timeout in milliseconds, 0 disables it
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Directive used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_service_name() -> String {
    "sodaReview".to_string()
}

/// MongoDB when compiled in, otherwise the in-process store
fn default_backend() -> StoreBackend {
    if cfg!(feature = "mongodb") {
        StoreBackend::Mongodb
    } else {
        StoreBackend::Memory
    }
}

fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "local".to_string()
}

fn default_collection() -> String {
    "sodaReviews".to_string()
}

fn default_connect_attempts() -> u32 {
    3
}

fn default_connect_backoff_ms() -> u64 {
    500
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

fn default_log_filter() -> String {
    "soda_review=info,tower_http=info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            service_name: default_service_name(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
            connect_attempts: default_connect_attempts(),
            connect_backoff_ms: default_connect_backoff_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            filter: default_log_filter(),
        }
    }
}

impl StoreConfig {
    /// Operation timeout, `None` when disabled
    pub fn timeout(&self) -> Option<std::time::Duration> {
        (self.timeout_ms > 0).then(|| std::time::Duration::from_millis(self.timeout_ms))
    }

    /// Connection string with any `user:password@` section masked
    pub fn redacted_uri(&self) -> String {
        match (self.uri.find("://"), self.uri.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://***@{}", &self.uri[..scheme_end], &self.uri[at + 1..])
            }
            _ => self.uri.clone(),
        }
    }
}

fn parse_env<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| ReviewError::ConfigError(format!("{name}: invalid value '{value}': {e}")))
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ReviewError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// File priority order:
    /// 1. SODA_REVIEW_CONFIG env var
    /// 2. XDG config file (~/.config/soda-review/config.toml)
    /// 3. ./soda-review.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("SODA_REVIEW_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("soda-review.toml").exists() {
                Self::from_file("soda-review.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    ///
    /// A variable that is set but does not parse is a configuration
    /// error rather than being ignored.
    pub fn merge_env(&mut self) -> Result<()> {
        // Server configuration
        if let Ok(host) = env::var("SODA_REVIEW_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SODA_REVIEW_PORT") {
            self.server.port = parse_env("SODA_REVIEW_PORT", &port)?;
        }
        if let Ok(name) = env::var("SODA_REVIEW_SERVICE_NAME") {
            self.server.service_name = name;
        }

        // Store configuration
        if let Ok(backend) = env::var("SODA_REVIEW_STORE_BACKEND") {
            self.store.backend = parse_env("SODA_REVIEW_STORE_BACKEND", &backend)?;
        }
        if let Ok(uri) = env::var("SODA_REVIEW_MONGODB_URI") {
            self.store.uri = uri;
        }
        if let Ok(database) = env::var("SODA_REVIEW_DATABASE") {
            self.store.database = database;
        }
        if let Ok(collection) = env::var("SODA_REVIEW_COLLECTION") {
            self.store.collection = collection;
        }
        if let Ok(timeout) = env::var("SODA_REVIEW_STORE_TIMEOUT_MS") {
            self.store.timeout_ms = parse_env("SODA_REVIEW_STORE_TIMEOUT_MS", &timeout)?;
        }

        // Logging configuration
        if let Ok(format) = env::var("SODA_REVIEW_LOG_FORMAT") {
            self.logging.format = match format.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "text" => LogFormat::Text,
                other => {
                    return Err(ReviewError::ConfigError(format!(
                        "SODA_REVIEW_LOG_FORMAT: unknown log format '{other}'"
                    )))
                }
            };
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ReviewError::ConfigError(
                "Port must be non-zero".to_string(),
            ));
        }

        if self.store.database.trim().is_empty() {
            return Err(ReviewError::ConfigError(
                "Database name cannot be empty".to_string(),
            ));
        }

        if self.store.collection.trim().is_empty() {
            return Err(ReviewError::ConfigError(
                "Collection name cannot be empty".to_string(),
            ));
        }

        if self.store.connect_attempts == 0 {
            return Err(ReviewError::ConfigError(
                "Connect attempts must be non-zero".to_string(),
            ));
        }

        if self.store.backend == StoreBackend::Mongodb && !cfg!(feature = "mongodb") {
            return Err(ReviewError::ConfigError(
                "The mongodb store backend requires the `mongodb` cargo feature".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen: {}:{}", self.server.host, self.server.port);
        tracing::info!("  Service name: {}", self.server.service_name);
        tracing::info!("  Store backend: {:?}", self.store.backend);
        if self.store.backend == StoreBackend::Mongodb {
            tracing::info!("  Store URI: {}", self.store.redacted_uri());
        }
        tracing::info!(
            "  Collection: {}.{}",
            self.store.database,
            self.store.collection
        );
        match self.store.timeout() {
            Some(t) => tracing::info!("  Store timeout: {}ms", t.as_millis()),
            None => tracing::warn!(
                "  Store timeout disabled: a hung store connection will hang requests"
            ),
        }
        tracing::info!("  Log format: {:?}", self.logging.format);
    }
}
