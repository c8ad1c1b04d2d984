//! Service configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stats_store::StoreConfig;
use std::net::SocketAddr;
use std::path::Path;

/// Main service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listener
    pub server: ServerConfig,

    /// Store limits
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8000, shutdown_timeout_secs: 10 }
    }
}

impl ServerConfig {
    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.server_addr()
            .parse()
            .with_context(|| format!("Invalid server address: {}", self.server_addr()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

/// Load configuration from an optional TOML file, then environment variables
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::debug!("Loading configuration from file: {:?}", path);
            load_from_file(path)?
        }
        None => ServiceConfig::default(),
    };

    load_from_env(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

/// Load configuration from a TOML file
pub fn load_from_file(path: &Path) -> Result<ServiceConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
}

/// Save configuration to a TOML file
pub fn save_config(config: &ServiceConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write config file: {:?}", path))
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => {
            let value = raw.parse().with_context(|| format!("Invalid value for {}: {}", name, raw))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

/// Override configuration with environment variables
fn load_from_env(config: &mut ServiceConfig) -> Result<()> {
    if let Ok(host) = std::env::var("STATS_HOST") {
        config.server.host = host;
    }

    if let Some(port) = env_parse("STATS_PORT")? {
        config.server.port = port;
    }

    if let Some(max_batch_size) = env_parse("STATS_MAX_BATCH_SIZE")? {
        config.store.max_batch_size = max_batch_size;
    }

    if let Some(max_symbols) = env_parse("STATS_MAX_SYMBOLS")? {
        config.store.max_symbols = max_symbols;
    }

    if let Some(max_symbol_length) = env_parse("STATS_MAX_SYMBOL_LENGTH")? {
        config.store.max_symbol_length = max_symbol_length;
    }

    if let Ok(level) = std::env::var("STATS_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Ok(format) = std::env::var("STATS_LOG_FORMAT") {
        config.logging.format = format;
    }

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &ServiceConfig) -> Result<()> {
    config.store.validate().context("Invalid store limits")?;

    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level)),
    }

    match config.logging.format.as_str() {
        "json" | "pretty" | "compact" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format)),
    }

    if config.server.port == 0 {
        return Err(anyhow::anyhow!("Invalid server port: {}", config.server.port));
    }

    Ok(())
}
