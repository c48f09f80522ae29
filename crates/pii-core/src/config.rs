//! Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Name model and classifier configuration
    pub model: ModelConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = parse_var("API_PORT", port)?;
        }

        // CORS origins from environment variable (comma-separated)
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Model
        if let Ok(path) = std::env::var("PII_NAMES_PATH") {
            config.model.names_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("PII_MODEL_PATH") {
            config.model.artifact_path = PathBuf::from(path);
        }
        if let Ok(threshold) = std::env::var("PII_NAME_THRESHOLD") {
            config.model.name_threshold = parse_var("PII_NAME_THRESHOLD", threshold)?;
        }
        if let Ok(window) = std::env::var("PII_CONTEXT_WINDOW") {
            config.model.context_window = parse_var("PII_CONTEXT_WINDOW", window)?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = std::env::var("LOG_JSON") {
            config.logging.json_format = parse_var("LOG_JSON", json)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;
        let server_defaults = ServerConfig::default();
        let model_defaults = ModelConfig::default();

        // Only override if env values differ from defaults
        if env_config.server.host != server_defaults.host {
            self.server.host = env_config.server.host;
        }
        if env_config.server.port != server_defaults.port {
            self.server.port = env_config.server.port;
        }
        if !env_config.server.cors_origins.is_empty() {
            self.server.cors_origins = env_config.server.cors_origins;
        }
        if env_config.model.names_path != model_defaults.names_path {
            self.model.names_path = env_config.model.names_path;
        }
        if env_config.model.artifact_path != model_defaults.artifact_path {
            self.model.artifact_path = env_config.model.artifact_path;
        }
        if env_config.model.name_threshold != model_defaults.name_threshold {
            self.model.name_threshold = env_config.model.name_threshold;
        }
        if env_config.model.context_window != model_defaults.context_window {
            self.model.context_window = env_config.model.context_window;
        }
        if env_config.logging.level != LoggingConfig::default().level {
            self.logging.level = env_config.logging.level;
        }
        if env_config.logging.json_format {
            self.logging.json_format = true;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.model.name_threshold) {
            return Err(ConfigError::InvalidValue {
                key: "model.name_threshold".to_string(),
                value: self.model.name_threshold.to_string(),
            });
        }
        if self.model.context_window == 0 {
            return Err(ConfigError::InvalidValue {
                key: "model.context_window".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_body_size: usize,

    /// Allowed origins for CORS (empty allows none)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_body_size: 1024 * 1024, // 1MB
            cors_origins: vec![],
        }
    }
}

/// Name model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Newline-delimited corpus of known first names
    pub names_path: PathBuf,

    /// Where the trained model artifact is written
    pub artifact_path: PathBuf,

    /// Minimum "name" probability (exclusive) for a word to count as a name
    pub name_threshold: f64,

    /// Number of words before a value inspected for context cues
    pub context_window: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            names_path: PathBuf::from("data/Names.txt"),
            artifact_path: PathBuf::from("name_model.json"),
            name_threshold: 0.5,
            context_window: 4,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
