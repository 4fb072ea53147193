//! Configuration module for the Scribe Gateway server.
//!
//! Handles server configuration from several sources: `.env` files,
//! environment variables and an optional YAML file. Priority:
//! YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `env`: environment variable loading
//! - `yaml`: YAML configuration file loading and overlay
//!
//! # Example
//! ```rust,no_run
//! use scribe_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable base
//! let config = ServerConfig::from_file(&PathBuf::from("config.yaml"))?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

mod env;
mod yaml;

/// Default interval between transcription status polls, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

/// Default bound on one polling loop, in seconds.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains everything needed to run the gateway:
/// - Server settings (host, port, TLS)
/// - Transcription service settings (API key, endpoint, polling cadence)
/// - Upload storage settings (S3 bucket, credentials, URL strategy)
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    /// AssemblyAI API key for batch transcription.
    /// Required at AppState construction, not at config load.
    pub assemblyai_api_key: Option<String>,
    /// Override for the transcription REST endpoint (proxies, tests).
    pub assemblyai_base_url: Option<String>,
    /// Seconds between status polls.
    pub poll_interval_secs: u64,
    /// Upper bound on one polling loop in seconds; `None` disables the bound
    /// (not recommended, a stuck job then pins its request forever).
    pub poll_timeout_secs: Option<u64>,

    // Upload storage configuration
    pub upload_s3_bucket: Option<String>,
    pub upload_s3_region: Option<String>,
    /// Custom S3 endpoint for S3-compatible stores (MinIO, R2).
    pub upload_s3_endpoint: Option<String>,
    pub upload_s3_access_key: Option<String>,
    pub upload_s3_secret_key: Option<String>,
    /// Key prefix for uploaded objects. Default: "uploads".
    pub upload_s3_prefix: Option<String>,
    /// When set, fetchable URLs are `{base}/{key}` instead of presigned.
    pub upload_public_base_url: Option<String>,
    /// Maximum accepted audio payload in bytes. Default: 50MB.
    pub max_upload_bytes: usize,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,

    // Rate limiting configuration
    /// Maximum requests per second per IP address
    /// Default: 60
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 10
    pub rate_limit_burst_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            tls: None,
            assemblyai_api_key: None,
            assemblyai_base_url: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            poll_timeout_secs: Some(DEFAULT_POLL_TIMEOUT_SECS),
            upload_s3_bucket: None,
            upload_s3_region: None,
            upload_s3_endpoint: None,
            upload_s3_access_key: None,
            upload_s3_secret_key: None,
            upload_s3_prefix: None,
            upload_public_base_url: None,
            max_upload_bytes: crate::storage::DEFAULT_MAX_UPLOAD_BYTES,
            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables (and `.env`, when the
    /// caller ran `dotenvy` beforehand).
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = env::load_env_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, overlaid on the environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let base = env::load_env_config()?;
        let config = yaml::overlay_from_file(base, path)?;
        config.validate()?;
        Ok(config)
    }

    /// Socket address string the server binds to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be non-zero".to_string()));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll interval must be at least one second".to_string(),
            ));
        }
        if self.rate_limit_burst_size == 0 {
            return Err(ConfigError::Invalid(
                "rate limit burst size must be at least 1".to_string(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max upload size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
