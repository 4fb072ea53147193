//! Environment variable loading.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ServerConfig, TlsConfig};

/// Read a non-empty environment variable.
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse an environment variable, failing loudly on bad values
/// rather than silently falling back to a default.
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { name, value }),
        None => Ok(None),
    }
}

pub(super) fn load_env_config() -> Result<ServerConfig, ConfigError> {
    let defaults = ServerConfig::default();

    let tls = match (var("TLS_CERT_PATH"), var("TLS_KEY_PATH")) {
        (Some(cert), Some(key)) => Some(TlsConfig {
            cert_path: PathBuf::from(cert),
            key_path: PathBuf::from(key),
        }),
        (None, None) => None,
        _ => {
            return Err(ConfigError::Invalid(
                "TLS_CERT_PATH and TLS_KEY_PATH must be set together".to_string(),
            ));
        }
    };

    Ok(ServerConfig {
        host: var("HOST").unwrap_or(defaults.host),
        port: parse_var("PORT")?.unwrap_or(defaults.port),
        tls,
        // ASSEMBLY_AI_KEY is the legacy variable name, kept as a fallback.
        assemblyai_api_key: var("ASSEMBLYAI_API_KEY").or_else(|| var("ASSEMBLY_AI_KEY")),
        assemblyai_base_url: var("ASSEMBLYAI_BASE_URL"),
        poll_interval_secs: parse_var("POLL_INTERVAL_SECS")?
            .unwrap_or(defaults.poll_interval_secs),
        poll_timeout_secs: match parse_var::<u64>("POLL_TIMEOUT_SECS")? {
            // 0 explicitly disables the polling deadline.
            Some(0) => None,
            Some(secs) => Some(secs),
            None => defaults.poll_timeout_secs,
        },
        upload_s3_bucket: var("UPLOAD_S3_BUCKET"),
        upload_s3_region: var("UPLOAD_S3_REGION"),
        upload_s3_endpoint: var("UPLOAD_S3_ENDPOINT"),
        upload_s3_access_key: var("UPLOAD_S3_ACCESS_KEY"),
        upload_s3_secret_key: var("UPLOAD_S3_SECRET_KEY"),
        upload_s3_prefix: var("UPLOAD_S3_PREFIX"),
        upload_public_base_url: var("UPLOAD_PUBLIC_BASE_URL"),
        max_upload_bytes: parse_var("MAX_UPLOAD_BYTES")?.unwrap_or(defaults.max_upload_bytes),
        cors_allowed_origins: var("CORS_ALLOWED_ORIGINS"),
        rate_limit_requests_per_second: parse_var("RATE_LIMIT_REQUESTS_PER_SECOND")?
            .unwrap_or(defaults.rate_limit_requests_per_second),
        rate_limit_burst_size: parse_var("RATE_LIMIT_BURST_SIZE")?
            .unwrap_or(defaults.rate_limit_burst_size),
    })
}
