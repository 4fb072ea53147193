//! YAML configuration file loading.
//!
//! The YAML file is an overlay: any field it sets wins over the environment,
//! anything it omits keeps the environment (or default) value.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 3000
//!   tls:
//!     cert_path: /etc/certs/server.pem
//!     key_path: /etc/certs/server.key
//! transcription:
//!   api_key: "..."
//!   poll_interval_secs: 3
//!   poll_timeout_secs: 600
//! storage:
//!   bucket: my-audio-bucket
//!   region: us-east-1
//!   prefix: uploads
//! security:
//!   cors_allowed_origins: "*"
//!   rate_limit_requests_per_second: 60
//!   rate_limit_burst_size: 10
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{ConfigError, ServerConfig, TlsConfig};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlFile {
    #[serde(default)]
    server: YamlServer,
    #[serde(default)]
    transcription: YamlTranscription,
    #[serde(default)]
    storage: YamlStorage,
    #[serde(default)]
    security: YamlSecurity,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlServer {
    host: Option<String>,
    port: Option<u16>,
    tls: Option<YamlTls>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlTls {
    cert_path: PathBuf,
    key_path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlTranscription {
    api_key: Option<String>,
    base_url: Option<String>,
    poll_interval_secs: Option<u64>,
    /// 0 disables the polling deadline.
    poll_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlStorage {
    bucket: Option<String>,
    region: Option<String>,
    endpoint: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
    prefix: Option<String>,
    public_base_url: Option<String>,
    max_upload_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlSecurity {
    cors_allowed_origins: Option<String>,
    rate_limit_requests_per_second: Option<u32>,
    rate_limit_burst_size: Option<u32>,
}

pub(super) fn overlay_from_file(
    base: ServerConfig,
    path: &Path,
) -> Result<ServerConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: YamlFile = serde_yaml::from_str(&contents)?;
    Ok(overlay(base, file))
}

fn overlay(mut config: ServerConfig, file: YamlFile) -> ServerConfig {
    if let Some(host) = file.server.host {
        config.host = host;
    }
    if let Some(port) = file.server.port {
        config.port = port;
    }
    if let Some(tls) = file.server.tls {
        config.tls = Some(TlsConfig {
            cert_path: tls.cert_path,
            key_path: tls.key_path,
        });
    }

    if let Some(api_key) = file.transcription.api_key {
        config.assemblyai_api_key = Some(api_key);
    }
    if let Some(base_url) = file.transcription.base_url {
        config.assemblyai_base_url = Some(base_url);
    }
    if let Some(interval) = file.transcription.poll_interval_secs {
        config.poll_interval_secs = interval;
    }
    if let Some(timeout) = file.transcription.poll_timeout_secs {
        config.poll_timeout_secs = if timeout == 0 { None } else { Some(timeout) };
    }

    if let Some(bucket) = file.storage.bucket {
        config.upload_s3_bucket = Some(bucket);
    }
    if let Some(region) = file.storage.region {
        config.upload_s3_region = Some(region);
    }
    if let Some(endpoint) = file.storage.endpoint {
        config.upload_s3_endpoint = Some(endpoint);
    }
    if let Some(access_key) = file.storage.access_key {
        config.upload_s3_access_key = Some(access_key);
    }
    if let Some(secret_key) = file.storage.secret_key {
        config.upload_s3_secret_key = Some(secret_key);
    }
    if let Some(prefix) = file.storage.prefix {
        config.upload_s3_prefix = Some(prefix);
    }
    if let Some(public_base_url) = file.storage.public_base_url {
        config.upload_public_base_url = Some(public_base_url);
    }
    if let Some(max) = file.storage.max_upload_bytes {
        config.max_upload_bytes = max;
    }

    if let Some(origins) = file.security.cors_allowed_origins {
        config.cors_allowed_origins = Some(origins);
    }
    if let Some(rps) = file.security.rate_limit_requests_per_second {
        config.rate_limit_requests_per_second = rps;
    }
    if let Some(burst) = file.security.rate_limit_burst_size {
        config.rate_limit_burst_size = burst;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_keeps_base() {
        let base = ServerConfig::default();
        let file: YamlFile = serde_yaml::from_str("{}").unwrap();
        let merged = overlay(base.clone(), file);
        assert_eq!(merged.host, base.host);
        assert_eq!(merged.port, base.port);
        assert_eq!(merged.max_upload_bytes, base.max_upload_bytes);
    }

    #[test]
    fn test_yaml_overrides_base() {
        let yaml = r#"
server:
  port: 8080
transcription:
  api_key: yaml-key
  poll_timeout_secs: 0
storage:
  bucket: yaml-bucket
  max_upload_bytes: 1024
security:
  cors_allowed_origins: "*"
"#;
        let file: YamlFile = serde_yaml::from_str(yaml).unwrap();
        let merged = overlay(ServerConfig::default(), file);

        assert_eq!(merged.port, 8080);
        assert_eq!(merged.assemblyai_api_key.as_deref(), Some("yaml-key"));
        // 0 disables the deadline
        assert_eq!(merged.poll_timeout_secs, None);
        assert_eq!(merged.upload_s3_bucket.as_deref(), Some("yaml-bucket"));
        assert_eq!(merged.max_upload_bytes, 1024);
        assert_eq!(merged.cors_allowed_origins.as_deref(), Some("*"));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let yaml = "server:\n  bogus: true\n";
        assert!(serde_yaml::from_str::<YamlFile>(yaml).is_err());
    }
}
