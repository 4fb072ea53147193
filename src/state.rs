//! Shared application state.
//!
//! Built once at startup and shared across requests behind an `Arc`. All
//! collaborators are constructed here and injected, so tests can assemble a
//! state with an in-memory store and a fake transcriber instead.

use anyhow::{Context, bail};
use object_store::aws::AmazonS3Builder;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::ServerConfig;
use crate::core::transcription::{Transcriber, TranscriptionClient, TranscriptionConfig};
use crate::storage::UploadGateway;

pub struct AppState {
    pub config: ServerConfig,
    pub uploads: UploadGateway,
    pub transcriber: Arc<dyn Transcriber>,
}

impl AppState {
    /// Construct production state from configuration.
    ///
    /// Fails fast (at startup, not at first request) when the transcription
    /// API key or the upload bucket is missing or the S3 client cannot be
    /// built.
    pub fn new(config: ServerConfig) -> anyhow::Result<Arc<Self>> {
        let Some(api_key) = config.assemblyai_api_key.clone() else {
            bail!("ASSEMBLYAI_API_KEY is required to start the server");
        };
        let Some(bucket) = config.upload_s3_bucket.clone() else {
            bail!("UPLOAD_S3_BUCKET is required to start the server");
        };

        let mut transcription_config = TranscriptionConfig::new(api_key)
            .with_poll_interval(Duration::from_secs(config.poll_interval_secs))
            .with_poll_timeout(config.poll_timeout_secs.map(Duration::from_secs));
        if let Some(base_url) = &config.assemblyai_base_url {
            transcription_config = transcription_config.with_base_url(base_url.clone());
        }
        let transcriber = TranscriptionClient::new(transcription_config)
            .context("failed to build transcription client")?;

        // Standard AWS_* variables are picked up first; explicit config wins.
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(&bucket);
        if let Some(region) = &config.upload_s3_region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &config.upload_s3_endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }
        if let Some(access_key) = &config.upload_s3_access_key {
            builder = builder.with_access_key_id(access_key);
        }
        if let Some(secret_key) = &config.upload_s3_secret_key {
            builder = builder.with_secret_access_key(secret_key);
        }
        let store = Arc::new(
            builder
                .build()
                .context("failed to build S3 object store client")?,
        );

        let mut uploads = UploadGateway::new(store.clone(), &bucket)
            .with_max_upload_bytes(config.max_upload_bytes);
        if let Some(prefix) = &config.upload_s3_prefix {
            uploads = uploads.with_prefix(prefix.clone());
        }
        uploads = match &config.upload_public_base_url {
            Some(base_url) => {
                info!("uploads resolved as direct URLs under {base_url}");
                uploads.with_public_base_url(base_url.clone())
            }
            None => {
                info!("uploads resolved as presigned URLs");
                uploads.with_signer(store)
            }
        };

        Ok(Arc::new(Self {
            config,
            uploads,
            transcriber: Arc::new(transcriber),
        }))
    }

    /// Assemble state from pre-built collaborators. Test seam.
    pub fn with_parts(
        config: ServerConfig,
        uploads: UploadGateway,
        transcriber: Arc<dyn Transcriber>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            uploads,
            transcriber,
        })
    }
}
