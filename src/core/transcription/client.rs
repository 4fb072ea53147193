//! Batch transcription client implementation.
//!
//! This module provides the main `TranscriptionClient` that drives one
//! transcription job through its full lifecycle:
//!
//! 1. `submit()` creates the job, pointing the service at a fetchable audio URL
//! 2. `await_completion()` polls the status endpoint on a fixed interval until
//!    the job is `completed` or `error`
//! 3. `transcribe()` composes the two and is the operation the HTTP handler
//!    consumes via the [`Transcriber`] trait
//!
//! The polling loop suspends on `tokio::time::sleep` between probes, so it
//! blocks only the request that owns it. A configurable deadline bounds the
//! loop; a job stuck in a non-terminal state fails with
//! `TranscriptionError::Timeout` instead of retaining its request forever.

use bytes::Bytes;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info};

use super::config::{TranscriptOptions, TranscriptionConfig};
use super::messages::{
    SubmitResponse, TranscriptRequest, TranscriptStatus, TranscriptionResult, UploadResponse,
};
use super::{Transcriber, TranscriptionError};

// =============================================================================
// Constants
// =============================================================================

/// Per-request timeout for submit/poll/upload calls. This bounds a single
/// HTTP round trip, not the polling loop as a whole.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Connect timeout for the default HTTP client.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("Scribe-Gateway/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Transcription Client
// =============================================================================

/// Client for an AssemblyAI-style batch transcription REST API.
///
/// Holds no per-job state; the job id is threaded through the two-phase
/// submit/poll flow. One client instance is shared by all requests.
#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    http: Client,
    config: TranscriptionConfig,
}

impl TranscriptionClient {
    /// Create a client with its own HTTP connection pool.
    ///
    /// # Errors
    ///
    /// Returns `TranscriptionError::MissingApiKey` when the configured key is
    /// empty, or a network error if the HTTP client cannot be built.
    pub fn new(config: TranscriptionConfig) -> Result<Self, TranscriptionError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Self::with_http_client(config, http)
    }

    /// Create a client around an injected `reqwest::Client`, for callers
    /// that want custom transport settings or a shared connection pool.
    pub fn with_http_client(
        config: TranscriptionConfig,
        http: Client,
    ) -> Result<Self, TranscriptionError> {
        if config.api_key.is_empty() {
            return Err(TranscriptionError::MissingApiKey);
        }

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &TranscriptionConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Upload raw audio bytes directly to the transcription service.
    ///
    /// Alternative ingest path for callers that bypass object storage; the
    /// returned URL is only resolvable by the service itself.
    pub async fn upload_audio(&self, audio: Bytes) -> Result<String, TranscriptionError> {
        let response = self
            .http
            .post(self.endpoint("upload"))
            .header(AUTHORIZATION, &self.config.api_key)
            .body(audio)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("audio upload rejected with status {status}");
            return Err(TranscriptionError::Upload { status });
        }

        let body: UploadResponse = response.json().await?;
        debug!("audio uploaded to transcription service");
        Ok(body.upload_url)
    }

    /// Create a transcription job and return its service-assigned id.
    ///
    /// `audio_url` must be fetchable by the service (public location or
    /// presigned URL).
    pub async fn submit(
        &self,
        audio_url: &str,
        options: &TranscriptOptions,
    ) -> Result<String, TranscriptionError> {
        let request = TranscriptRequest {
            audio_url: audio_url.to_string(),
            language_code: options.language_code.clone(),
            speaker_labels: options.speaker_labels,
            punctuate: options.punctuate,
            format_text: options.format_text,
        };

        debug!(
            language = %options.language_code,
            speaker_labels = options.speaker_labels,
            "submitting transcription job"
        );

        let response = self
            .http
            .post(self.endpoint("transcript"))
            .header(AUTHORIZATION, &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("transcription request rejected with status {status}");
            return Err(TranscriptionError::Submission { status });
        }

        let body: SubmitResponse = response.json().await?;
        info!(job_id = %body.id, "transcription job submitted");
        Ok(body.id)
    }

    /// Poll the job until it reaches a terminal state.
    ///
    /// Probes the status endpoint every `poll_interval`, suspending between
    /// probes. Resolves only with a terminal outcome: the completed result, a
    /// `Failed` error carrying the service-reported message, a `Polling` error
    /// for a rejected probe, or `Timeout` once the configured deadline passes.
    pub async fn await_completion(
        &self,
        job_id: &str,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let url = self.endpoint(&format!("transcript/{job_id}"));
        let started = Instant::now();
        let mut last_status = TranscriptStatus::Queued;

        loop {
            let response = self
                .http
                .get(&url)
                .header(AUTHORIZATION, &self.config.api_key)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                error!(job_id, "status poll rejected with status {status}");
                return Err(TranscriptionError::Polling { status });
            }

            let transcript: TranscriptionResult = response.json().await?;

            match transcript.status {
                TranscriptStatus::Completed => {
                    info!(
                        job_id,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "transcription completed"
                    );
                    return Ok(transcript);
                }
                TranscriptStatus::Error => {
                    let message = transcript
                        .error
                        .unwrap_or_else(|| "unspecified service error".to_string());
                    error!(job_id, "transcription failed: {message}");
                    return Err(TranscriptionError::Failed(message));
                }
                non_terminal => {
                    debug!(job_id, status = %non_terminal, "job not terminal yet");
                    last_status = non_terminal;
                }
            }

            if let Some(timeout) = self.config.poll_timeout {
                let waited = started.elapsed();
                if waited >= timeout {
                    error!(job_id, ?waited, "polling deadline elapsed");
                    return Err(TranscriptionError::Timeout {
                        job_id: job_id.to_string(),
                        last_status,
                        waited,
                    });
                }
            }

            sleep(self.config.poll_interval).await;
        }
    }

    /// Submit + await_completion in one call.
    ///
    /// Failure detail is logged here (the handler responds with a generic
    /// message) and also returned so callers and tests can inspect the kind.
    pub async fn transcribe(
        &self,
        audio_url: &str,
        options: &TranscriptOptions,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let job_id = self.submit(audio_url, options).await.inspect_err(|e| {
            error!("transcription submission failed: {e}");
        })?;

        self.await_completion(&job_id).await.inspect_err(|e| {
            error!(job_id, "transcription did not complete: {e}");
        })
    }
}

#[async_trait::async_trait]
impl Transcriber for TranscriptionClient {
    async fn transcribe(
        &self,
        audio_url: &str,
        options: &TranscriptOptions,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        TranscriptionClient::transcribe(self, audio_url, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_empty_api_key() {
        let result = TranscriptionClient::new(TranscriptionConfig::new(""));
        assert!(matches!(result, Err(TranscriptionError::MissingApiKey)));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = TranscriptionClient::new(
            TranscriptionConfig::new("key").with_base_url("http://127.0.0.1:9000/v2/"),
        )
        .unwrap();

        assert_eq!(
            client.endpoint("transcript/abc"),
            "http://127.0.0.1:9000/v2/transcript/abc"
        );
    }
}
