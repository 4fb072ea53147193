//! Asynchronous batch transcription against an AssemblyAI-style REST API.
//!
//! Unlike a streaming STT integration, the batch API is a two-phase flow:
//! a job is created referencing a URL the service can fetch the audio from,
//! then its status endpoint is polled until the job reaches a terminal state
//! (`completed` or `error`).
//!
//! The module is organized into focused submodules:
//!
//! - [`config`]: Client and per-job option types (`TranscriptionConfig`,
//!   `TranscriptOptions`)
//! - [`messages`]: REST request/response bodies
//! - [`client`]: The `TranscriptionClient` implementation
//!
//! # Example
//!
//! ```rust,no_run
//! use scribe_gateway::core::transcription::{
//!     TranscriptOptions, TranscriptionClient, TranscriptionConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TranscriptionClient::new(TranscriptionConfig::new("your-api-key"))?;
//!
//!     let result = client
//!         .transcribe("https://example.com/audio.wav", &TranscriptOptions::default())
//!         .await?;
//!
//!     println!("{}", result.text.unwrap_or_default());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod messages;


use std::time::Duration;

// Re-export public types
pub use client::TranscriptionClient;
pub use config::{
    DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, TranscriptOptions,
    TranscriptionConfig,
};
pub use messages::{
    SubmitResponse, TranscriptRequest, TranscriptStatus, TranscriptionResult, UploadResponse,
    Utterance,
};

/// Errors surfaced by the transcription client.
///
/// Every variant is absorbed at the HTTP boundary into a generic
/// "Transcription failed" response; the detail here exists for logs and for
/// callers that want to branch on the failure kind.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// The client was constructed without an API key.
    #[error("API key is required for the transcription service")]
    MissingApiKey,

    /// Job creation was rejected with a non-success HTTP status.
    #[error("transcription request failed with status: {status}")]
    Submission { status: reqwest::StatusCode },

    /// A status poll was rejected with a non-success HTTP status.
    #[error("polling failed with status: {status}")]
    Polling { status: reqwest::StatusCode },

    /// A raw audio upload was rejected with a non-success HTTP status.
    #[error("upload failed with status: {status}")]
    Upload { status: reqwest::StatusCode },

    /// The job reached the `error` state; carries the service-reported message.
    #[error("transcription failed: {0}")]
    Failed(String),

    /// The job did not reach a terminal state before the configured deadline.
    #[error("transcription timed out after {waited:?} (job {job_id} last seen {last_status})")]
    Timeout {
        job_id: String,
        last_status: TranscriptStatus,
        waited: Duration,
    },

    /// Transport-level failure (connect, timeout, body decode).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Seam over the composed submit-and-poll operation.
///
/// The HTTP handler depends on this trait rather than on
/// [`TranscriptionClient`] directly so tests can substitute a fake that
/// never touches the network.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Submit `audio_url` for transcription and wait for the terminal result.
    async fn transcribe(
        &self,
        audio_url: &str,
        options: &TranscriptOptions,
    ) -> Result<TranscriptionResult, TranscriptionError>;
}
