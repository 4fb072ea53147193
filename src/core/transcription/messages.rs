//! Wire types for the AssemblyAI batch transcription REST API.
//!
//! The service owns none of these shapes; they mirror the JSON bodies of
//! `POST /v2/upload`, `POST /v2/transcript` and `GET /v2/transcript/{id}`.

use serde::{Deserialize, Serialize};

/// Job creation request body.
///
/// `audio_url` must be fetchable by the transcription service itself, which
/// is why uploads are either presigned or publicly addressable.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptRequest {
    pub audio_url: String,
    pub language_code: String,
    pub speaker_labels: bool,
    pub punctuate: bool,
    pub format_text: bool,
}

/// Response to a job creation request. Only the id is consumed; the rest of
/// the body is an echo of the (still queued) transcript resource.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub id: String,
}

/// Response to a raw audio upload (`POST /v2/upload`).
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub upload_url: String,
}

/// Lifecycle states reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl TranscriptStatus {
    /// Whether the job can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TranscriptStatus::Completed | TranscriptStatus::Error)
    }
}

impl std::fmt::Display for TranscriptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptStatus::Queued => write!(f, "queued"),
            TranscriptStatus::Processing => write!(f, "processing"),
            TranscriptStatus::Completed => write!(f, "completed"),
            TranscriptStatus::Error => write!(f, "error"),
        }
    }
}

/// One diarized segment of a completed transcript.
///
/// `speaker` is absent when diarization is disabled or the service could not
/// attribute the segment; formatting substitutes "Unknown Speaker".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    pub text: String,
}

/// Transcript resource as returned by the status endpoint.
///
/// `text` and `utterances` are populated only once `status` is `completed`;
/// `error` only once it is `error`. The full resource is returned verbatim to
/// API callers as the `raw` half of the response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub id: String,
    pub status: TranscriptStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utterances: Option<Vec<Utterance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
