//! Configuration types for the batch transcription client.

use std::time::Duration;

/// Default AssemblyAI REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";

/// Default delay between two status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Default upper bound on a single polling loop. A job stuck in `queued` or
/// `processing` past this point fails with `TranscriptionError::Timeout`
/// instead of pinning its request forever.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// Per-job recognition options forwarded to the transcription service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptOptions {
    /// Recognition language (service language code, e.g. "en", "fr").
    pub language_code: String,
    /// Per-utterance speaker diarization.
    pub speaker_labels: bool,
    /// Automatic punctuation.
    pub punctuate: bool,
    /// Text normalization (numbers, casing).
    pub format_text: bool,
}

impl Default for TranscriptOptions {
    fn default() -> Self {
        Self {
            language_code: "en".to_string(),
            speaker_labels: true,
            punctuate: true,
            format_text: true,
        }
    }
}

impl TranscriptOptions {
    /// Options for a given language, everything else defaulted.
    pub fn for_language(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            ..Default::default()
        }
    }
}

/// Client-level configuration: credentials, endpoint and polling cadence.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    /// AssemblyAI API key, sent as the `authorization` header.
    pub api_key: String,
    /// REST endpoint base, overridable for self-hosted proxies and tests.
    pub base_url: String,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Upper bound on one polling loop. `None` restores the unbounded
    /// reference behavior, which is not recommended.
    pub poll_timeout: Option<Duration>,
}

impl TranscriptionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: Some(DEFAULT_POLL_TIMEOUT),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.poll_timeout = timeout;
        self
    }
}
