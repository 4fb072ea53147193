pub mod formatter;
pub mod transcription;

// Re-export public types and traits
pub use formatter::{
    ConversationEntry, SpeakerGroup, TranscriptFormatter, UNKNOWN_SPEAKER, format_transcript,
};
pub use transcription::{
    TranscriptOptions, TranscriptStatus, Transcriber, TranscriptionClient, TranscriptionConfig,
    TranscriptionError, TranscriptionResult, Utterance,
};
