//! Pure transforms over transcript text.
//!
//! [`format_transcript`] renders a completed transcript's utterances into the
//! canonical `"<speaker>: <text>"` line form returned by the API;
//! [`TranscriptFormatter`] derives alternate representations (line array,
//! HTML, markdown, conversation structure, speaker grouping, pretty JSON)
//! from that already-joined text. Nothing here touches the network or any
//! shared state.

use serde::Serialize;
use time::OffsetDateTime;

use crate::core::transcription::TranscriptionResult;

/// Speaker label substituted when diarization left a segment unattributed.
pub const UNKNOWN_SPEAKER: &str = "Unknown Speaker";

/// Render a completed transcript with speaker labels.
///
/// Each utterance becomes `"<speaker>: <text>"`, joined by newlines. When the
/// result carries no utterance list (diarization disabled), the plain `text`
/// field is returned instead, or the empty string when that is absent too.
pub fn format_transcript(result: &TranscriptionResult) -> String {
    match &result.utterances {
        Some(utterances) => utterances
            .iter()
            .map(|u| {
                format!(
                    "{}: {}",
                    u.speaker.as_deref().unwrap_or(UNKNOWN_SPEAKER),
                    u.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        None => result.text.clone().unwrap_or_default(),
    }
}

/// One parsed line of a speaker-prefixed transcript.
///
/// `timestamp` is the moment the line was parsed, not when the audio was
/// spoken; it is a capture time for consumers that archive conversations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationEntry {
    pub speaker: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Messages grouped under one speaker, in original order.
///
/// Groups are emitted in first-seen speaker order, which a plain hash map
/// would not preserve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerGroup {
    pub speaker: String,
    pub messages: Vec<String>,
}

/// Derives alternate representations from speaker-prefixed transcript text.
#[derive(Debug, Clone)]
pub struct TranscriptFormatter {
    text: String,
}

impl TranscriptFormatter {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Split into lines, dropping empty and whitespace-only ones.
    pub fn to_lines(&self) -> Vec<String> {
        self.text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.to_string())
            .collect()
    }

    /// Replace newlines with `<br>` markers.
    pub fn to_html(&self) -> String {
        self.text.replace('\n', "<br>")
    }

    /// Render each line as `**speaker:** message`, entries separated by a
    /// blank line.
    pub fn to_markdown(&self) -> String {
        self.to_lines()
            .iter()
            .map(|line| {
                let (speaker, message) = split_speaker_line(line);
                format!("**{speaker}:** {message}")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Parse each line into a [`ConversationEntry`].
    ///
    /// Only the first colon is a boundary, so messages may themselves contain
    /// colons. A line with no colon becomes a speaker with an empty message.
    pub fn to_conversation(&self) -> Vec<ConversationEntry> {
        let captured_at = OffsetDateTime::now_utc();
        self.to_lines()
            .iter()
            .map(|line| {
                let (speaker, message) = split_speaker_line(line);
                ConversationEntry {
                    speaker: speaker.to_string(),
                    message: message.to_string(),
                    timestamp: captured_at,
                }
            })
            .collect()
    }

    /// Fold the conversation into per-speaker message lists, preserving
    /// first-seen speaker order.
    pub fn group_by_speaker(&self) -> Vec<SpeakerGroup> {
        let mut groups: Vec<SpeakerGroup> = Vec::new();
        for entry in self.to_conversation() {
            match groups.iter_mut().find(|g| g.speaker == entry.speaker) {
                Some(group) => group.messages.push(entry.message),
                None => groups.push(SpeakerGroup {
                    speaker: entry.speaker,
                    messages: vec![entry.message],
                }),
            }
        }
        groups
    }

    /// Conversation structure serialized with human-readable indentation.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_conversation())
    }
}

/// Split a line on its first colon into trimmed (speaker, message) halves.
/// Absent colon: the whole line is the speaker and the message is empty.
fn split_speaker_line(line: &str) -> (&str, &str) {
    match line.split_once(':') {
        Some((speaker, message)) => (speaker.trim(), message.trim()),
        None => (line.trim(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcription::{TranscriptStatus, Utterance};

    fn completed_result(
        text: Option<&str>,
        utterances: Option<Vec<Utterance>>,
    ) -> TranscriptionResult {
        TranscriptionResult {
            id: "job-1".to_string(),
            status: TranscriptStatus::Completed,
            text: text.map(str::to_string),
            utterances,
            error: None,
        }
    }

    #[test]
    fn test_format_transcript_labels_speakers() {
        let result = completed_result(
            Some("hi yo"),
            Some(vec![
                Utterance {
                    speaker: Some("A".to_string()),
                    text: "hi".to_string(),
                },
                Utterance {
                    speaker: None,
                    text: "yo".to_string(),
                },
            ]),
        );

        assert_eq!(format_transcript(&result), "A: hi\nUnknown Speaker: yo");
    }

    #[test]
    fn test_format_transcript_falls_back_to_plain_text() {
        let result = completed_result(Some("hello world"), None);
        assert_eq!(format_transcript(&result), "hello world");
    }

    #[test]
    fn test_format_transcript_empty_when_nothing_present() {
        let result = completed_result(None, None);
        assert_eq!(format_transcript(&result), "");
    }

    #[test]
    fn test_to_lines_drops_blank_lines() {
        let formatter = TranscriptFormatter::new("A: hi\n\n   \nB: hello");
        assert_eq!(formatter.to_lines(), vec!["A: hi", "B: hello"]);
    }

    #[test]
    fn test_to_html_replaces_newlines() {
        let formatter = TranscriptFormatter::new("A: hi\nB: hello");
        assert_eq!(formatter.to_html(), "A: hi<br>B: hello");
    }

    #[test]
    fn test_to_markdown_bolds_speakers() {
        let formatter = TranscriptFormatter::new("A: hi there");
        assert_eq!(formatter.to_markdown(), "**A:** hi there");

        let formatter = TranscriptFormatter::new("A: hi\nB: hello");
        assert_eq!(formatter.to_markdown(), "**A:** hi\n\n**B:** hello");
    }

    #[test]
    fn test_to_conversation_splits_on_first_colon_only() {
        let formatter = TranscriptFormatter::new("A: note: remember this");
        let conversation = formatter.to_conversation();
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation[0].speaker, "A");
        assert_eq!(conversation[0].message, "note: remember this");
    }

    #[test]
    fn test_to_conversation_line_without_colon() {
        let formatter = TranscriptFormatter::new("standalone");
        let conversation = formatter.to_conversation();
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation[0].speaker, "standalone");
        assert_eq!(conversation[0].message, "");
    }

    #[test]
    fn test_round_trip_recovers_pairs() {
        let text = "A: hi\nB: hello\nA: bye";
        let conversation = TranscriptFormatter::new(text).to_conversation();
        let pairs: Vec<(&str, &str)> = conversation
            .iter()
            .map(|entry| (entry.speaker.as_str(), entry.message.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "hi"), ("B", "hello"), ("A", "bye")]);
    }

    #[test]
    fn test_group_by_speaker_preserves_first_seen_order() {
        let formatter = TranscriptFormatter::new("A: hi\nB: hello\nA: bye");
        let groups = formatter.group_by_speaker();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].speaker, "A");
        assert_eq!(groups[0].messages, vec!["hi", "bye"]);
        assert_eq!(groups[1].speaker, "B");
        assert_eq!(groups[1].messages, vec!["hello"]);
    }

    #[test]
    fn test_to_json_string_is_pretty_printed() {
        let formatter = TranscriptFormatter::new("A: hi");
        let json = formatter.to_json_string().unwrap();
        assert!(json.contains("\n"));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["speaker"], "A");
        assert_eq!(parsed[0]["message"], "hi");
        assert!(parsed[0]["timestamp"].is_string());
    }
}
