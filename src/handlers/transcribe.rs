//! Transcription request orchestration.
//!
//! One handler drives the full pipeline for a request:
//! validate multipart input, persist the audio through the upload gateway,
//! run the submit/poll transcription flow, format the completed transcript
//! and shape the response envelope. Each step's failure maps to an
//! [`AppError`] variant; nothing here retries.

use axum::Json;
use axum::extract::{Multipart, State};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::formatter::format_transcript;
use crate::core::transcription::TranscriptOptions;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying the audio file.
const AUDIO_FIELD: &str = "audio";

/// Optional multipart field selecting the recognition language.
const LANGUAGE_FIELD: &str = "language";

/// `POST /transcribe` - multipart form with an `audio` file and an optional
/// `language` text field (default "en").
pub async fn transcribe_audio(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let mut audio: Option<(String, bytes::Bytes)> = None;
    let mut language: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some(AUDIO_FIELD) => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| AUDIO_FIELD.to_string());
                let data = field.bytes().await?;
                audio = Some((filename, data));
            }
            Some(LANGUAGE_FIELD) => {
                let value = field.text().await?;
                if !value.trim().is_empty() {
                    language = Some(value.trim().to_string());
                }
            }
            // Unknown fields are ignored, matching lenient form handling.
            _ => {}
        }
    }

    let (filename, data) = audio.ok_or(AppError::MissingFile)?;
    let options =
        TranscriptOptions::for_language(language.unwrap_or_else(|| "en".to_string()));

    debug!(
        filename = %filename,
        size = data.len(),
        language = %options.language_code,
        "transcription request accepted"
    );

    let uploaded = state.uploads.store_audio(&filename, data).await?;
    info!(key = %uploaded.key, bucket = %uploaded.bucket, "file uploaded successfully");

    let result = state
        .transcriber
        .transcribe(&uploaded.url, &options)
        .await?;

    let formatted = format_transcript(&result);

    Ok(Json(json!({
        "success": true,
        "data": {
            "raw": result,
            "formatted": formatted,
        },
    })))
}
