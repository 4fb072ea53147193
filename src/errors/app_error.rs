//! Request-level error taxonomy and its HTTP envelope mapping.
//!
//! Handlers return `AppResult<T>`; the single `IntoResponse` impl here is the
//! one place outcomes are mapped to status codes and JSON envelopes. Detail
//! for transcription and storage failures is logged where it occurs and
//! suppressed from the response body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::core::transcription::TranscriptionError;
use crate::storage::StorageError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request carried no `audio` multipart field.
    #[error("no audio file provided")]
    MissingFile,

    /// Upload or URL resolution failed; no fetchable URL exists.
    #[error("failed to upload audio file: {0}")]
    Storage(#[from] StorageError),

    /// Transcription did not produce a completed result.
    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Anything else that escapes the handler (multipart decode errors and
    /// the like). The message is returned to the caller, which is acceptable
    /// for an internal tool.
    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MissingFile => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "No audio file provided",
                    "requiredFormat": "multipart/form-data with audio file",
                })),
            )
                .into_response(),

            AppError::Storage(err) => {
                error!("upload failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to upload audio file",
                    })),
                )
                    .into_response()
            }

            AppError::Transcription(err) => {
                // Specifics were already logged inside the client.
                error!("responding with transcription failure: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Transcription failed",
                    })),
                )
                    .into_response()
            }

            AppError::Internal(message) => {
                error!("unhandled request error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Internal server error",
                        "message": message,
                    })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_file_is_400_with_required_format() {
        let (status, body) = response_parts(AppError::MissingFile).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "No audio file provided");
        assert_eq!(body["requiredFormat"], "multipart/form-data with audio file");
    }

    #[tokio::test]
    async fn test_storage_error_is_500_without_detail() {
        let (status, body) = response_parts(AppError::Storage(StorageError::NoUrlSource)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to upload audio file");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_transcription_error_is_500_with_generic_message() {
        let (status, body) = response_parts(AppError::Transcription(
            TranscriptionError::Failed("bad audio".to_string()),
        ))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Transcription failed");
        // Service detail must not leak.
        assert!(!body.to_string().contains("bad audio"));
    }

    #[tokio::test]
    async fn test_internal_error_carries_message() {
        let (status, body) =
            response_parts(AppError::Internal("boom".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["message"], "boom");
    }
}
