use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::get, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, transcribe};
use crate::state::AppState;
use std::sync::Arc;

/// Slack on top of the audio cap for multipart framing and the other form
/// fields.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the API router.
///
/// The body limit tracks the configured audio cap so oversized uploads are
/// rejected at the framing layer before buffering.
pub fn create_api_router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(api::health_check))
        .route("/transcribe", post(transcribe::transcribe_audio))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .layer(TraceLayer::new_for_http())
}
