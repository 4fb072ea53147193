//! End-to-end tests for the transcription API.
//!
//! The router is served on an ephemeral port with an in-memory object store
//! and a scripted stand-in for the speech service, so requests exercise the
//! full multipart -> storage -> submit/poll -> formatting pipeline over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use object_store::memory::InMemory;
use serde_json::{Value, json};

use scribe_gateway::config::ServerConfig;
use scribe_gateway::core::transcription::{TranscriptionClient, TranscriptionConfig};
use scribe_gateway::routes::create_api_router;
use scribe_gateway::state::AppState;
use scribe_gateway::storage::UploadGateway;

/// How the scripted speech service should treat submitted jobs.
#[derive(Debug, Clone, Copy)]
enum SpeechScript {
    /// queued on the first poll, completed on the second.
    Complete,
    /// Job transitions to the `error` state.
    Fail,
    /// Job creation is rejected with 401.
    RejectSubmission,
}

async fn handle_submit(
    axum::extract::State(script): axum::extract::State<SpeechScript>,
    Json(body): Json<Value>,
) -> Response {
    // The audio URL must be the stored object's address, not a raw filename.
    let audio_url = body["audio_url"].as_str().unwrap_or_default();
    assert!(
        audio_url.starts_with("https://cdn.test/media/uploads/"),
        "unexpected audio_url: {audio_url}"
    );

    if let SpeechScript::RejectSubmission = script {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "id": "job-9", "status": "queued" })).into_response()
}

async fn handle_poll(
    axum::extract::State(script): axum::extract::State<SpeechScript>,
    Path(id): Path<String>,
) -> Response {
    assert_eq!(id, "job-9");
    match script {
        SpeechScript::Fail => {
            Json(json!({ "id": id, "status": "error", "error": "bad audio" })).into_response()
        }
        _ => Json(json!({
            "id": id,
            "status": "completed",
            "text": "hi yo",
            "utterances": [
                { "speaker": "A", "text": "hi" },
                { "text": "yo" }
            ]
        }))
        .into_response(),
    }
}

async fn spawn_speech_service(script: SpeechScript) -> String {
    let router = Router::new()
        .route("/transcript", post(handle_submit))
        .route("/transcript/{id}", get(handle_poll))
        .with_state(script);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

/// Serve the gateway against the scripted speech service, returning its base URL.
async fn spawn_gateway(script: SpeechScript) -> String {
    let speech_url = spawn_speech_service(script).await;

    let transcriber = TranscriptionClient::new(
        TranscriptionConfig::new("test-key")
            .with_base_url(&speech_url)
            .with_poll_interval(Duration::from_millis(10))
            .with_poll_timeout(Some(Duration::from_secs(5))),
    )
    .unwrap();

    let uploads = UploadGateway::new(Arc::new(InMemory::new()), "test-bucket")
        .with_public_base_url("https://cdn.test/media");

    let config = ServerConfig::default();
    let max_upload_bytes = config.max_upload_bytes;
    let state = AppState::with_parts(config, uploads, Arc::new(transcriber));

    let app = create_api_router(max_upload_bytes).with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn audio_form() -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(b"RIFF....fake-wav".to_vec())
        .file_name("meeting notes.wav")
        .mime_str("audio/wav")
        .unwrap();
    reqwest::multipart::Form::new()
        .part("audio", part)
        .text("language", "en")
}

#[tokio::test]
async fn test_health_endpoint_reports_ok() {
    let base_url = spawn_gateway(SpeechScript::Complete).await;

    let response = reqwest::get(format!("{base_url}/health")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_transcribe_happy_path_returns_raw_and_formatted() {
    let base_url = spawn_gateway(SpeechScript::Complete).await;

    let response = reqwest::Client::new()
        .post(format!("{base_url}/transcribe"))
        .multipart(audio_form())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["raw"]["id"], "job-9");
    assert_eq!(body["data"]["raw"]["status"], "completed");
    assert_eq!(body["data"]["raw"]["text"], "hi yo");
    assert_eq!(body["data"]["formatted"], "A: hi\nUnknown Speaker: yo");
}

#[tokio::test]
async fn test_transcribe_without_audio_field_is_a_client_error() {
    let base_url = spawn_gateway(SpeechScript::Complete).await;

    let form = reqwest::multipart::Form::new().text("language", "en");
    let response = reqwest::Client::new()
        .post(format!("{base_url}/transcribe"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No audio file provided");
    assert_eq!(body["requiredFormat"], "multipart/form-data with audio file");
}

#[tokio::test]
async fn test_rejected_submission_maps_to_generic_failure() {
    let base_url = spawn_gateway(SpeechScript::RejectSubmission).await;

    let response = reqwest::Client::new()
        .post(format!("{base_url}/transcribe"))
        .multipart(audio_form())
        .send()
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR
    );

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Transcription failed");
}

#[tokio::test]
async fn test_failed_job_does_not_leak_service_detail() {
    let base_url = spawn_gateway(SpeechScript::Fail).await;

    let response = reqwest::Client::new()
        .post(format!("{base_url}/transcribe"))
        .multipart(audio_form())
        .send()
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR
    );

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Transcription failed");
    assert!(!body.to_string().contains("bad audio"));
}
