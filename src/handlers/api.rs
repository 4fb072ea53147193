//! Public (unprotected) API handlers.

use axum::Json;
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Health check endpoint.
///
/// Always 200 while the process is serving; carries the current server time
/// so callers can spot clock skew.
pub async fn health_check() -> Json<Value> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(json!({
        "status": "ok",
        "timestamp": timestamp,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_shape() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
        // RFC 3339 timestamps contain a date/time separator
        assert!(body["timestamp"].as_str().unwrap().contains('T'));
    }
}
