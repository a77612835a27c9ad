// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Handles POST /slack/events, GET /slack/messages,
//! GET /slack/response-times, GET /health.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use standin_core::types::{ChatMessage, MessageFilter};
use standin_core::StandinError;
use standin_slack::EventEnvelope;
use standin_storage::queries::messages as message_queries;

use crate::server::GatewayState;
use crate::verify;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response body for GET /slack/messages.
#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub total: i64,
    pub messages: Vec<ChatMessage>,
}

/// Query parameters for GET /slack/messages.
#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

fn default_limit() -> i64 {
    100
}

/// Response body for GET /slack/response-times.
#[derive(Debug, Serialize)]
pub struct ResponseTimesResponse {
    pub high_secs: u64,
    pub medium_secs: u64,
    pub low_secs: u64,
    pub bypass_secs: u64,
    pub test_secs: u64,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

fn unauthorized(reason: &str) -> Response {
    warn!(reason, "slack request rejected");
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: reason.to_string(),
        }),
    )
        .into_response()
}

fn ack() -> Response {
    (StatusCode::OK, Json(serde_json::json!({"ok": true}))).into_response()
}

/// POST /slack/events
///
/// Verifies the request signature, answers `url_verification`
/// challenges, and acks everything else. Accepted message events are
/// persisted before the ack; the retry short-circuit below means an
/// unstored event would never get a second chance. Analysis and
/// scheduling continue on a background task and never change the HTTP
/// status.
pub async fn post_slack_events(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if let Some(secret) = &state.signing_secret {
        let timestamp = headers
            .get("x-slack-request-timestamp")
            .and_then(|v| v.to_str().ok());
        let signature = headers.get("x-slack-signature").and_then(|v| v.to_str().ok());
        let (timestamp, signature) = match (timestamp, signature) {
            (Some(t), Some(s)) => (t, s),
            _ => return unauthorized("missing signature headers"),
        };
        if !verify::timestamp_in_window(timestamp, chrono::Utc::now().timestamp()) {
            return unauthorized("stale request timestamp");
        }
        if !verify::verify_signature(secret, timestamp, &body, signature) {
            return unauthorized("invalid signature");
        }
    }

    let envelope: EventEnvelope = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            // Authenticated but unparseable: ack so Slack stops retrying.
            warn!(error = %e, "unparseable event payload acked");
            return ack();
        }
    };

    if envelope.kind == "url_verification" {
        let challenge = envelope.challenge.unwrap_or_default();
        return Json(serde_json::json!({ "challenge": challenge })).into_response();
    }

    // Redeliveries carry X-Slack-Retry-Num; the first attempt already
    // reached the dedup set, so just ack.
    let retry_num = headers
        .get("x-slack-retry-num")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(0);
    if retry_num >= 1 {
        debug!(retry_num, "slack retry acked without processing");
        return ack();
    }

    if envelope.kind == "event_callback" {
        if let Some(event) = envelope.event {
            let team_id = envelope.team_id.unwrap_or_default();
            if let Some(message) = state.service.ingest(&team_id, &event).await {
                let service = Arc::clone(&state.service);
                tokio::spawn(async move {
                    service.respond(message).await;
                });
            }
        }
    }

    ack()
}

fn storage_error(e: StandinError) -> Response {
    match e {
        StandinError::Validation(message) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
        }
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: other.to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /slack/messages
///
/// Pages through stored messages, newest first. Out-of-range paging
/// parameters are a 400, never clamped.
pub async fn get_messages(
    State(state): State<GatewayState>,
    Query(query): Query<MessagesQuery>,
) -> Response {
    let filter = MessageFilter {
        team_id: query.team_id,
        channel_id: query.channel_id,
        user_id: query.user_id,
    };

    let messages =
        match message_queries::list_messages(&state.db, &filter, query.skip, query.limit).await {
            Ok(messages) => messages,
            Err(e) => return storage_error(e),
        };
    let total = match message_queries::count_messages(&state.db, &filter).await {
        Ok(total) => total,
        Err(e) => return storage_error(e),
    };

    (StatusCode::OK, Json(MessageListResponse { total, messages })).into_response()
}

/// GET /slack/response-times
pub async fn get_response_times(State(state): State<GatewayState>) -> Json<ResponseTimesResponse> {
    let delays = state.delays;
    Json(ResponseTimesResponse {
        high_secs: delays.high.as_secs(),
        medium_secs: delays.medium.as_secs(),
        low_secs: delays.low.as_secs(),
        bypass_secs: delays.bypass.as_secs(),
        test_secs: delays.test.as_secs(),
    })
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_query_defaults() {
        let query: MessagesQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.skip, 0);
        assert_eq!(query.limit, 100);
        assert!(query.team_id.is_none());
        assert!(query.channel_id.is_none());
        assert!(query.user_id.is_none());
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
    }

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "limit out of range".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("limit out of range"));
    }
}
