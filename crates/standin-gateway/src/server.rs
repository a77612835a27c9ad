// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. The webhook route must
//! ack within Slack's three-second window: intake and persistence are
//! awaited, but handlers never wait on the pipeline.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use standin_core::StandinError;
use standin_engine::DelayTable;
use standin_slack::MessageService;
use standin_storage::Database;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Event processing service; handlers hand accepted events to it.
    pub service: Arc<MessageService>,
    /// Store handle for the read endpoints.
    pub db: Database,
    /// Configured reply delays, exposed read-only.
    pub delays: DelayTable,
    /// Slack signing secret. `None` disables signature checks.
    pub signing_secret: Option<String>,
}

/// Gateway server configuration (mirrors GatewayConfig from standin-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the gateway router.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/slack/events", post(handlers::post_slack_events))
        .route("/slack/messages", get(handlers::get_messages))
        .route("/slack/response-times", get(handlers::get_response_times))
        .route("/health", get(handlers::get_health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), StandinError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StandinError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| StandinError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use standin_core::types::ChatMessage;
    use standin_core::{ChatSender, OutgoingMessage};
    use standin_engine::{Analyzer, ContextAssembler, Persona, Pipeline, ResponseScheduler};
    use standin_slack::{EventIntake, UserDirectory};
    use standin_storage::queries::messages as message_queries;

    use crate::verify;

    struct NullSender;

    #[async_trait]
    impl ChatSender for NullSender {
        async fn send(&self, _msg: OutgoingMessage) -> Result<String, standin_core::StandinError> {
            Ok("1700000042.000100".into())
        }
    }

    async fn state(signing_secret: Option<&str>) -> (GatewayState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();
        let pipeline = Pipeline::new(
            ContextAssembler::new(db.clone(), None, 10, 30),
            Analyzer::new(None, Duration::from_secs(1)),
            Persona {
                name: "Madim".into(),
                role: "CTO".into(),
                company: None,
            },
            "loco".into(),
        );
        let scheduler = ResponseScheduler::new(Arc::new(NullSender), DelayTable::default());
        let service = MessageService::new(
            EventIntake::new(64),
            db.clone(),
            Arc::new(UserDirectory::new(None)),
            pipeline,
            scheduler,
        );
        let state = GatewayState {
            service: Arc::new(service),
            db,
            delays: DelayTable::default(),
            signing_secret: signing_secret.map(str::to_string),
        };
        (state, dir)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn stored(n: u32) -> ChatMessage {
        ChatMessage {
            provider_message_id: format!("17000000{n:02}.000100"),
            team_id: "T1".into(),
            channel_id: "C1".into(),
            channel_name: None,
            user_id: "U9".into(),
            user_name: None,
            text: format!("message {n}"),
            kind: "message".into(),
            subtype: None,
            ts: format!("17000000{n:02}.000100"),
            thread_ts: None,
            client_msg_id: None,
            is_bot: false,
            is_ai_generated: false,
            created_at: "2026-08-26T12:00:00.000Z".into(),
        }
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (state, _dir) = state(None).await;
        let response = build_router(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn url_verification_echoes_the_challenge() {
        let (state, _dir) = state(None).await;
        let response = build_router(state)
            .oneshot(
                Request::post("/slack/events")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"type":"url_verification","challenge":"abc123"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["challenge"], "abc123");
    }

    #[tokio::test]
    async fn unsigned_request_is_rejected_when_secret_is_set() {
        let (state, _dir) = state(Some("secret")).await;
        let response = build_router(state)
            .oneshot(
                Request::post("/slack/events")
                    .body(Body::from(r#"{"type":"event_callback"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bad_signature_is_rejected() {
        let (state, _dir) = state(Some("secret")).await;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let response = build_router(state)
            .oneshot(
                Request::post("/slack/events")
                    .header("x-slack-request-timestamp", &timestamp)
                    .header("x-slack-signature", "v0=deadbeef")
                    .body(Body::from(r#"{"type":"event_callback"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn stale_timestamp_is_rejected_even_with_a_valid_signature() {
        let (state, _dir) = state(Some("secret")).await;
        let body = r#"{"type":"event_callback"}"#;
        let timestamp = (chrono::Utc::now().timestamp() - 3600).to_string();
        let signature = verify::sign("secret", &timestamp, body);
        let response = build_router(state)
            .oneshot(
                Request::post("/slack/events")
                    .header("x-slack-request-timestamp", &timestamp)
                    .header("x-slack-signature", &signature)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn signed_event_is_acked() {
        let (state, _dir) = state(Some("secret")).await;
        let body = r#"{"type":"event_callback","team_id":"T1","event":{"type":"message","user":"U9","text":"hi","ts":"1700000001.000100","channel":"C1"}}"#;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = verify::sign("secret", &timestamp, body);
        let response = build_router(state)
            .oneshot(
                Request::post("/slack/events")
                    .header("x-slack-request-timestamp", &timestamp)
                    .header("x-slack-signature", &signature)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn accepted_event_is_stored_before_the_ack() {
        let (state, _dir) = state(None).await;
        let db = state.db.clone();
        let body = r#"{"type":"event_callback","team_id":"T1","event":{"type":"message","user":"U9","text":"hi","ts":"1700000001.000100","channel":"C1"}}"#;
        let response = build_router(state)
            .oneshot(
                Request::post("/slack/events")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        // No wait: the handler persisted before returning, so a retry of
        // this event can safely be acked without reprocessing.
        assert!(message_queries::get_message(&db, "1700000001.000100")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn retries_are_acked_without_processing() {
        let (state, _dir) = state(None).await;
        let db = state.db.clone();
        let body = r#"{"type":"event_callback","team_id":"T1","event":{"type":"message","user":"U9","text":"hi","ts":"1700000001.000100","channel":"C1"}}"#;
        let response = build_router(state)
            .oneshot(
                Request::post("/slack/events")
                    .header("x-slack-retry-num", "1")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        // Nothing was handed to the service, so nothing was stored.
        assert!(message_queries::get_message(&db, "1700000001.000100")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn messages_endpoint_pages_and_counts() {
        let (state, _dir) = state(None).await;
        message_queries::insert_message(&state.db, &stored(1))
            .await
            .unwrap();
        message_queries::insert_message(&state.db, &stored(2))
            .await
            .unwrap();

        let response = build_router(state)
            .oneshot(
                Request::get("/slack/messages?limit=1&channel_id=C1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        // Newest first.
        assert_eq!(body["messages"][0]["text"], "message 2");
    }

    #[tokio::test]
    async fn out_of_range_limit_is_a_bad_request() {
        let (state, _dir) = state(None).await;
        let response = build_router(state)
            .oneshot(
                Request::get("/slack/messages?limit=0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn response_times_reflect_the_delay_table() {
        let (state, _dir) = state(None).await;
        let response = build_router(state)
            .oneshot(
                Request::get("/slack/response-times")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["high_secs"], 30);
        assert_eq!(body["medium_secs"], 120);
        assert_eq!(body["low_secs"], 300);
        assert_eq!(body["bypass_secs"], 5);
        assert_eq!(body["test_secs"], 30);
    }
}
