// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound delivery via `chat.postMessage`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use standin_core::{ChatSender, OutgoingMessage, StandinError};

const SLACK_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Posts messages to Slack with the bot token.
pub struct SlackSender {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl SlackSender {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: SLACK_API_BASE.to_string(),
        }
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl ChatSender for SlackSender {
    async fn send(&self, msg: OutgoingMessage) -> Result<String, StandinError> {
        let url = format!("{}/chat.postMessage", self.base_url);
        let mut body = serde_json::json!({
            "channel": msg.channel_id,
            "text": msg.text,
        });
        if let Some(thread_ts) = &msg.thread_ts {
            body["thread_ts"] = serde_json::Value::String(thread_ts.clone());
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StandinError::Channel {
                message: format!("chat.postMessage request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StandinError::Channel {
                message: format!("chat.postMessage returned {status}: {body}"),
                source: None,
            });
        }

        // Slack reports most failures with HTTP 200 and ok=false.
        let parsed: PostMessageResponse =
            response.json().await.map_err(|e| StandinError::Channel {
                message: format!("chat.postMessage response unreadable: {e}"),
                source: Some(Box::new(e)),
            })?;
        if !parsed.ok {
            return Err(StandinError::Channel {
                message: format!(
                    "chat.postMessage rejected: {}",
                    parsed.error.unwrap_or_else(|| "unknown error".to_string())
                ),
                source: None,
            });
        }

        let ts = parsed.ts.unwrap_or_default();
        debug!(channel_id = %msg.channel_id, ts = %ts, "message posted");
        Ok(ts)
    }
}
