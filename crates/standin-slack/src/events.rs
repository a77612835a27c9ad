// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Slack Events API callback payload.
//!
//! Only the fields the intake path reads are modeled; everything else in
//! the payload is ignored.

use serde::Deserialize;

/// Outer envelope of an Events API POST.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    /// `url_verification`, `event_callback`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Present only on `url_verification` requests.
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub event: Option<MessageEvent>,
}

/// The inner event of an `event_callback` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageEvent {
    /// `message` for everything we process.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub subtype: Option<String>,
    /// Set when the author is a bot (including ourselves).
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub client_msg_id: Option<String>,
}

impl MessageEvent {
    /// The stable message id: `client_msg_id` when Slack assigned one,
    /// otherwise the channel-unique `ts`.
    pub fn stable_id(&self) -> &str {
        self.client_msg_id.as_deref().unwrap_or(&self.ts)
    }
}
