// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery trait for chat platform integrations.

use async_trait::async_trait;

use crate::error::StandinError;

/// An outbound reply to be posted to a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub channel_id: String,
    pub text: String,
    /// Post into this thread instead of the channel top level.
    pub thread_ts: Option<String>,
}

/// Adapter for posting messages to the chat platform.
#[async_trait]
pub trait ChatSender: Send + Sync {
    /// Posts the message and returns the platform-assigned message timestamp.
    async fn send(&self, msg: OutgoingMessage) -> Result<String, StandinError>;
}
