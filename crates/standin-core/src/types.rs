// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the standin workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Perceived urgency of an incoming message.
///
/// Drives both the respond decision and the reply delay. The string forms
/// (`low` / `medium` / `high`) match the JSON contract spoken by the model.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UrgencyLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Sensitivity classification of an incoming message.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SensitivityLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// A chat message as persisted in the message store.
///
/// Field shapes follow the Slack message event payload: `provider_message_id`
/// is the stable id (`client_msg_id` when present, otherwise `ts`), `ts` is
/// the platform's epoch-seconds string that also orders the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub provider_message_id: String,
    pub team_id: String,
    pub channel_id: String,
    pub channel_name: Option<String>,
    pub user_id: String,
    pub user_name: Option<String>,
    pub text: String,
    /// Event type, `message` for everything we store.
    pub kind: String,
    pub subtype: Option<String>,
    pub ts: String,
    pub thread_ts: Option<String>,
    pub client_msg_id: Option<String>,
    pub is_bot: bool,
    /// True for replies this service generated itself.
    pub is_ai_generated: bool,
    /// RFC 3339 insertion timestamp.
    pub created_at: String,
}

/// Filters for listing stored messages. All fields are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub team_id: Option<String>,
    pub channel_id: Option<String>,
    pub user_id: Option<String>,
}

/// Output of the urgency stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyAssessment {
    pub urgency_level: UrgencyLevel,
    pub urgency_score: f64,
    pub urgency_factors: Vec<String>,
    pub reasoning: String,
}

/// Output of the directness stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectnessAssessment {
    pub is_direct: bool,
    pub urgency: UrgencyLevel,
    pub requires_response: bool,
    pub reasoning: String,
}

/// Output of the sensitivity stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityAssessment {
    pub is_sensitive: bool,
    pub sensitivity_level: SensitivityLevel,
    pub sensitivity_factors: Vec<String>,
    pub reasoning: String,
}

impl SensitivityAssessment {
    /// Whether the reply should be swapped for a non-committal deferral.
    pub fn requires_evasion(&self) -> bool {
        matches!(
            self.sensitivity_level,
            SensitivityLevel::Medium | SensitivityLevel::High
        )
    }
}
