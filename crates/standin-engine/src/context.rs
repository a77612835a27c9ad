// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation context and style example assembly.
//!
//! Pulls recent channel traffic and the principal's own past messages from
//! the store and renders them into prompt blocks. Context gathering is
//! fail-open: a storage error degrades to an empty block, never aborts the
//! pipeline.

use standin_core::types::ChatMessage;
use standin_storage::queries::messages as message_queries;
use standin_storage::Database;
use tracing::warn;

/// Rendered when a block has nothing to show. The prompts treat this
/// sentinel as "answer without history".
pub const NO_PRIOR_MESSAGES: &str = "No prior messages.";

/// How many messages of each block end up rendered into the prompt.
const RENDERED_CONTEXT_MESSAGES: usize = 5;

/// How many filtered style examples are kept.
const KEPT_STYLE_EXAMPLES: usize = 10;

/// Candidate pull size when no principal user id is configured.
const UNFILTERED_STYLE_LIMIT: i64 = 50;

/// Assembled prompt inputs for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    /// Recent channel messages, oldest first, excluding the current message.
    pub channel_messages: Vec<ChatMessage>,
    /// Filtered style examples, oldest first.
    pub style_examples: Vec<ChatMessage>,
}

/// Gathers conversation context and principal style examples.
pub struct ContextAssembler {
    db: Database,
    principal_user_id: Option<String>,
    context_limit: i64,
    style_limit: i64,
}

impl ContextAssembler {
    pub fn new(
        db: Database,
        principal_user_id: Option<String>,
        context_limit: usize,
        style_limit: usize,
    ) -> Self {
        Self {
            db,
            principal_user_id,
            context_limit: context_limit as i64,
            style_limit: style_limit as i64,
        }
    }

    /// Gather both blocks for the given message. Errors are logged and
    /// degrade to empty blocks.
    pub async fn assemble(&self, message: &ChatMessage) -> ConversationContext {
        ConversationContext {
            channel_messages: self.channel_context(message).await,
            style_examples: self.style_examples().await,
        }
    }

    /// Recent channel traffic, oldest first, excluding the current message.
    pub async fn channel_context(&self, message: &ChatMessage) -> Vec<ChatMessage> {
        match message_queries::recent_channel_messages(
            &self.db,
            &message.channel_id,
            &message.provider_message_id,
            self.context_limit,
        )
        .await
        {
            Ok(mut messages) => {
                // Store order is newest first; prompts read oldest first.
                messages.reverse();
                messages
            }
            Err(e) => {
                warn!(channel_id = %message.channel_id, error = %e, "channel context unavailable");
                Vec::new()
            }
        }
    }

    /// Filtered examples of the principal's own writing, oldest first.
    pub async fn style_examples(&self) -> Vec<ChatMessage> {
        match self.fetch_style_candidates().await {
            Ok(mut candidates) => {
                candidates.reverse();
                filter_style_examples(candidates)
            }
            Err(e) => {
                warn!(error = %e, "style examples unavailable");
                Vec::new()
            }
        }
    }

    async fn fetch_style_candidates(
        &self,
    ) -> Result<Vec<ChatMessage>, standin_core::StandinError> {
        match &self.principal_user_id {
            Some(user_id) => {
                message_queries::recent_user_messages(&self.db, user_id, self.style_limit).await
            }
            None => message_queries::recent_messages(&self.db, UNFILTERED_STYLE_LIMIT).await,
        }
    }
}

/// Keep substantive messages in the principal's own voice.
///
/// Drops short fragments, questions, and command or link noise, then keeps
/// the most recent [`KEPT_STYLE_EXAMPLES`]. Input and output are oldest
/// first.
pub fn filter_style_examples(candidates: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let filtered: Vec<ChatMessage> = candidates
        .into_iter()
        .filter(|m| {
            let text = m.text.trim();
            text.chars().count() > 5
                && !text.starts_with('?')
                && !text.starts_with('¿')
                && !text.starts_with('!')
                && !text.starts_with('/')
                && !text.starts_with("http")
        })
        .collect();
    let skip = filtered.len().saturating_sub(KEPT_STYLE_EXAMPLES);
    filtered.into_iter().skip(skip).collect()
}

fn author_label(message: &ChatMessage) -> &str {
    message.user_name.as_deref().unwrap_or(&message.user_id)
}

/// Render the channel block: the last few messages as `[author]: text`.
pub fn format_channel_context(messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return NO_PRIOR_MESSAGES.to_string();
    }
    let skip = messages.len().saturating_sub(RENDERED_CONTEXT_MESSAGES);
    messages[skip..]
        .iter()
        .map(|m| format!("[{}]: {}", author_label(m), m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the style block: dated examples of the principal's writing.
pub fn format_style_examples(examples: &[ChatMessage]) -> String {
    if examples.is_empty() {
        return NO_PRIOR_MESSAGES.to_string();
    }
    let skip = examples.len().saturating_sub(RENDERED_CONTEXT_MESSAGES);
    examples[skip..]
        .iter()
        .map(|m| {
            let date = m.created_at.get(..10).unwrap_or(&m.created_at);
            format!("Example of your style ({date}): {}", m.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
