// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event-to-pipeline wiring: persist, analyze, schedule.
//!
//! This is the webhook's business path. Intake and persistence complete
//! before the gateway acks, so a lost task cannot drop an unstored event;
//! analysis and scheduling run behind the ack. Nothing here returns an
//! error: every failure is logged and dropped.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};

use standin_core::types::ChatMessage;
use standin_core::{OutgoingMessage, StandinError};
use standin_engine::{Pipeline, ResponseScheduler};
use standin_storage::queries::messages as message_queries;
use standin_storage::Database;

use crate::events::MessageEvent;
use crate::intake::{Acceptance, EventIntake};
use crate::users::UserDirectory;

/// Longest message text we persist.
const MAX_STORED_TEXT: usize = 4000;

/// Handles one inbound message event end to end.
pub struct MessageService {
    intake: EventIntake,
    db: Database,
    users: Arc<UserDirectory>,
    pipeline: Pipeline,
    scheduler: ResponseScheduler,
}

impl MessageService {
    pub fn new(
        intake: EventIntake,
        db: Database,
        users: Arc<UserDirectory>,
        pipeline: Pipeline,
        scheduler: ResponseScheduler,
    ) -> Self {
        Self {
            intake,
            db,
            users,
            pipeline,
            scheduler,
        }
    }

    /// Filter, persist, analyze, and (maybe) schedule a reply.
    pub async fn process_event(&self, team_id: &str, event: &MessageEvent) {
        if let Some(message) = self.ingest(team_id, event).await {
            self.respond(message).await;
        }
    }

    /// Filter and persist one event. Returns the stored message when it
    /// should continue into the pipeline, `None` otherwise.
    ///
    /// The gateway awaits this before acking, then runs [`respond`] on a
    /// background task.
    ///
    /// [`respond`]: MessageService::respond
    pub async fn ingest(&self, team_id: &str, event: &MessageEvent) -> Option<ChatMessage> {
        match self.intake.accept(event) {
            Acceptance::Process => {}
            Acceptance::Skip(reason) => {
                debug!(ts = %event.ts, reason, "event skipped");
                return None;
            }
            Acceptance::Duplicate => {
                debug!(stable_id = %event.stable_id(), "duplicate event dropped");
                return None;
            }
        }
        self.persist(team_id, event).await
    }

    /// Run the pipeline for a stored message and schedule a reply if one
    /// is owed.
    pub async fn respond(&self, message: ChatMessage) {
        let outcome = self.pipeline.run(&message).await;
        if let Some(text) = outcome.response {
            self.scheduler.schedule(
                OutgoingMessage {
                    channel_id: message.channel_id,
                    text,
                    thread_ts: message.thread_ts,
                },
                outcome.urgency,
                outcome.bypass,
            );
        }
    }

    /// Build and insert the stored record. Returns `None` when the message
    /// should not continue into the pipeline.
    async fn persist(&self, team_id: &str, event: &MessageEvent) -> Option<ChatMessage> {
        let user_id = event.user.clone()?;
        let raw_text = event.text.clone().unwrap_or_default();
        let resolved = self.users.resolve_mentions(&raw_text).await;
        let text: String = resolved.chars().take(MAX_STORED_TEXT).collect();
        let user_name = self.users.display_name(&user_id).await;

        let message = ChatMessage {
            provider_message_id: event.stable_id().to_string(),
            team_id: team_id.to_string(),
            channel_id: event.channel.clone(),
            channel_name: None,
            user_id: user_id.clone(),
            user_name: user_name.clone(),
            text,
            kind: event.kind.clone(),
            subtype: event.subtype.clone(),
            ts: event.ts.clone(),
            thread_ts: event.thread_ts.clone(),
            client_msg_id: event.client_msg_id.clone(),
            is_bot: false,
            is_ai_generated: false,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        match message_queries::insert_message(&self.db, &message).await {
            Ok(()) => {}
            Err(StandinError::Duplicate {
                provider_message_id,
            }) => {
                debug!(%provider_message_id, "message already stored, dropping");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "failed to persist message");
                return None;
            }
        }

        // Backfill the display name on older rows, best effort.
        if let Some(name) = &user_name {
            if let Err(e) = message_queries::update_display_name(&self.db, &user_id, name).await {
                debug!(error = %e, "display name backfill failed");
            }
        }

        info!(
            provider_message_id = %message.provider_message_id,
            channel_id = %message.channel_id,
            "message stored"
        );
        Some(message)
    }
}
