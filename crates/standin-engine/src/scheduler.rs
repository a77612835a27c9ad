// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Humanlike delayed reply delivery.
//!
//! Replies are never sent immediately: each one is parked on a spawned task
//! for an urgency-keyed delay, then posted fire-and-forget. Send failures
//! are logged and dropped, never retried and never surfaced to the caller.
//! Scheduled deliveries live only in process memory; a restart loses them.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use standin_core::types::UrgencyLevel;
use standin_core::{ChatSender, OutgoingMessage};

/// Reply delays keyed by urgency, plus the bypass and ad-hoc test tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayTable {
    pub high: Duration,
    pub medium: Duration,
    pub low: Duration,
    pub bypass: Duration,
    /// Tier for ad-hoc test deliveries, outside the urgency mapping.
    pub test: Duration,
}

impl Default for DelayTable {
    fn default() -> Self {
        Self {
            high: Duration::from_secs(30),
            medium: Duration::from_secs(120),
            low: Duration::from_secs(300),
            bypass: Duration::from_secs(5),
            test: Duration::from_secs(30),
        }
    }
}

impl DelayTable {
    /// Delay for a reply. Bypass replies use their own short delay
    /// regardless of assessed urgency.
    pub fn delay_for(&self, urgency: UrgencyLevel, bypass: bool) -> Duration {
        if bypass {
            return self.bypass;
        }
        match urgency {
            UrgencyLevel::High => self.high,
            UrgencyLevel::Medium => self.medium,
            UrgencyLevel::Low => self.low,
        }
    }
}

/// Schedules delayed reply delivery through a [`ChatSender`].
pub struct ResponseScheduler {
    sender: Arc<dyn ChatSender>,
    delays: DelayTable,
}

impl ResponseScheduler {
    pub fn new(sender: Arc<dyn ChatSender>, delays: DelayTable) -> Self {
        Self { sender, delays }
    }

    pub fn delays(&self) -> &DelayTable {
        &self.delays
    }

    /// Park the reply on a background task and deliver it after the delay.
    ///
    /// Returns immediately. The spawned task owns the send; its failure is
    /// logged, never propagated.
    pub fn schedule(&self, msg: OutgoingMessage, urgency: UrgencyLevel, bypass: bool) {
        let delay = self.delays.delay_for(urgency, bypass);
        info!(
            channel_id = %msg.channel_id,
            delay_secs = delay.as_secs(),
            %urgency,
            bypass,
            "reply scheduled"
        );
        self.dispatch(msg, delay);
    }

    /// Park an ad-hoc test delivery on its own delay tier.
    ///
    /// `delay` overrides the configured tier for one-off runs.
    pub fn schedule_test(&self, msg: OutgoingMessage, delay: Option<Duration>) {
        let delay = delay.unwrap_or(self.delays.test);
        info!(
            channel_id = %msg.channel_id,
            delay_secs = delay.as_secs(),
            "test reply scheduled"
        );
        self.dispatch(msg, delay);
    }

    fn dispatch(&self, msg: OutgoingMessage, delay: Duration) {
        let sender = Arc::clone(&self.sender);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match sender.send(msg.clone()).await {
                Ok(ts) => info!(channel_id = %msg.channel_id, ts = %ts, "reply delivered"),
                Err(e) => error!(channel_id = %msg.channel_id, error = %e, "reply delivery failed"),
            }
        });
    }
}
