// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event intake filtering and in-memory deduplication.
//!
//! Slack redelivers events on slow acks, so the intake keeps a bounded set
//! of recently seen message ids. The set is a fast first line only; the
//! unique index in the message store stays authoritative.

use std::collections::VecDeque;
use std::sync::Mutex;

use dashmap::DashSet;

use crate::events::MessageEvent;

/// Message subtypes that never enter the pipeline.
const IGNORED_SUBTYPES: &[&str] = &[
    "message_deleted",
    "message_changed",
    "channel_join",
    "bot_message",
];

/// Intake decision for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acceptance {
    /// Process the event.
    Process,
    /// Ignore the event; the reason is for logs only.
    Skip(&'static str),
    /// Already seen in this process.
    Duplicate,
}

/// Bounded insertion-ordered set of recently seen message ids.
///
/// When full, the oldest id is evicted first.
pub struct DedupSet {
    seen: DashSet<String>,
    order: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl DedupSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            seen: DashSet::new(),
            order: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Record `id`; returns false when it was already present.
    pub fn insert(&self, id: &str) -> bool {
        if !self.seen.insert(id.to_string()) {
            return false;
        }
        let mut order = match self.order.lock() {
            Ok(order) => order,
            Err(poisoned) => poisoned.into_inner(),
        };
        order.push_back(id.to_string());
        while order.len() > self.capacity {
            if let Some(evicted) = order.pop_front() {
                self.seen.remove(&evicted);
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Filters raw message events before they reach persistence.
pub struct EventIntake {
    dedup: DedupSet,
}

impl EventIntake {
    pub fn new(dedup_capacity: usize) -> Self {
        Self {
            dedup: DedupSet::new(dedup_capacity),
        }
    }

    /// Decide whether the event enters the pipeline.
    ///
    /// Order matters: shape filters run before the dedup set so skipped
    /// events never occupy dedup capacity.
    pub fn accept(&self, event: &MessageEvent) -> Acceptance {
        if event.kind != "message" {
            return Acceptance::Skip("not a message event");
        }
        if let Some(subtype) = &event.subtype {
            if IGNORED_SUBTYPES.contains(&subtype.as_str()) {
                return Acceptance::Skip("ignored subtype");
            }
        }
        if event.bot_id.is_some() {
            return Acceptance::Skip("bot author");
        }
        if event.user.is_none() {
            return Acceptance::Skip("no author");
        }
        if event.ts.is_empty() {
            return Acceptance::Skip("no timestamp");
        }
        if !self.dedup.insert(event.stable_id()) {
            return Acceptance::Duplicate;
        }
        Acceptance::Process
    }
}
