// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack integration for the standin responder.
//!
//! Covers the inbound half (Events API payloads, intake filtering and
//! deduplication) and the outbound half (`chat.postMessage` delivery,
//! `users.info` lookups), plus the service that wires one accepted event
//! through persistence, analysis, and scheduling.

pub mod events;
pub mod intake;
pub mod sender;
pub mod service;
pub mod users;

pub use events::{EventEnvelope, MessageEvent};
pub use intake::{Acceptance, EventIntake};
pub use sender::SlackSender;
pub use service::MessageService;
pub use users::UserDirectory;
