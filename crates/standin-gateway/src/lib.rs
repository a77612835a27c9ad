// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface for the standin responder.
//!
//! One webhook route receives Slack Events API posts; two read-only
//! routes expose stored messages and the configured reply delays. The
//! webhook verifies Slack's request signature and always acks accepted
//! events before any pipeline work happens.

pub mod handlers;
pub mod server;
pub mod verify;

pub use server::{build_router, start_server, GatewayState, ServerConfig};
