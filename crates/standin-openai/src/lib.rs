// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat-completions provider for the standin responder.
//!
//! Implements the `CompletionProvider` seam from `standin-core` over the
//! OpenAI HTTP API with bearer auth and single-retry on transient errors.

pub mod client;
pub mod types;

pub use client::OpenAiClient;
