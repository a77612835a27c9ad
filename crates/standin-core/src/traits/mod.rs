// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the decision engine and its capabilities.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod completion;
pub mod delivery;

pub use completion::{CompletionProvider, CompletionRequest};
pub use delivery::{ChatSender, OutgoingMessage};
