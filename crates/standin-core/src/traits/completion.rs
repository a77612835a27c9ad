// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait for LLM integrations.

use async_trait::async_trait;

use crate::error::StandinError;

/// A single completion request: one system prompt and one user turn.
///
/// The pipeline never holds multi-turn provider state; conversation history
/// is flattened into the prompts by the context assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

/// Adapter for LLM provider integrations.
///
/// Implementations own their model name, sampling parameters, and transport.
/// The engine treats the provider as optional: a pipeline run with no
/// provider falls back to stage defaults rather than failing.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends a completion request and returns the generated text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, StandinError>;
}
