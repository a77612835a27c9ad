// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision engine for the standin responder.
//!
//! Takes a stored chat message through a fixed-order pipeline (context,
//! urgency, directness, sensitivity, generation) and hands the outcome to a
//! delay-based scheduler. Every stage is fail-open: the pipeline always
//! terminates, degrading to conservative fallbacks rather than erroring.

pub mod analysis;
pub mod context;
pub mod pipeline;
pub mod prompts;
pub mod responder;
pub mod scheduler;

pub use analysis::Analyzer;
pub use context::ContextAssembler;
pub use pipeline::{Pipeline, PipelineOutcome};
pub use prompts::Persona;
pub use scheduler::{DelayTable, ResponseScheduler};
