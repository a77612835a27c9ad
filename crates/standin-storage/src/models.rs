// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `standin-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within the
//! storage crate.

pub use standin_core::types::{ChatMessage, MessageFilter};
