// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the standin responder.
//!
//! This crate provides the error type, domain types, and trait seams used
//! throughout the standin workspace. The decision engine depends only on
//! the traits defined here, never on concrete providers or senders.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StandinError;
pub use traits::{ChatSender, CompletionProvider, CompletionRequest, OutgoingMessage};
pub use types::{
    ChatMessage, DirectnessAssessment, MessageFilter, SensitivityAssessment, SensitivityLevel,
    UrgencyAssessment, UrgencyLevel,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standin_error_has_all_variants() {
        let _config = StandinError::Config("test".into());
        let _storage = StandinError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = StandinError::Channel {
            message: "test".into(),
            source: None,
        };
        let _provider = StandinError::Provider {
            message: "test".into(),
            source: None,
        };
        let _validation = StandinError::Validation("skip must be >= 0".into());
        let _duplicate = StandinError::Duplicate {
            provider_message_id: "1727000000.000100".into(),
        };
        let _timeout = StandinError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = StandinError::Internal("test".into());
    }

    #[test]
    fn duplicate_error_names_the_message() {
        let err = StandinError::Duplicate {
            provider_message_id: "abc-123".into(),
        };
        assert_eq!(err.to_string(), "duplicate message: abc-123");
    }
}
