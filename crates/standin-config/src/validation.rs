// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for values serde cannot check.

use standin_core::StandinError;

use crate::model::StandinConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate constraints that hold across fields or value ranges.
pub fn validate_config(config: &StandinConfig) -> Result<(), StandinError> {
    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        return Err(StandinError::Config(format!(
            "agent.log_level must be one of {LOG_LEVELS:?}, got {:?}",
            config.agent.log_level
        )));
    }

    if !(0.0..=2.0).contains(&config.openai.temperature) {
        return Err(StandinError::Config(format!(
            "openai.temperature must be in [0.0, 2.0], got {}",
            config.openai.temperature
        )));
    }

    if config.openai.timeout_secs == 0 {
        return Err(StandinError::Config(
            "openai.timeout_secs must be positive".to_string(),
        ));
    }

    if config.responder.bypass_keyword.trim().is_empty() {
        return Err(StandinError::Config(
            "responder.bypass_keyword must not be empty".to_string(),
        ));
    }

    if config.responder.dedup_capacity == 0 {
        return Err(StandinError::Config(
            "responder.dedup_capacity must be positive".to_string(),
        ));
    }

    Ok(())
}
