// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the standin responder.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use standin_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Service name: {}", config.agent.name);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::StandinConfig;

use standin_core::StandinError;

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<StandinConfig, StandinError> {
    let config = loader::load_config().map_err(|e| StandinError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from an explicit file path and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<StandinConfig, StandinError> {
    let config =
        loader::load_config_from_path(path).map_err(|e| StandinError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<StandinConfig, StandinError> {
    let config =
        loader::load_config_from_str(toml_content).map_err(|e| StandinError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}
