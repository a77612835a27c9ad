// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./standin.toml` > `~/.config/standin/standin.toml` > `/etc/standin/standin.toml`
//! with environment variable overrides via `STANDIN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::StandinConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/standin/standin.toml` (system-wide)
/// 3. `~/.config/standin/standin.toml` (user XDG config)
/// 4. `./standin.toml` (local directory)
/// 5. `STANDIN_*` environment variables
pub fn load_config() -> Result<StandinConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StandinConfig::default()))
        .merge(Toml::file("/etc/standin/standin.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("standin/standin.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("standin.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<StandinConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StandinConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StandinConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StandinConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `STANDIN_SLACK_BOT_TOKEN` must
/// map to `slack.bot_token`, not `slack.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("STANDIN_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: STANDIN_SLACK_BOT_TOKEN -> "slack_bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("persona_", "persona.", 1)
            .replacen("slack_", "slack.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("responder_", "responder.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}
