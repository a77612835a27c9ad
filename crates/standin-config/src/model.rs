// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the standin responder.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level standin configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StandinConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// The principal the responder impersonates.
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Slack workspace integration settings.
    #[serde(default)]
    pub slack: SlackConfig,

    /// OpenAI API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Decision pipeline and reply scheduling settings.
    #[serde(default)]
    pub responder: ResponderConfig,

    /// Inbound HTTP surface settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "standin".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// The person the responder writes as.
///
/// `principal_user_id` is the Slack user id whose past messages become style
/// examples. `None` disables the authored-by filter when gathering examples.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PersonaConfig {
    /// Slack user id of the principal.
    #[serde(default)]
    pub principal_user_id: Option<String>,

    /// Name used inside prompts.
    #[serde(default = "default_principal_name")]
    pub principal_name: String,

    /// Role used inside prompts (affects urgency judgement).
    #[serde(default = "default_principal_role")]
    pub principal_role: String,

    /// Company name used inside prompts.
    #[serde(default)]
    pub company_name: Option<String>,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            principal_user_id: None,
            principal_name: default_principal_name(),
            principal_role: default_principal_role(),
            company_name: None,
        }
    }
}

fn default_principal_name() -> String {
    "Madim".to_string()
}

fn default_principal_role() -> String {
    "CTO".to_string()
}

/// Slack workspace integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SlackConfig {
    /// Bot OAuth token (`xoxb-…`). `None` disables outbound delivery.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Signing secret used to verify inbound webhook signatures.
    /// `None` disables signature verification (local development only).
    #[serde(default)]
    pub signing_secret: Option<String>,
}

/// OpenAI API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` runs the pipeline on stage fallbacks only.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model to use for all completion requests.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    30
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("standin").join("standin.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("standin.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Decision pipeline and reply scheduling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResponderConfig {
    /// Reply delay in seconds for high-urgency messages.
    #[serde(default = "default_delay_high_secs")]
    pub delay_high_secs: u64,

    /// Reply delay in seconds for medium-urgency messages.
    #[serde(default = "default_delay_medium_secs")]
    pub delay_medium_secs: u64,

    /// Reply delay in seconds for low-urgency messages.
    #[serde(default = "default_delay_low_secs")]
    pub delay_low_secs: u64,

    /// Reply delay in seconds for bypass-keyword test messages.
    #[serde(default = "default_delay_bypass_secs")]
    pub delay_bypass_secs: u64,

    /// Reply delay in seconds for ad-hoc test deliveries.
    #[serde(default = "default_delay_test_secs")]
    pub delay_test_secs: u64,

    /// Keyword that short-circuits analysis (case-insensitive substring).
    #[serde(default = "default_bypass_keyword")]
    pub bypass_keyword: String,

    /// Maximum number of message ids held in the in-memory dedup set.
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,

    /// Number of recent channel messages pulled as conversation context.
    #[serde(default = "default_context_limit")]
    pub context_limit: usize,

    /// Number of principal messages pulled as style-example candidates.
    #[serde(default = "default_style_limit")]
    pub style_limit: usize,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            delay_high_secs: default_delay_high_secs(),
            delay_medium_secs: default_delay_medium_secs(),
            delay_low_secs: default_delay_low_secs(),
            delay_bypass_secs: default_delay_bypass_secs(),
            delay_test_secs: default_delay_test_secs(),
            bypass_keyword: default_bypass_keyword(),
            dedup_capacity: default_dedup_capacity(),
            context_limit: default_context_limit(),
            style_limit: default_style_limit(),
        }
    }
}

fn default_delay_high_secs() -> u64 {
    30
}

fn default_delay_medium_secs() -> u64 {
    120
}

fn default_delay_low_secs() -> u64 {
    300
}

fn default_delay_bypass_secs() -> u64 {
    5
}

fn default_delay_test_secs() -> u64 {
    30
}

fn default_bypass_keyword() -> String {
    "loco".to_string()
}

fn default_dedup_capacity() -> usize {
    1024
}

fn default_context_limit() -> usize {
    10
}

fn default_style_limit() -> usize {
    30
}

/// Inbound HTTP surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8000
}
