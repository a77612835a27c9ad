// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `standin serve` command implementation.
//!
//! Wires the store, the OpenAI client, the decision pipeline, the Slack
//! delivery path, and the gateway server together from configuration.
//! Missing credentials degrade features instead of refusing to start:
//! no OpenAI key means fallback-only analysis, no bot token means
//! replies are logged instead of posted.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use standin_config::StandinConfig;
use standin_core::{ChatSender, CompletionProvider, OutgoingMessage, StandinError};
use standin_engine::{
    Analyzer, ContextAssembler, DelayTable, Persona, Pipeline, ResponseScheduler,
};
use standin_gateway::{start_server, GatewayState, ServerConfig};
use standin_openai::OpenAiClient;
use standin_slack::{EventIntake, MessageService, SlackSender, UserDirectory};
use standin_storage::Database;

/// Stand-in sender used when no bot token is configured. Logs the reply
/// and reports success so the rest of the path behaves normally.
struct DryRunSender;

#[async_trait]
impl ChatSender for DryRunSender {
    async fn send(&self, msg: OutgoingMessage) -> Result<String, StandinError> {
        info!(channel_id = %msg.channel_id, text = %msg.text, "dry-run reply (no bot token)");
        Ok(String::new())
    }
}

/// Runs the `standin serve` command.
pub async fn run_serve(config: StandinConfig) -> Result<(), StandinError> {
    init_tracing(&config.agent.log_level);

    info!("starting standin serve");

    let db =
        Database::open_with_options(&config.storage.database_path, config.storage.wal_mode).await?;
    info!(path = %config.storage.database_path, "message store ready");

    let provider: Option<Arc<dyn CompletionProvider>> = match &config.openai.api_key {
        Some(api_key) => {
            let client = OpenAiClient::new(
                api_key,
                config.openai.model.clone(),
                config.openai.temperature,
                config.openai.max_tokens,
                config.openai.timeout_secs,
            )?;
            info!(model = %config.openai.model, "openai provider ready");
            Some(Arc::new(client))
        }
        None => {
            warn!("openai.api_key not set -- analysis falls back, generation disabled");
            None
        }
    };

    let sender: Arc<dyn ChatSender> = match &config.slack.bot_token {
        Some(token) => Arc::new(SlackSender::new(token.clone())),
        None => {
            warn!("slack.bot_token not set -- replies are logged, not posted");
            Arc::new(DryRunSender)
        }
    };
    let users = Arc::new(UserDirectory::new(config.slack.bot_token.clone()));

    let persona = Persona {
        name: config.persona.principal_name.clone(),
        role: config.persona.principal_role.clone(),
        company: config.persona.company_name.clone(),
    };
    let pipeline = Pipeline::new(
        ContextAssembler::new(
            db.clone(),
            config.persona.principal_user_id.clone(),
            config.responder.context_limit,
            config.responder.style_limit,
        ),
        Analyzer::new(provider, Duration::from_secs(config.openai.timeout_secs)),
        persona,
        config.responder.bypass_keyword.clone(),
    );

    let delays = DelayTable {
        high: Duration::from_secs(config.responder.delay_high_secs),
        medium: Duration::from_secs(config.responder.delay_medium_secs),
        low: Duration::from_secs(config.responder.delay_low_secs),
        bypass: Duration::from_secs(config.responder.delay_bypass_secs),
        test: Duration::from_secs(config.responder.delay_test_secs),
    };
    let scheduler = ResponseScheduler::new(sender, delays);

    let service = MessageService::new(
        EventIntake::new(config.responder.dedup_capacity),
        db.clone(),
        users,
        pipeline,
        scheduler,
    );

    if config.slack.signing_secret.is_none() {
        warn!("slack.signing_secret not set -- webhook signature checks disabled");
    }

    let state = GatewayState {
        service: Arc::new(service),
        db,
        delays,
        signing_secret: config.slack.signing_secret.clone(),
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    start_server(&server_config, state).await
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("standin={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
