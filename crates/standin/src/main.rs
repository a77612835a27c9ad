// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Standin - a Slack persona responder.
//!
//! This is the binary entry point for the standin service.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod serve;

/// Standin - a Slack persona responder.
#[derive(Parser, Debug)]
#[command(name = "standin", version, about, long_about = None)]
struct Cli {
    /// Path to a configuration file (overrides the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server and responder.
    Serve,
    /// Load the configuration and print the effective values.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => standin_config::load_and_validate_path(path),
        None => standin_config::load_and_validate(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("standin: configuration error: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("standin serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            println!("agent.name = {}", config.agent.name);
            println!("agent.log_level = {}", config.agent.log_level);
            println!("persona.principal_name = {}", config.persona.principal_name);
            println!("persona.principal_role = {}", config.persona.principal_role);
            println!(
                "slack.bot_token = {}",
                if config.slack.bot_token.is_some() { "[set]" } else { "[unset]" }
            );
            println!(
                "slack.signing_secret = {}",
                if config.slack.signing_secret.is_some() { "[set]" } else { "[unset]" }
            );
            println!(
                "openai.api_key = {}",
                if config.openai.api_key.is_some() { "[set]" } else { "[unset]" }
            );
            println!("openai.model = {}", config.openai.model);
            println!("storage.database_path = {}", config.storage.database_path);
            println!("responder.bypass_keyword = {}", config.responder.bypass_keyword);
            println!("gateway.host = {}", config.gateway.host);
            println!("gateway.port = {}", config.gateway.port);
        }
        None => {
            println!("standin: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        let config =
            standin_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.agent.name, "standin");
        assert_eq!(config.gateway.port, 8000);
    }
}
