//! CLI module for Parley
//!
//! Provides commands:
//! - `ask`: send one message and print the answer
//! - `chat`: interactive conversation over stdin
//! - `config`: print the effective configuration

use crate::app;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use parley_core::{Orchestrator, TranscriptStore};
use parley_tools::CapabilityRegistry;
use std::sync::Arc;

pub mod ask;
pub mod chat;
pub mod config;
mod render;

/// Parley AI request orchestrator CLI
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Cost-aware AI request orchestrator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one message and print the answer
    Ask(AskArgs),
    /// Start an interactive conversation
    Chat {
        /// Tenant the conversation belongs to
        #[arg(long, default_value = "local")]
        tenant: String,
        /// Print the answer as it is generated
        #[arg(long)]
        stream: bool,
    },
    /// Print the effective configuration
    Config,
}

/// Arguments of `parley ask`
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Message to send
    pub message: String,
    /// Tenant the request belongs to
    #[arg(long, default_value = "local")]
    pub tenant: String,
    /// Print the answer as it is generated
    #[arg(long)]
    pub stream: bool,
    /// Skip routing: "economy", "premium" or a model id
    #[arg(long)]
    pub force_model: Option<String>,
    /// Bypass both cache layers
    #[arg(long)]
    pub skip_cache: bool,
    /// Output token cap for this request
    #[arg(long)]
    pub max_tokens: Option<u32>,
    /// Print the usage report afterwards
    #[arg(long)]
    pub stats: bool,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Ask(args)) => ask::run(args).await,
        Some(Commands::Chat { tenant, stream }) => chat::run(&tenant, stream).await,
        Some(Commands::Config) => config::run(),
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Load configuration and assemble an orchestrator backed by the real client
fn start(transcripts: Option<Arc<dyn TranscriptStore>>) -> Result<Arc<Orchestrator>> {
    let config = app::load_config()?;
    let client = app::connect(&config)?;
    let orchestrator =
        app::build_orchestrator(&config, client, Arc::new(CapabilityRegistry::new()), transcripts)?;
    Ok(Arc::new(orchestrator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "parley",
            "ask",
            "What are your hours?",
            "--tenant",
            "acme",
            "--force-model",
            "premium",
            "--max-tokens",
            "200",
            "--stats",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Ask(args)) => {
                assert_eq!(args.message, "What are your hours?");
                assert_eq!(args.tenant, "acme");
                assert_eq!(args.force_model.as_deref(), Some("premium"));
                assert_eq!(args.max_tokens, Some(200));
                assert!(args.stats);
                assert!(!args.stream);
                assert!(!args.skip_cache);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_chat_defaults() {
        let cli = Cli::try_parse_from(["parley", "chat", "--stream"]).unwrap();
        match cli.command {
            Some(Commands::Chat { tenant, stream }) => {
                assert_eq!(tenant, "local");
                assert!(stream);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_ask_requires_message() {
        assert!(Cli::try_parse_from(["parley", "ask"]).is_err());
    }
}
