//! Teller - banking assistant REPL
//!
//! Thin CLI around the library: reads utterances from stdin, runs each one
//! through the agent, and prints the routing decision and reply. The
//! downstream banking API is not called here - the REPL shows what the
//! caller would invoke.

use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use teller::{
    log_error, log_info, logging, Action, AppConfig, BankingAgent, ConversationSession,
    RouteOutcome,
};
use tracing_subscriber::EnvFilter;

/// Teller - Conversational Banking Assistant CLI
#[derive(Parser, Debug)]
#[command(name = "teller")]
#[command(version = "0.1.0")]
#[command(about = "Conversational banking assistant REPL", long_about = None)]
struct Args {
    /// Configuration file path (overrides defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// NLU provider project id (overrides config)
    #[arg(long)]
    project_id: Option<String>,

    /// User id for the conversation session
    #[arg(long, default_value = "demo-user")]
    user: String,

    /// Session language, a BCP-47 tag
    #[arg(long, default_value = "en")]
    language: String,

    /// Treat the user as already authenticated
    #[arg(long)]
    authenticated: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    logging::init_logger()?;

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(project_id) = args.project_id {
        config.provider.project_id = project_id;
    }
    config.validate()?;

    let agent = BankingAgent::from_config(&config).context("failed to build agent")?;
    let session = ConversationSession::new(args.user.clone(), args.language.clone());

    println!("Teller banking assistant ({})", agent.provider_name());
    println!("Session: {}  User: {}", session.session_id, args.user);
    println!("Audit log: {}", logging::get_log_path_display());
    println!("Type a request, or 'exit' to quit.\n");
    log_info!("REPL session {} started", session.session_id);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();

        if text.is_empty() {
            continue;
        }
        if text == "exit" || text == "quit" {
            break;
        }

        match agent.process_turn(&session, text, args.authenticated).await {
            Ok(turn) => {
                let decision = turn.decision();
                println!(
                    "  intent: {} ({:.0}% confidence)",
                    decision.intent,
                    turn.recognition.confidence * 100.0
                );

                match &turn.outcome {
                    RouteOutcome::AuthRequired(decision) => {
                        println!("  action: sign-in required before {}", decision.intent);
                    }
                    RouteOutcome::Decision(decision) => {
                        match decision.action {
                            Action::AutoExecute => {
                                if let Some(endpoint) = &decision.operation.api_endpoint {
                                    println!("  action: execute {}", endpoint);
                                } else {
                                    println!("  action: reply directly");
                                }
                            }
                            Action::Confirm => {
                                if let Some(endpoint) = &decision.operation.api_endpoint {
                                    println!("  action: confirm, then {}", endpoint);
                                } else {
                                    println!("  action: confirm");
                                }
                            }
                            Action::Clarify => println!("  action: ask the user to rephrase"),
                        }
                        if let Some(ack) = &turn.acknowledgment {
                            println!("  reply: {}", ack);
                        }
                    }
                }
            }
            Err(err) => {
                log_error!("turn failed: {}", err);
                if err.is_transient() {
                    eprintln!("  provider unavailable, try again: {}", err);
                } else {
                    eprintln!("  error: {}", err);
                }
            }
        }
    }

    log_info!("REPL session {} ended", session.session_id);
    Ok(())
}
