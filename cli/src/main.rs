//! # SiteKit Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the SiteKit CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the appropriate command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! sitekit --help
//!
//! # Ask the chatbot a question
//! sitekit chat --ask "What is OOP in Java?"
//!
//! # Serve the site with increased verbosity
//! sitekit -vv srv ./site
//! ```
//!
use clap::Parser;
use sitekit::commands;
use tracing_subscriber::{fmt, EnvFilter};

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "sitekit",
    about = "SiteKit: guide/tracker site toolkit with a keyword-matching chatbot",
    long_about = "Chat with the site's keyword bot, inspect knowledge bases, and serve the site locally.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    #[command(alias = "k")]
    Kb(commands::kb::KbArgs),
    #[command(alias = "s")]
    Srv(commands::srv::SrvArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Chat(args) => commands::chat::handle_chat(args).await,
        Commands::Kb(args) => commands::kb::handle_kb(args).await,
        Commands::Srv(args) => commands::srv::handle_srv(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
