//! Ragway CLI
//!
//! Retrieval-augmented search gateway.

use anyhow::Result;
use clap::Parser;
use ragway_core::error::exit_codes;
use ragway_core::{Config, Gateway, RagwayError};
use std::sync::Arc;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout carries MCP traffic under `serve`, so logs go to stderr
    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<RagwayError>()
            .map(RagwayError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let gateway = Arc::new(Gateway::from_config(config)?);

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args, gateway.clone()).await,
        Commands::Search(args) => commands::search::run(args, &gateway, cli.format).await,
        Commands::Reseed => commands::reseed::run(&gateway, cli.format).await,
        Commands::Health => commands::health::run(&gateway).await,
        Commands::Status => commands::status::run(&gateway, cli.format).await,
    }
}
