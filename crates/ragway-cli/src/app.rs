//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ragway")]
#[command(
    author,
    version,
    about = "Retrieval-augmented search over Qdrant, Milvus or an in-memory store"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "RAGWAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Provision the backend, seed the corpus and serve MCP over stdio
    Serve(ServeArgs),

    /// Ask a question against the corpus
    Search(SearchArgs),

    /// Delete everything and reload the demo corpus
    Reseed,

    /// Liveness check
    Health,

    /// Show backend, models and document count
    Status,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Skip startup seeding
    #[arg(long)]
    pub no_seed: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Maximum documents to retrieve (defaults to search.default_max_results)
    #[arg(short = 'n', long = "max-results", allow_negative_numbers = true)]
    pub max_results: Option<i64>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
