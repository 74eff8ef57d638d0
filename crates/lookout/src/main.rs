//! Lookout CLI - ask questions about the objects a detector found in an image.
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP boundary for the browser frontend
//! lookout serve --bind 127.0.0.1:8000
//!
//! # Ask once from a saved detector output
//! lookout ask --detections boxes.json --question "Is there a dog?"
//!
//! # Inspect what the normalizer makes of raw boxes
//! lookout normalize boxes.json --pretty
//!
//! # View configuration
//! lookout config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;
mod server;

/// Lookout - question answering over object detections.
#[derive(Parser, Debug)]
#[command(name = "lookout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the question endpoint over HTTP
    Serve(cli::serve::ServeArgs),

    /// Answer a single question about a detections file
    Ask(cli::ask::AskArgs),

    /// Normalize raw detector output and print it as JSON
    Normalize(cli::normalize::NormalizeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't up yet, so config warnings go straight to stderr.
    let config = match lookout_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `lookout config path`."
            );
            lookout_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Lookout v{}", lookout_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args).await,
        Commands::Ask(args) => cli::ask::execute(args).await,
        Commands::Normalize(args) => cli::normalize::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
