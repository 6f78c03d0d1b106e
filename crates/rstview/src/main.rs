//! rstview CLI - reStructuredText preview.
//!
//! Provides commands for:
//! - `preview`: Resolve the preview HTML of one document
//! - `serve`: Start the preview server

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{PreviewArgs, ServeArgs};
use error::CliError;
use output::Output;

/// rstview - reStructuredText preview.
#[derive(Parser)]
#[command(name = "rstview", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the preview HTML of a document.
    Preview(PreviewArgs),
    /// Start the preview server.
    Serve(ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Preview(args) => args.verbose,
        Commands::Serve(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = tokio::runtime::Runtime::new()
        .map_err(CliError::from)
        .and_then(|rt| match cli.command {
            Commands::Preview(args) => rt.block_on(args.execute()),
            Commands::Serve(args) => rt.block_on(args.execute()),
        });

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
