//! mdv CLI - Markdown documentation viewer.
//!
//! Provides commands for:
//! - `serve`: Start the documentation server
//! - `generate`: Run the API documentation generator once

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{GenerateArgs, ServeArgs};
use error::CliError;
use output::Output;

/// mdv - Markdown documentation viewer.
#[derive(Parser)]
#[command(name = "mdv", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the documentation server.
    Serve(ServeArgs),
    /// Generate API documentation into the generated-docs directory.
    Generate(GenerateArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Serve(args) => args.verbose,
        Commands::Generate(args) => args.verbose,
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, std::env::var("RUST_LOG").ok()))
        .init();

    let result = tokio::runtime::Runtime::new()
        .map_err(CliError::from)
        .and_then(|rt| match cli.command {
            Commands::Serve(args) => rt.block_on(args.execute()),
            Commands::Generate(args) => rt.block_on(args.execute()),
        });

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// Log filter: `--verbose` enables INFO, otherwise `RUST_LOG` or WARN.
fn log_filter(verbose: bool, rust_log: Option<String>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
