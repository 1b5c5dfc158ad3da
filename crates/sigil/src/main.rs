//! Sigil CLI - OAuth 1.0a Authorization headers.
//!
//! Provides commands for:
//! - `sign`: Print the `Authorization` header for a request
//! - `base-string`: Print the signature base string for a request
//! - `verify`: Check an inbound `Authorization` header

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{SignArgs, VerifyArgs};
use output::Output;

/// Sigil - OAuth 1.0a request signing.
#[derive(Parser)]
#[command(name = "sigil", version, about)]
struct Cli {
    /// Log signing details (base string, method) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Authorization header value for a request.
    Sign(SignArgs),
    /// Print the signature base string for a request.
    BaseString(SignArgs),
    /// Validate an inbound Authorization header.
    Verify(VerifyArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG for the signing crates, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("sigil=debug,sigil_oauth=debug,sigil_config=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Sign(args) => args.execute_sign(),
        Commands::BaseString(args) => args.execute_base_string(),
        Commands::Verify(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
