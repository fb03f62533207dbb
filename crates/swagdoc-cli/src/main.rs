//! # swagdoc CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use swagdoc_cli::check::{run_check, CheckArgs};
use swagdoc_cli::generate::{run_generate, GenerateArgs};
use swagdoc_cli::serve::{run_serve, ServeArgs};

/// swagdoc: Swagger documentation generator.
///
/// Builds Swagger 1.2 and 2.0 documents from a YAML manifest of schema
/// objects, handlers and endpoints.
#[derive(Parser, Debug)]
#[command(name = "swagdoc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate documentation from a manifest.
    Generate(GenerateArgs),

    /// Load and validate a settings file.
    CheckSettings(CheckArgs),

    /// Serve documentation over HTTP.
    Serve(ServeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate(args) => run_generate(&args),
        Commands::CheckSettings(args) => run_check(&args),
        Commands::Serve(args) => run_serve(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
