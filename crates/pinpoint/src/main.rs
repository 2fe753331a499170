//! Pinpoint CLI - describe a marked person in an image and rank the descriptions.
//!
//! Sends the image to Gemini, asks for three one-sentence descriptions of the
//! bounded individual, has the model rank them, and writes everything to a
//! timestamped text file in the current directory.
//!
//! # Usage
//!
//! ```bash
//! # Three description calls + one judge call
//! pinpoint judge party.png
//!
//! # One upload + one JSON-mode call that describes and judges
//! pinpoint oneshot party.png
//!
//! # View configuration
//! pinpoint config show
//! ```

use clap::{Parser, Subcommand};
use pinpoint_core::{JudgmentError, SingleCallError};
use std::path::PathBuf;

mod cli;
mod logging;

/// Pinpoint - describe a marked person in an image and rank the descriptions.
#[derive(Parser, Debug)]
#[command(name = "pinpoint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate three descriptions with separate calls, then judge them together
    Judge(cli::RunArgs),

    /// Upload the image and describe + judge in a single JSON-mode call
    Oneshot(cli::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

/// Exit code for a failed parse: usage errors exit 1, help/version exit 0.
fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

/// One-line report for the failures `oneshot` handles itself (exit 1).
///
/// Anything else returns `None` and goes out of `main` with its cause chain.
fn caught_failure(err: &anyhow::Error) -> Option<String> {
    if let Some(e) = err.downcast_ref::<SingleCallError>() {
        return Some(e.to_string());
    }
    err.downcast_ref::<JudgmentError>()
        .map(|e| format!("Model output rejected: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = parse_exit_code(&e);
            // Printing can only fail if stderr/stdout is gone; nothing left to report to.
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => pinpoint_core::Config::load_from(path)?,
        None => match pinpoint_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `pinpoint config path`."
                );
                pinpoint_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Pinpoint v{}", pinpoint_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Judge(args) => cli::judge::execute(args, &config).await,
        Commands::Oneshot(args) => match cli::oneshot::execute(args, &config).await {
            Err(e) => match caught_failure(&e) {
                Some(message) => {
                    eprintln!("{message}");
                    std::process::exit(1);
                }
                None => Err(e),
            },
            ok => ok,
        },
        Commands::Config(args) => cli::config::execute(args, &config, cli.config.as_deref()),
    }
}
