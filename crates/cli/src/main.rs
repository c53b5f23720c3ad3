//! solaudit CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: Write a default config file
//! - `chat`: Send messages through the audit actions
//! - `metrics`: Print or save a Solidity metrics report
//! - `actions`: List registered actions
//! - `status`: Show configuration status

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "solaudit",
    about = "solaudit — LLM-assisted Solidity security audits",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Dispatch messages to the audit actions
    Chat {
        /// Send a single message instead of reading lines from stdin
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Generate a Solidity metrics report for a file or directory
    Metrics {
        /// A `.sol` file or a directory of them
        path: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered actions
    Actions,

    /// Show configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Metrics { path, output } => commands::metrics::run(path, output).await?,
        Commands::Actions => commands::actions::run().await?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
