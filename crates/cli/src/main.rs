//! webpilot CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize configuration
//! - `run`     — Run a single browsing task to completion
//! - `chat`    — Interactive session with the agent
//! - `actions` — List the available browser actions

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "webpilot",
    about = "webpilot — a conversational agent that drives a real browser",
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

    /// Run a single browsing task and print the final answer
    Run {
        /// The task, e.g. "find the top story on news.ycombinator.com"
        task: String,

        /// Show the browser window while the agent works
        #[arg(long)]
        headed: bool,
    },

    /// Chat with the agent interactively
    Chat,

    /// List the available browser actions
    Actions,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Run { task, headed } => commands::run::run(task, headed).await?,
        Commands::Chat => commands::chat::run().await?,
        Commands::Actions => commands::actions::run().await?,
    }

    Ok(())
}
