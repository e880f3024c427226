//! iiwake CLI — the main entry point.
//!
//! Commands:
//! - `onboard`  — Initialize the config file
//! - `serve`    — Start the HTTP gateway
//! - `generate` — One-shot generation to stdout

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "iiwake",
    about = "iiwake — lateness-excuse generation service",
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
    /// Write a default configuration file
    Onboard,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate excuses once and print them
    Generate {
        /// How late you are, e.g. "15分"
        #[arg(short, long)]
        delay: String,

        /// Who the excuse is for, e.g. "上司"
        #[arg(short, long)]
        target: String,

        /// What actually happened (optional)
        #[arg(short, long)]
        situation: Option<String>,

        /// Desired tone, e.g. "ユーモラスに" (optional)
        #[arg(long)]
        tone: Option<String>,
    },
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
        Commands::Onboard => commands::onboard::run()?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Generate {
            delay,
            target,
            situation,
            tone,
        } => commands::generate::run(delay, target, situation, tone).await?,
    }

    Ok(())
}
