//! Magical Palace concierge CLI entry point.
//!
//! Commands:
//! - `onboard`: Write a default config file
//! - `serve`: Start the HTTP gateway
//! - `ask`: Answer a single question locally
//! - `doctor`: Diagnose configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "concierge",
    about = "Magical Palace concierge: hotel FAQ responder",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "CONCIERGE_JSON_LOGS")]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Onboard,

    /// Start the HTTP gateway server
    Serve {
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Answer one question without starting the server
    Ask {
        /// The guest's question
        message: String,

        /// Print the answer chunk by chunk, as the stream endpoint would
        #[arg(short, long)]
        stream: bool,
    },

    /// Diagnose configuration and knowledge file
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Serve { host, port } => commands::serve::run(host, port).await?,
        Commands::Ask { message, stream } => commands::ask::run(message, stream).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
