//! VeriFact server binary
//!
//! Starts the fact-check HTTP server.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use verifact_server::{config::ServerConfig, start_server, ServerError};

/// VeriFact - fact-check text through a claim, evidence and verdict pipeline
#[derive(Debug, Parser)]
#[command(name = "verifact-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(short, long, env = "VERIFACT_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address as host:port, overrides the config file
    #[arg(short, long)]
    bind: Option<String>,

    /// Run with canned offline answers instead of a language model
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if args.offline {
        config = config.into_offline();
    }
    if let Some(bind) = &args.bind {
        config.set_bind_addr(bind);
    }
    config.validate()?;

    start_server(config).await
}
