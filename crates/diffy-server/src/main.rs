//! diffy - shadow-traffic comparator
//!
//! Main entry point for the diffy server.

mod logging;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use diffy_api::{start_server, AppState};
use diffy_client::{BackendClient, DualDispatcher};
use diffy_config::Cli;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = match Cli::parse().into_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {}\n", e);
            let _ = Cli::command().print_help();
            std::process::exit(2);
        }
    };

    logging::init(&settings.log_target)?;

    let addr = settings.listen_addr();
    let client = BackendClient::new(settings.timeout)?;
    let timeout = client.timeout();
    let dispatcher = DualDispatcher::new(client, settings.primary, settings.candidate);

    info!(
        primary = %dispatcher.primary(),
        candidate = %dispatcher.candidate(),
        port = settings.port,
        timeout = ?timeout,
        "Starting diffy"
    );
    println!("server started, use gor to forward requests...");

    tokio::select! {
        result = start_server(AppState::new(dispatcher), addr) => {
            result.with_context(|| format!("failed to serve on {}", addr))?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutting down...");
        }
    }

    Ok(())
}
