//! cmdk - main entry point.

use anyhow::Result;
use clap::Parser;

use cmdk_cli::cli::Cli;
use cmdk_cli::logging::init_file_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs only go to a file; the terminal belongs to the UI.
    let _log_guard = match &cli.log_file {
        Some(path) => Some(init_file_logging(path, cli.log_level)?),
        None => None,
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cmdk starting");
    cmdk_cli::run(cli).await
}
