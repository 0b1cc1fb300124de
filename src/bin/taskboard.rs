//! Task board server entry point.

use clap::Parser;
use std::process::ExitCode;
use taskboard::config::ServerConfig;
use taskboard::{server, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();
    telemetry::init(&config.log_filter);
    match server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "task board failed");
            ExitCode::FAILURE
        }
    }
}
