//! Pool price oracle watcher - main entry point
//!
//! Loads `.env`, resolves the configuration and runs the watcher until
//! Ctrl-C. Any startup error is reported on stderr and ends the process with
//! a non-zero exit status.

use std::fmt::Display;
use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};

use pool_price_oracle::config::{self, EnvOptions};
use pool_price_oracle::constants::ENV_FILE;
use pool_price_oracle::telemetry::{init_telemetry, LogFormat};
use pool_price_oracle::{OracleConfig, Watcher};

/// Reports a startup failure and returns the failing exit code
///
/// Falls back to plain stderr when the log filter drops errors, so the
/// message is never lost.
fn fatal(message: &str, err: impl Display) -> ExitCode {
    if tracing::enabled!(Level::ERROR) {
        error!(error = %err, "{}", message);
    } else {
        eprintln!("{}: {}", message, err);
    }
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    // The env file may carry RUST_LOG / LOG_FORMAT, so it is loaded before
    // anything is read from the environment
    let env_file = config::load_env_file(ENV_FILE);

    let log_format = config::get("LOG_FORMAT", &EnvOptions::default()).unwrap_or_default();
    init_telemetry(LogFormat::from_env_value(&log_format));

    if let Err(e) = env_file {
        return fatal("Startup failed", e);
    }

    let oracle_config = match OracleConfig::from_env() {
        Ok(oracle_config) => oracle_config,
        Err(e) => return fatal("Startup failed", e),
    };

    let watcher = match Watcher::new(oracle_config) {
        Ok(watcher) => watcher,
        Err(e) => return fatal("Failed to create GraphQL client", e),
    };

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                signal_token.cancel();
            }
            Err(e) => error!(error = %e, "Failed to install Ctrl-C handler"),
        }
    });

    watcher.start(shutdown).await;
    ExitCode::SUCCESS
}
