//! # Drively CLI
//!
//! Quotes, conflict previews and review checks from the terminal, plus a
//! few owner and member actions against a running backend.
//!
//! ## Usage
//! ```bash
//! # Price a rental for a Silver member
//! drively quote --price 1000 --tier silver --from 2025-05-10 --to 2025-05-12
//!
//! # Preview which requests accepting res-1 would remove
//! drively conflicts --file received.json --target res-1
//!
//! # Accept a request on the backend
//! DRIVELY_API_TOKEN=... drively accept --id res-1
//! ```
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show request-level logs
//! - `RUST_LOG=drively_client=trace` - Trace the client crate only
//! - Default: INFO level

mod args;
mod commands;

use drively_client::ClientError;
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let argv: Vec<String> = env::args().skip(1).collect();
    let result = match args::parse(&argv) {
        Ok(cli) => commands::run(cli).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ClientError>() {
                Some(client_err) => {
                    eprintln!("Error: {}", client_err.user_message());
                    if client_err.is_retryable() {
                        eprintln!("This looks temporary; try again in a moment.");
                    }
                    tracing::debug!(error = ?e, "Command failed");
                }
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,drively_client=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
