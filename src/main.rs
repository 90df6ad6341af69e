//! sockscheck - Entry Point
//!
//! Reads the candidate list, validates every proxy and writes the working ones.

use std::process::ExitCode;
use std::time::Instant;

use tracing::{error, info};

use sockscheck::config::Config;
use sockscheck::{app, logging};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sockscheck: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing
    if let Err(e) = logging::init(&config.log) {
        eprintln!("sockscheck: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    let start = Instant::now();
    let result = app::run(&config).await;
    info!("Completed in {:.2} seconds", start.elapsed().as_secs_f64());

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
