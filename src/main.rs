//! # stock-forecast
//!
//! Command-line interface for the stock-forecast library.

mod cli;

use clap::Parser;
use std::process::ExitCode;
use stock_forecast::ForecastError;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ForecastError>() {
                Some(e) => eprintln!("error [{}]: {e}", e.kind()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
