mod args;
mod output;
mod report;
mod runner;

use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use args::Cli;
use runner::run_report;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run_report(&cli.filename, &cli.fingerprints, &cli.output_format).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries only the report.
fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
