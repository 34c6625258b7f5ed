use anyhow::Result;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use topicharvest::app::{RunSummary, launch};
use topicharvest::cli::CliArgs;
use topicharvest::error::InputError;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Initialize tracing with env filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("topicharvest=info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(input_err) = err.downcast_ref::<InputError>() {
                println!("{}", input_err);
                return ExitCode::from(2);
            }
            error!("Application error: {:#}", err);
            println!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli_args = CliArgs::parse();

    info!("Starting topicharvest");
    let summary = launch(&cli_args, &mut io::stdin().lock(), &mut io::stdout())?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    if let Some(cleanup) = &summary.cleanup {
        println!("Removed {} folders", cleanup.removed.len());
        for (name, reason) in &cleanup.failed {
            println!("Error removing folder {}: {}", name.display(), reason);
        }
    }
    if let Some(report) = &summary.pipeline {
        println!("\nTotal repositories processed: {}", report.processed());
    }
}
