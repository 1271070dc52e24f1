mod cli;
mod progress;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use engine_logging::{engine_error, engine_info, LogDestination};
use sentenze_engine::{run_blocking, Pipeline};

use crate::cli::Cli;
use crate::progress::ConsoleProgress;

const CONFIG_ERROR_EXIT: u8 = 2;

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let destination = LogDestination::from_log_file(cli.log_file.as_deref());
    if !engine_logging::initialize(destination, cli.log_level) {
        eprintln!("warning: logger could not be initialized");
    }

    let pipeline = match build_pipeline(&cli) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            engine_error!("configuration error: {:#}", err);
            eprintln!("[CONFIG] {err:#}");
            return ExitCode::from(CONFIG_ERROR_EXIT);
        }
    };

    let date = cli.run_date();
    let config = pipeline.config();
    println!("[start] Date {date}, output in {}", config.out_dir.display());
    engine_info!(
        "max_pages={} max_chars={} attempts={}",
        config.limits.max_pages,
        config.limits.max_chars,
        config.retry.max_attempts
    );

    let progress = ConsoleProgress::new();
    match run_blocking(&pipeline, date, &progress) {
        Ok(report) => ExitCode::from(report.outcome.exit_code()),
        Err(err) => {
            engine_error!("runtime could not be started: {}", err);
            eprintln!("[FAILED] runtime could not be started: {err}");
            ExitCode::FAILURE
        }
    }
}

fn build_pipeline(cli: &Cli) -> Result<Pipeline> {
    let config = cli.pipeline_config();
    let provider = cli
        .source_provider(config.fetch.clone())
        .context("invalid source")?;
    Ok(Pipeline::new(config, provider))
}
