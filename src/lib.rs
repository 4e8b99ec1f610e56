pub mod cli;
pub mod columns;
pub mod error;
pub mod io_utils;
pub mod join;
pub mod keys;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod repair;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::Cli,
    pipeline::{PipelineConfig, run_pipeline},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("referral_report", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = PipelineConfig::new(cli.data_dir, cli.out_dir);
    info!(
        "Building report from {:?} into {:?}",
        config.data_dir, config.out_dir
    );
    let summary = run_pipeline(&config)
        .with_context(|| format!("Building report from {:?}", config.data_dir))?;
    println!("Created:");
    println!(" - {}", summary.profile_path.display());
    println!(" - {}", summary.report_path.display());
    info!(
        "Report has {} row(s) x {} column(s); profiled {} column(s)",
        summary.report_rows, summary.report_columns, summary.profile_records
    );
    Ok(())
}
