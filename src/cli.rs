use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Join referral CSV extracts into a single report and profile every input",
    long_about = None
)]
pub struct Cli {
    /// Directory holding the seven input CSV files
    #[arg(long = "data-dir", default_value = "data")]
    pub data_dir: PathBuf,
    /// Directory receiving report.csv and profiling_summary.csv (created if missing)
    #[arg(long = "out-dir", default_value = "out")]
    pub out_dir: PathBuf,
}
