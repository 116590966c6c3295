use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fertiplan",
    version,
    about = "Fertilization planning and nutrient balance engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the guideline tables and the plan document
    Check,
    /// Print the nutrient balances of one parcel-year
    Balance {
        /// Parcel id from the plan document
        #[arg(long)]
        parcel: i64,
        /// Sub-partition of the parcel
        #[arg(long, default_value_t = 0)]
        sub_suffix: i64,
        /// Planning year, defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },
    /// List fertilizations across the plan
    Report {
        /// Restrict to one planning year
        #[arg(long)]
        year: Option<i32>,
    },
}
