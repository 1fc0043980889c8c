use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Polynomial model identification from input/output records.
#[derive(Parser)]
#[command(
    name = "sysid",
    version,
    about = "Prediction-error identification of ARX, ARMAX, OE and BJ models"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Estimate a model and print it.
    Fit(FitArgs),
    /// Validate orders against the data without estimating.
    Check(CheckArgs),
}

/// Arguments for the `fit` subcommand.
#[derive(clap::Args)]
pub struct FitArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "sysid.toml")]
    pub config: PathBuf,

    /// Override the CSV data path from config.
    #[arg(short, long)]
    pub data: Option<PathBuf>,
}

/// Arguments for the `check` subcommand.
#[derive(clap::Args)]
pub struct CheckArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "sysid.toml")]
    pub config: PathBuf,

    /// Override the CSV data path from config.
    #[arg(short, long)]
    pub data: Option<PathBuf>,
}
