//! CLI argument parsing using clap derive

use clap::Parser;
use std::path::PathBuf;

/// Install dependencies, check the configuration and start the calendar sync
#[derive(Parser, Debug)]
#[command(name = "calsync-setup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Sync engine checkout to bootstrap (defaults to the current directory)
    #[arg(short = 'C', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,
}
