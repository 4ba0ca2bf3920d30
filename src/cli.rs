//! Command-line arguments for the `quarry` binary.
//!
//! Every value not given here comes from `QUARRY_*` environment variables
//! through [`quarry::config::Config::from_env`].

use clap::Parser;
use std::path::PathBuf;

/// Scrape the oldest articles of a blog and print them as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Blog listing page to start from
    #[arg(short, long)]
    pub listing_url: Option<String>,

    /// Number of articles to return
    #[arg(short = 'n', long)]
    pub target_count: Option<usize>,

    /// Article pages fetched at once
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Write the articles to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, env = "QUARRY_LOG_JSON")]
    pub json_logs: bool,
}
