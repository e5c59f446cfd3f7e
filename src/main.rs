// src/main.rs

//! leetcrawl: sequential LeetCode problem crawler CLI
//!
//! Fetches every problem from leetcode.com or leetcode.cn, one request at a
//! time, and writes each as `{id}.{slug}.json` in the output directory.
//! Existing files are skipped unless `--update` is given, so interrupted
//! runs resume where they left off.

use std::path::PathBuf;

use clap::Parser;

use leetcrawl::error::Result;
use leetcrawl::models::Config;
use leetcrawl::pipeline::{CrawlOptions, run_crawler};
use leetcrawl::services::SiteKind;

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(
    name = "leetcrawl",
    version,
    about = "Crawl all problems from leetcode.com or leetcode.cn"
)]
struct Cli {
    /// Site variant to crawl
    #[arg(short, long, value_enum, default_value = "com")]
    site: SiteKind,

    /// Output directory
    #[arg(short, long, default_value = "problems")]
    output: PathBuf,

    /// Local metadata snapshot, used instead of the live listing endpoint
    #[arg(short, long)]
    metadata_file: Option<PathBuf>,

    /// Re-fetch and overwrite existing problems
    #[arg(short, long)]
    update: bool,

    /// Lowest problem id to crawl (inclusive)
    #[arg(long)]
    start: Option<u64>,

    /// Highest problem id to crawl (inclusive)
    #[arg(long)]
    end: Option<u64>,

    /// Configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    let options = CrawlOptions {
        output_dir: cli.output,
        metadata_file: cli.metadata_file,
        update: cli.update,
        start: cli.start,
        end: cli.end,
    };

    // Per-item failures are counted, logged, and do not affect the exit
    // status; only a failed startup (no index at all) exits non-zero.
    run_crawler(&config, cli.site, &options).await?;

    Ok(())
}
