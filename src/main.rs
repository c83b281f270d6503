//! Policy-Scout main entry point
//!
//! Command-line interface for discovering and ranking policy/help pages on
//! a target site.

use clap::Parser;
use policy_scout::config::{load_config, Config};
use policy_scout::crawler::discover_policy_urls;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Policy-Scout: find policy and help pages on an e-commerce site
///
/// Crawls the target domain, merging sitemap enumeration with breadth-first
/// link following, and prints the discovered URLs ranked by how likely they
/// are to hold shipping, returns, or FAQ content.
#[derive(Parser, Debug)]
#[command(name = "policy-scout")]
#[command(version = "1.0.0")]
#[command(about = "Find policy/help pages for a domain", long_about = None)]
struct Cli {
    /// Target domain or base URL (e.g. shop.example)
    #[arg(long, value_name = "DOMAIN")]
    domain: String,

    /// Maximum number of URLs to return
    #[arg(long)]
    limit: Option<usize>,

    /// Maximum number of pages to crawl
    #[arg(long)]
    max_pages: Option<u32>,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print URLs, no logs
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    // CLI flags win over the config file
    if let Some(limit) = cli.limit {
        config.crawler.max_results = limit;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }

    tracing::info!(
        "Crawling {} (max {} pages, up to {} results)",
        cli.domain,
        config.crawler.max_pages,
        config.crawler.max_results
    );

    let urls = discover_policy_urls(&config, &cli.domain).await?;

    if cli.quiet {
        for url in &urls {
            println!("{}", url);
        }
    } else if urls.is_empty() {
        println!("No policy/help pages discovered for {}", cli.domain);
    } else {
        println!(
            "Found {} policy/help URLs (most relevant first):\n",
            urls.len()
        );
        for (i, url) in urls.iter().enumerate() {
            println!("{:2}. {}", i + 1, url);
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("policy_scout=info,warn"),
            1 => EnvFilter::new("policy_scout=debug,info"),
            2 => EnvFilter::new("policy_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
