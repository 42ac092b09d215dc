//! Dredge main entry point
//!
//! One binary, two long-running modes: the crawler (default) and the search
//! HTTP server (`--serve`). Both read the same TOML configuration and the
//! same database file, so they can run as separate processes side by side.

use clap::Parser;
use dredge::config::load_config_with_hash;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Dredge: a crawling full-text search engine
///
/// Crawl workers drain a shared priority frontier and index fetched pages
/// into SQLite FTS5; the server mode answers ranked, paginated queries over
/// whatever has been indexed so far.
#[derive(Parser, Debug)]
#[command(name = "dredge")]
#[command(version)]
#[command(about = "A crawling full-text search engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run the search HTTP server instead of crawling
    #[arg(long, conflicts_with = "dry_run")]
    serve: bool,

    /// Validate config and show what would run, without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.serve {
        dredge::server::run_server(config).await?;
    } else {
        dredge::crawler::run_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("dredge=info,warn"),
            1 => EnvFilter::new("dredge=debug,info"),
            2 => EnvFilter::new("dredge=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &dredge::config::Config) {
    println!("=== Dredge Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!(
        "  Max outlinks per page: {}",
        config.crawler.max_outlinks_per_page
    );
    println!("  Idle poll: {}ms", config.crawler.idle_poll_ms);
    println!(
        "  Tracking params stripped: {}",
        config.crawler.tracking_params.join(", ")
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nServer:");
    println!("  Bind address: {}", config.server.bind_addr);
    println!(
        "  Results per page: {} (max {})",
        config.server.results_per_page, config.server.max_per_page
    );

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start {} worker(s) with {} seed URL(s)",
        config.crawler.workers,
        config.crawler.seeds.len()
    );
}
