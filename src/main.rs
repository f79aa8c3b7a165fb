//! Sitelens main entry point
//!
//! Command-line interface for running a site audit: discovery plus link
//! graph analysis, with a console summary and a markdown report file.

use clap::Parser;
use sitelens::config::load_config_with_hash;
use sitelens::graph::analyze_links;
use sitelens::output::{build_summary, print_summary, write_markdown_summary};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sitelens: site discovery and internal link analysis
///
/// Sitelens enumerates a site's pages (sitemap-first, with a polite BFS
/// fallback), builds the internal link graph, and reports orphan pages,
/// link depth, broken and nofollow links, and anchor-text issues.
#[derive(Parser, Debug)]
#[command(name = "sitelens")]
#[command(version = "0.3.0")]
#[command(about = "Site discovery and internal link analysis", long_about = None)]
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

    /// Validate config and show what would be audited without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
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
        return Ok(());
    }

    handle_audit(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitelens=info,warn"),
            1 => EnvFilter::new("sitelens=debug,info"),
            2 => EnvFilter::new("sitelens=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the audit plan
fn handle_dry_run(config: &sitelens::Config) {
    println!("=== Sitelens Dry Run ===\n");

    println!("Audit Target:");
    println!("  Domain: {}", config.audit.domain);
    match &config.audit.start_url {
        Some(url) => println!("  Start URL: {}", url),
        None => println!("  Start URL: https://{}/ (default)", config.audit.domain),
    }

    println!("\nDiscovery:");
    println!("  Max pages: {}", config.discovery.max_pages);
    println!("  Max crawl depth: {}", config.discovery.max_depth);
    println!("  Max links per page: {}", config.discovery.max_links_per_page);
    println!("  Batch size: {}", config.discovery.batch_size);
    println!("  Batch delay: {}ms", config.discovery.batch_delay_ms);
    println!(
        "  Request timeout: {}s",
        config.discovery.request_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
}

/// Runs the full audit: discovery, link analysis, summary output
async fn handle_audit(config: sitelens::Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting audit of {}", config.audit.domain);

    let result = match sitelens::discover_pages(&config, None).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Discovery failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Analyzing internal link graph");
    let report = analyze_links(&result.pages, &config.audit.domain);

    let summary = build_summary(
        &config.audit.domain,
        &result.pages,
        report,
        result.sitemap_url,
    );

    print_summary(&summary);

    write_markdown_summary(&summary, Path::new(&config.output.summary_path))?;
    println!("✓ Summary written to: {}", config.output.summary_path);

    Ok(())
}
