//! pagebuster main entry point
//!
//! Command-line interface that aggregates a paginated listing and applies
//! faceted filters to it, writing the resulting HTML.

use anyhow::Context;
use clap::Parser;
use pagebuster::config::{load_config_with_hash, validate, Config, FilterMode};
use pagebuster::pager::{build_http_client, HttpPageSource, PageSource};
use pagebuster::storage::{open_storage, KeyValueStore, MemoryStore};
use pagebuster::{Document, FilterEngine, Pager};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

/// pagebuster: paginated listing aggregation and faceted filtering
///
/// Fetches a listing page, pulls every subsequent page into it, restores
/// and applies filter selections, and writes the filtered document.
#[derive(Parser, Debug)]
#[command(name = "pagebuster")]
#[command(version)]
#[command(about = "Aggregate a paginated listing and filter it", long_about = None)]
struct Cli {
    /// URL of the first listing page
    #[arg(value_name = "URL")]
    url: Url,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Select a facet value (OR within the facet), e.g. --select color=red
    #[arg(long = "select", value_name = "NAME=VALUE", value_parser = parse_facet)]
    selections: Vec<(String, String)>,

    /// Select a facet value on AND-marked inputs
    #[arg(long = "and", value_name = "NAME=VALUE", value_parser = parse_facet)]
    and_selections: Vec<(String, String)>,

    /// Uncheck every filter input (including restored ones) before selecting
    #[arg(long)]
    clear: bool,

    /// Query the remote endpoint instead of filtering locally
    #[arg(long)]
    remote: bool,

    /// Remote query endpoint, overriding the configuration
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Keep filter state in memory only
    #[arg(long)]
    no_persist: bool,

    /// Write the resulting HTML here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate config and show what would run without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Parses a `name=value` facet selection
fn parse_facet(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if cli.remote {
        config.filter.mode = FilterMode::Remote;
    }
    if let Some(endpoint) = &cli.endpoint {
        config.remote.endpoint = Some(endpoint.clone());
    }
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        print_dry_run(&cli, &config);
        return Ok(());
    }

    let client = build_http_client(&config.http).context("Failed to build HTTP client")?;
    let source = HttpPageSource::new(client.clone());

    tracing::info!("Fetching {}", cli.url);
    let body = source.fetch(&cli.url).await?;
    let mut doc = Document::parse_with_url(&body, cli.url.clone());

    let pager = Pager::new(source, &config.pager)?;
    let pager_report = pager.run(&mut doc).await.context("Pagination failed")?;
    tracing::info!(
        "Collected {} item(s), {} extra page(s) fetched",
        pager_report.items_collected,
        pager_report.pages_fetched
    );

    let store: Box<dyn KeyValueStore> = if cli.no_persist {
        Box::new(MemoryStore::new())
    } else {
        let path = Path::new(&config.storage.database_path);
        Box::new(open_storage(path).with_context(|| {
            format!("Failed to open filter storage {}", path.display())
        })?)
    };

    let mut engine = FilterEngine::from_config(&config, client, store)?;
    engine.init(&mut doc);

    if cli.clear {
        engine.clear_filters(&mut doc).await;
    }

    let requested = cli
        .selections
        .iter()
        .map(|facet| (facet, false))
        .chain(cli.and_selections.iter().map(|facet| (facet, true)));
    for ((name, value), all) in requested {
        if engine.select_facet(&mut doc, name, value, all) == 0 {
            tracing::warn!("No unchecked input found for {}={}", name, value);
        }
    }

    let report = engine.filter(&mut doc).await;
    tracing::info!("Filter result: {:?}", report);

    let html = doc.to_html();
    match &cli.output {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", html),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that stdout carries only the document.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagebuster=info,warn"),
            1 => EnvFilter::new("pagebuster=debug,info"),
            2 => EnvFilter::new("pagebuster=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: shows the effective settings
fn print_dry_run(cli: &Cli, config: &Config) {
    println!("=== pagebuster dry run ===\n");
    println!("Listing: {}", cli.url);

    println!("\nPager:");
    println!("  Item selector: {}", config.pager.item_selector);
    println!("  Next page selector: {}", config.pager.next_page_selector);
    println!("  Chunk size: {}", config.pager.chunk_size);
    match config.pager.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unbounded"),
    }

    println!("\nFilter:");
    println!("  Mode: {:?}", config.filter.mode);
    if let Some(endpoint) = &config.remote.endpoint {
        println!("  Endpoint: {}", endpoint);
    }
    println!("  Storage key: {}", config.filter.storage_key);
    if cli.no_persist {
        println!("  Storage: memory");
    } else {
        println!("  Storage: {}", config.storage.database_path);
    }

    for (name, value) in &cli.selections {
        println!("  Select: {}={}", name, value);
    }
    for (name, value) in &cli.and_selections {
        println!("  Select (AND): {}={}", name, value);
    }
    if cli.clear {
        println!("  Clearing stored selections first");
    }

    println!("\n✓ Configuration is valid");
}
