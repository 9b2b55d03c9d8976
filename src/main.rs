//! Favicon Collector main entry point
//!
//! This is the command-line interface for the favicon collector.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use favicon_collector::config::{load_config, validate, Config};
use favicon_collector::crawler::{collect, preview, RunPreview};
use favicon_collector::registry::{DedupRegistry, RegistryStats};
use favicon_collector::source::{open_source, ItemFilter, SqliteSource};
use favicon_collector::storage::FsIconStore;
use favicon_collector::{CollectorError, ConfigError};
use std::fmt::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Favicon Collector: fetch one favicon per story domain
///
/// Reads story URLs from a Hacker News SQLite database, reduces them to one
/// domain each, and stores `<domain>.ico` for every domain not captured yet.
#[derive(Parser, Debug)]
#[command(name = "favicon-collector")]
#[command(version)]
#[command(about = "Scrapes favicons for domains linked from Hacker News stories", long_about = None)]
struct Cli {
    /// Level of logs to print
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    log: LogLevel,

    /// Input SQLite database
    #[arg(long, value_name = "PATH")]
    inputdb: Option<PathBuf>,

    /// Output storage directory
    #[arg(long, value_name = "DIR")]
    outputdir: Option<PathBuf>,

    /// Maximum entries to parse
    #[arg(long)]
    limit: Option<u64>,

    /// Minimum required score for items
    #[arg(long, allow_negative_numbers = true)]
    minscore: Option<i64>,

    /// Domains submitted between full waits (0 = no batching)
    #[arg(long)]
    batch: Option<usize>,

    /// Parallel requests
    #[arg(long)]
    parallel: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Optional TOML configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show which domains would be fetched or skipped, without fetching
    #[arg(long)]
    dry_run: bool,
}

/// Log levels accepted by `--log`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Panic,
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// tracing has no levels above error
    fn directive(self) -> &'static str {
        match self {
            Self::Panic | Self::Fatal | Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.log);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<CollectorError>()
                .map(CollectorError::exit_code)
                .unwrap_or(1);
            tracing::error!("{:#}", e);
            ExitCode::from(code)
        }
    }
}

/// Sets up the logging/tracing subscriber for the selected level
fn setup_logging(level: LogLevel) {
    let filter = EnvFilter::new(format!("favicon_collector={},warn", level.directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = build_config(&cli)?;

    let database_path = config
        .source
        .database_path
        .clone()
        .ok_or(CollectorError::Config(ConfigError::MissingInput))?;

    tracing::info!("Opening input database: {}", database_path.display());
    let source = open_source(&database_path).map_err(CollectorError::from)?;

    if cli.dry_run {
        return handle_dry_run(&config, &source);
    }

    let report = collect(&config, &source).await?;
    tracing::info!("Run took {}s", report.duration_seconds());
    Ok(())
}

/// Merges defaults, the optional config file, and command-line flags
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .map_err(CollectorError::from)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(path) = &cli.inputdb {
        config.source.database_path = Some(path.clone());
    }
    if let Some(limit) = cli.limit {
        config.source.limit = Some(limit);
    }
    if let Some(min_score) = cli.minscore {
        config.source.min_score = min_score;
    }
    if let Some(dir) = &cli.outputdir {
        config.fetch.output_dir = dir.clone();
    }
    if let Some(batch) = cli.batch {
        config.fetch.batch_size = batch;
    }
    if let Some(parallel) = cli.parallel {
        config.fetch.parallelism = parallel;
    }
    if let Some(timeout) = cli.timeout {
        config.fetch.request_timeout = timeout;
    }

    validate(&config).map_err(CollectorError::from)?;
    Ok(config)
}

/// Handles the --dry-run mode: builds the registry and lists planned fetches
fn handle_dry_run(config: &Config, source: &SqliteSource) -> anyhow::Result<()> {
    let filter = ItemFilter {
        min_score: config.source.min_score,
        limit: config.source.limit,
    };
    let registry = DedupRegistry::from_source(source, &filter).map_err(CollectorError::from)?;
    let store = FsIconStore::new(&config.fetch.output_dir);
    let plan = preview(&registry, &store);

    print!("{}", render_dry_run(config, &registry.stats(), &plan));
    Ok(())
}

fn render_dry_run(config: &Config, stats: &RegistryStats, plan: &RunPreview) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Favicon Collector Dry Run ===\n");
    let _ = writeln!(
        out,
        "Rows scanned: {} ({} without a usable domain)",
        stats.rows, stats.invalid
    );
    let _ = writeln!(
        out,
        "Valid domains: {} (excluding {} duplicate)",
        stats.entries, stats.duplicates
    );
    let _ = writeln!(out, "Output directory: {}", config.fetch.output_dir.display());
    let _ = writeln!(
        out,
        "Parallel requests: {}, batch size: {}",
        config.fetch.parallelism, config.fetch.batch_size
    );

    let _ = writeln!(out, "\nWould fetch ({}):", plan.planned.len());
    for (domain, url) in &plan.planned {
        let _ = writeln!(out, "  - {} ({})", domain, url);
    }

    let _ = writeln!(out, "\nAlready present ({}):", plan.skipped.len());
    for domain in &plan.skipped {
        let _ = writeln!(out, "  - {}", domain);
    }

    if !plan.unreadable.is_empty() {
        let _ = writeln!(out, "\nCould not check ({}):", plan.unreadable.len());
        for domain in &plan.unreadable {
            let _ = writeln!(out, "  - {}", domain);
        }
    }

    out
}
