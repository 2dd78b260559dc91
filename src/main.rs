use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use idcheck::{render, AppConfig, FindingLog, HostView, LogFormat, OutputFormat, TreeSource};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use view_checker::{IdentifierChecker, Scheduler, TokioScheduler};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_DATE"),
    ")"
);

/// idcheck - report views that are missing accessibility identifiers
#[derive(Parser)]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path (json, yaml or toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level, overriding the configuration
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Log format, overriding the configuration
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a tree file once and print the findings
    Scan(ScanArgs),

    /// Re-check a tree file periodically, picking up edits to it
    Watch(WatchArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Tree file (.json, .yaml or .yml)
    #[arg(value_name = "TREE")]
    tree: PathBuf,

    /// Additional class that must carry an identifier (repeatable)
    #[arg(long = "custom-class", value_name = "CLASS")]
    custom_classes: Vec<String>,

    /// Findings output format
    #[arg(short, long, value_enum, default_value = "human")]
    output: OutputFormat,
}

#[derive(Args)]
struct ScanArgs {
    #[command(flatten)]
    check: CheckArgs,
}

#[derive(Args)]
struct WatchArgs {
    #[command(flatten)]
    check: CheckArgs,

    /// Delay between passes, e.g. `5s` or `500ms`
    #[arg(short, long)]
    interval: Option<String>,

    /// Stop after this long instead of waiting for Ctrl-C
    #[arg(long, value_parser = humantime::parse_duration)]
    duration: Option<Duration>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}

/// Returns `Ok(true)` when no view was reported.
async fn run(cli: Cli) -> Result<bool> {
    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logging(&config.log_level, config.log_format, cli.debug)?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Scan(args) => cmd_scan(args, config).await,
        Commands::Watch(args) => cmd_watch(args, config).await,
    }
}

fn init_logging(level: &str, format: LogFormat, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));
    let (human, json) = match format {
        LogFormat::Human => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(human)
        .with(json)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

fn build_checker(
    config: &AppConfig,
    args: &CheckArgs,
    findings: &FindingLog,
) -> Result<Arc<IdentifierChecker<HostView>>> {
    let mut config = config.clone();
    config.custom_classes.extend(args.custom_classes.iter().cloned());
    let checker_config = config.checker_config()?;

    let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler::current()?);
    let checker = IdentifierChecker::builder(checker_config)
        .root_provider(TreeSource::new(&args.tree))
        .report_sink(findings.clone())
        .scheduler(scheduler)
        .build()?;
    Ok(checker)
}

async fn cmd_scan(args: ScanArgs, config: AppConfig) -> Result<bool> {
    let args = args.check;
    // Surface load errors; the root provider only logs them.
    idcheck::load_tree(&args.tree)?;

    let findings = FindingLog::new();
    let checker = build_checker(&config, &args, &findings)?;
    let summary = checker.check_now();
    info!(
        tree = %args.tree.display(),
        visited = summary.visited,
        reported = summary.reported,
        "scan complete"
    );

    print!("{}", render(&findings.snapshot(), args.output)?);
    Ok(findings.is_empty())
}

async fn cmd_watch(args: WatchArgs, mut config: AppConfig) -> Result<bool> {
    if let Some(interval) = args.interval {
        config.interval = interval;
    }
    let findings = FindingLog::new();
    let checker = build_checker(&config, &args.check, &findings)?;

    checker.start();
    info!(
        tree = %args.check.tree.display(),
        interval = %humantime::format_duration(checker.interval()),
        "watching; press Ctrl-C to stop"
    );

    match args.duration {
        Some(limit) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("interrupted"),
                _ = tokio::time::sleep(limit) => debug!("watch duration elapsed"),
            }
        }
        None => {
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;
            info!("interrupted");
        }
    }
    checker.stop();

    let stats = checker.stats();
    info!(
        passes = stats.passes,
        empty_passes = stats.empty_passes,
        reported = stats.reported,
        seen = stats.seen_entries,
        "watch finished"
    );

    print!("{}", render(&findings.snapshot(), args.check.output)?);
    Ok(findings.is_empty())
}
