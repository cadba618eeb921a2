//! Cutoff Tracker CLI
//!
//! - `chart`: draw the cutoff chart for one event/gender
//! - `series`: print the cutoff series
//! - `watch`: redraw the chart on an interval
//! - `collect`: scrape today's qualifying list into a snapshot

use clap::{Args, Parser, Subcommand, ValueHint};
use cutoff_tracker::codec::format_time;
use cutoff_tracker::config::LogFormat;
use cutoff_tracker::services::{Collector, Watcher};
use cutoff_tracker::{AppConfig, AppResult, AppState};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track the 16th-place qualifying cutoff over time", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw the cutoff chart (.svg or .json output)
    Chart(ChartArgs),
    /// Print the date-ordered cutoff series
    Series(SeriesArgs),
    /// Redraw the chart periodically until interrupted
    Watch(WatchArgs),
    /// Scrape today's qualifying list into the data directory
    Collect(CollectArgs),
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Event name as it appears in the list title, e.g. "Mile"
    #[arg(short, long)]
    event: String,

    /// Gender as it appears in the list title, e.g. "Men"
    #[arg(short, long)]
    gender: String,
}

#[derive(Args, Debug)]
struct ChartArgs {
    #[command(flatten)]
    query: QueryArgs,

    /// Output path (defaults to CHART_OUTPUT)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SeriesArgs {
    #[command(flatten)]
    query: QueryArgs,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct WatchArgs {
    #[command(flatten)]
    query: QueryArgs,

    /// Output path (defaults to CHART_OUTPUT)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Seconds between refreshes
    #[arg(long, default_value_t = 3600)]
    interval_secs: u64,
}

#[derive(Args, Debug)]
struct CollectArgs {
    /// Qualifying list URL (defaults to COLLECT_URL)
    #[arg(long)]
    url: Option<String>,

    /// Directory receiving the snapshot and dates.json
    #[arg(long, value_hint = ValueHint::DirPath)]
    data_dir: Option<PathBuf>,
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("cutoff_tracker={},reqwest=warn", config.log_level).into()
    });

    // stdout is reserved for command output
    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

async fn run(cli: Cli, config: AppConfig) -> AppResult<()> {
    match cli.command {
        Command::Chart(args) => {
            let state = AppState::from_config(config)?;
            let mut service = state.graph_service(args.output.as_deref())?;
            let handle = service.show(&args.query.event, &args.query.gender).await?;
            println!(
                "Wrote {} ({} points) to {}",
                handle.title(),
                handle.points(),
                handle.path().display()
            );
        }
        Command::Series(args) => {
            let state = AppState::from_config(config)?;
            let series = state
                .series_builder()
                .build(&args.query.event, &args.query.gender)
                .await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&series)?);
            } else {
                println!("{}", series.title());
                for point in series.points() {
                    println!("{}  {}", point.date, format_time(point.value.seconds()));
                }
            }
        }
        Command::Watch(args) => {
            let state = AppState::from_config(config)?;
            let service = state.graph_service(args.output.as_deref())?;
            let watcher = Watcher::new(service, args.query.event, args.query.gender)
                .with_refresh_interval(Duration::from_secs(args.interval_secs));

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, stopping watcher");
                }
                _ = watcher.start() => {
                    error!("Watcher exited unexpectedly");
                }
            }
        }
        Command::Collect(args) => {
            let mut collector = Collector::new(&config)?;
            if let Some(url) = args.url {
                collector = collector.with_url(url);
            }
            if let Some(dir) = args.data_dir {
                collector = collector.with_data_dir(dir);
            }

            let report = collector.collect().await?;
            println!(
                "Collected {} events ({} entries) for {} into {}{}",
                report.events,
                report.entries,
                report.date,
                report.snapshot_path.display(),
                if report.manifest_updated { "" } else { " (manifest already listed the date)" }
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables first
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    init_tracing(&config);

    if let Err(e) = run(cli, config).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
