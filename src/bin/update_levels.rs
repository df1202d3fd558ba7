//! GEX level updater
//!
//! Fetches a snapshot per configured index ticker, extracts ranked levels
//! and writes one CSV per futures symbol. Exits non-zero when no ticker
//! produced levels.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gex_levels::data::writer::format_timestamp;
use gex_levels::prelude::*;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "update_levels", version, about = "Write GEX levels for futures charts")]
struct Args {
    /// TOML settings file (defaults built in when omitted)
    #[arg(short, long, env = "GEX_LEVELS_CONFIG")]
    config: Option<PathBuf>,

    /// Keep index prices instead of converting to futures units
    #[arg(long)]
    raw: bool,

    /// Write dated OHLC history rows instead of the level table
    #[arg(long)]
    history: bool,

    /// Override the output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Override the aggregation period ("full", "zero", "one")
    #[arg(short, long)]
    aggregation: Option<String>,

    /// Only process these index tickers (repeatable)
    #[arg(short, long = "ticker")]
    tickers: Vec<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gex_levels=info,update_levels=info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_format);

    match run(args) {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(report) => {
            tracing::error!("No ticker produced levels: {}", report.failure_summary());
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<RunReport> {
    let started = Utc::now();
    tracing::info!("Starting GEX level update - {}", format_timestamp(started));

    let mut settings =
        Settings::load_or_default(args.config.as_deref()).context("Failed to load settings")?;
    if let Some(dir) = args.output_dir {
        settings.output.dir = dir;
    }
    if let Some(aggregation) = args.aggregation {
        settings.api.aggregation = aggregation;
    }

    let api_key = api_key_from_env()
        .with_context(|| format!("{} is not set", gex_levels::data::API_KEY_ENV))?;
    let client = GexBotClient::new(api_key, &settings.api.base_url, settings.api.timeout())?;

    std::fs::create_dir_all(&settings.output.dir)
        .with_context(|| format!("Failed to create {:?}", settings.output.dir))?;

    let tickers: Vec<String> = if args.tickers.is_empty() {
        settings.tickers.keys().cloned().collect()
    } else {
        args.tickers.iter().map(|t| t.to_uppercase()).collect()
    };

    let engine = LevelEngine::with_config(settings.levels.clone());
    let mut report = RunReport::new();

    for ticker in &tickers {
        let mapping = match settings.require_mapping(ticker) {
            Ok(mapping) => mapping,
            Err(e) => {
                report.record(ticker.clone(), Err(e));
                continue;
            }
        };
        tracing::info!("Processing {} -> {}", ticker, mapping.target);

        let result = client
            .fetch_snapshot(ticker, &settings.api.aggregation)
            .and_then(|snapshot| {
                tracing::info!(
                    "Spot: {} | Min DTE: {}",
                    snapshot.spot.unwrap_or(0.0),
                    snapshot.min_dte.unwrap_or(0.0)
                );
                engine.run_ticker(ticker, Some(mapping), &snapshot, args.raw)
            })
            .and_then(|levels| {
                let path = settings.output.levels_path(&levels.target);
                if args.history {
                    let rows = engine.history(levels.levels(), started.date_naive())?;
                    save_history(&path, &rows)?;
                } else {
                    save_levels(&path, levels.levels())?;
                }
                Ok(levels)
            });

        report.record(ticker.clone(), result);
    }

    save_timestamp(settings.output.timestamp_path(), started)?;

    tracing::info!("Done - {}/{} succeeded", report.success_count(), tickers.len());
    Ok(report)
}
