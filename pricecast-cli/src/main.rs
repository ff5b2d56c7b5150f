//! Pricecast CLI: forecast, validation and inspection commands.
//!
//! Commands:
//! - `forecast`: run the engine on a CSV file or a synthetic series, print the report
//! - `validate`: score a saved report against realized prices
//! - `indicators`: print the feature bundle for a series
//! - `models`: list registered model descriptors
//!
//! All results are JSON on stdout. Logs go to stderr (`RUST_LOG` overrides `info`).

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use pricecast_core::domain::PriceSeries;
use pricecast_core::registry::{ModelComparison, ModelRegistry};
use pricecast_core::validation::ValidationResult;
use pricecast_runner::{
    load_csv, load_realized, synthetic_series, EngineConfig, ForecastEngine, ForecastReport,
};

#[derive(Parser)]
#[command(name = "pricecast", about = "Pricecast CLI: indicator and ensemble price forecasting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the price history comes from.
#[derive(Args)]
struct SourceArgs {
    /// Instrument symbol.
    #[arg(long)]
    symbol: String,

    /// CSV file with a `date,open,high,low,close,volume` header.
    #[arg(long, conflicts_with = "synthetic")]
    csv: Option<PathBuf>,

    /// Use a deterministic synthetic series instead of a file.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Synthetic start date (YYYY-MM-DD). Defaults to one year before --end.
    #[arg(long)]
    start: Option<String>,

    /// Synthetic end date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<String>,

    /// Engine config TOML. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast future prices with the model ensemble.
    Forecast {
        #[command(flatten)]
        source: SourceArgs,

        /// Horizon in days (overrides the config).
        #[arg(long)]
        horizon: Option<usize>,

        /// Master seed (overrides the config).
        #[arg(long)]
        seed: Option<u64>,

        /// Evaluate models sequentially.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Also write the report JSON to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate a saved forecast report against realized prices.
    Validate {
        /// Report JSON written by `forecast --output`.
        #[arg(long)]
        report: PathBuf,

        /// CSV of realized prices (close per date).
        #[arg(long)]
        realized: PathBuf,

        /// Include declared-vs-observed comparison for every model.
        #[arg(long, default_value_t = false)]
        compare: bool,
    },
    /// Print features and indicator series for a price history.
    Indicators {
        #[command(flatten)]
        source: SourceArgs,

        /// Only print the latest value of each indicator.
        #[arg(long, default_value_t = false)]
        latest: bool,
    },
    /// List registered model descriptors.
    Models,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Forecast {
            source,
            horizon,
            seed,
            sequential,
            output,
        } => run_forecast(&source, horizon, seed, sequential, output.as_deref()),
        Commands::Validate {
            report,
            realized,
            compare,
        } => run_validate(&report, &realized, compare),
        Commands::Indicators { source, latest } => run_indicators(&source, latest),
        Commands::Models => print_json(&ModelRegistry::with_defaults().iter().collect::<Vec<_>>()),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::from_file(path)?),
        None => Ok(EngineConfig::default()),
    }
}

fn load_series(source: &SourceArgs) -> Result<PriceSeries> {
    if let Some(path) = &source.csv {
        return Ok(load_csv(&source.symbol, path)?);
    }
    if !source.synthetic {
        bail!("one of --csv or --synthetic is required");
    }

    let end = source
        .end
        .as_deref()
        .map(parse_date)
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let start = source
        .start
        .as_deref()
        .map(parse_date)
        .transpose()?
        .unwrap_or_else(|| end - chrono::Duration::days(365));
    if start > end {
        bail!("--start {start} is after --end {end}");
    }

    Ok(synthetic_series(&source.symbol, start, end))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_forecast(
    source: &SourceArgs,
    horizon: Option<usize>,
    seed: Option<u64>,
    sequential: bool,
    output: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(source.config.as_deref())?;
    if let Some(horizon) = horizon {
        config.horizon_days = horizon;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if sequential {
        config.parallel = false;
    }

    let series = load_series(source)?;
    if series.is_empty() {
        bail!("no price history for {}", source.symbol);
    }

    let engine = ForecastEngine::new(config)?;
    let report = engine.forecast(&series);
    tracing::info!(
        symbol = %report.symbol,
        points = report.ensemble.len(),
        regime = %report.regime,
        fallback = report.fallback_used,
        "forecast complete"
    );

    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "report saved");
    }

    print_json(&report)
}

#[derive(Serialize)]
struct ValidationOutput {
    validation: ValidationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<Vec<ModelComparison>>,
}

fn run_validate(report_path: &Path, realized_path: &Path, compare: bool) -> Result<()> {
    let text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report {}", report_path.display()))?;
    let report: ForecastReport = serde_json::from_str(&text).context("parse report JSON")?;
    let realized = load_realized(realized_path)?;

    let engine = ForecastEngine::new(EngineConfig::default())?;
    let validation = engine.validate(&report.symbol, &report.ensemble, &realized);
    if validation.validated_count() == 0 {
        tracing::warn!(symbol = %report.symbol, "no realized price matches any forecast date");
    }

    let comparison = compare.then(|| engine.compare(&report, &realized));
    print_json(&ValidationOutput {
        validation,
        comparison,
    })
}

#[derive(Serialize)]
struct IndicatorOutput<'a> {
    symbol: &'a str,
    points: usize,
    regime: String,
    volatility: f64,
    momentum: f64,
    patterns: Vec<&'static str>,
    latest_rsi: Option<f64>,
    latest_macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest: Option<std::collections::BTreeMap<&'a str, Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indicators: Option<&'a pricecast_core::indicators::IndicatorSet>,
}

fn run_indicators(source: &SourceArgs, latest_only: bool) -> Result<()> {
    let config = load_config(source.config.as_deref())?;
    let series = load_series(source)?;
    let engine = ForecastEngine::new(config)?;
    let bundle = engine.extract(&series);

    let latest = latest_only.then(|| {
        bundle
            .indicators
            .names()
            .map(|name| (name, bundle.indicators.latest(name)))
            .collect()
    });

    print_json(&IndicatorOutput {
        symbol: &bundle.symbol,
        points: bundle.len(),
        regime: bundle.regime.to_string(),
        volatility: bundle.volatility,
        momentum: bundle.momentum,
        patterns: bundle.patterns.iter().map(|p| p.label()).collect(),
        latest_rsi: bundle.latest_rsi,
        latest_macd: bundle.latest_macd,
        latest,
        indicators: (!latest_only).then_some(&bundle.indicators),
    })
}
