//! Price loading for the engine.
//!
//! Two sources:
//! 1. CSV files with a `date,open,high,low,close,volume` header row
//! 2. Synthetic series (random walk seeded from the symbol name) for offline demos
//!
//! Synthetic data is clearly fake. Loading it logs a warning.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

use pricecast_core::domain::{PricePoint, PriceSeries, SeriesError};
use pricecast_core::validation::RealizedPrices;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse CSV row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("no price rows in '{0}'")]
    Empty(String),

    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),
}

/// One CSV row. Column names may be lowercase or Capitalised (`close` or `Close`).
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: u64,
}

impl From<CsvRow> for PricePoint {
    fn from(row: CsvRow) -> Self {
        PricePoint {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| LoadError::Open {
            path: path.display().to_string(),
            source,
        })
}

fn read_points<R: Read>(reader: R) -> Result<Vec<PricePoint>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(i, row)| {
            row.map(PricePoint::from)
                .map_err(|source| LoadError::Csv { row: i + 1, source })
        })
        .collect()
}

/// Parse a validated series from CSV text.
pub fn parse_csv<R: Read>(symbol: &str, reader: R) -> Result<PriceSeries, LoadError> {
    let points = read_points(reader)?;
    if points.is_empty() {
        return Err(LoadError::Empty(symbol.to_string()));
    }
    Ok(PriceSeries::new(symbol, points)?)
}

/// Load a validated series from a CSV file.
pub fn load_csv(symbol: &str, path: &Path) -> Result<PriceSeries, LoadError> {
    let points = read_points(open(path)?)?;
    if points.is_empty() {
        return Err(LoadError::Empty(path.display().to_string()));
    }
    let series = PriceSeries::new(symbol, points)?;
    tracing::debug!(symbol, points = series.len(), path = %path.display(), "loaded CSV series");
    Ok(series)
}

/// Load realized closes keyed by date from a CSV file in the same format.
///
/// Rows are not required to be ordered; a later row for the same date wins.
pub fn load_realized(path: &Path) -> Result<RealizedPrices, LoadError> {
    let points = read_points(open(path)?)?;
    Ok(points.into_iter().map(|p| (p.date, p.close)).collect())
}

/// Deterministic synthetic series for `symbol` over `[start, end]`, weekdays only.
///
/// Random walk from 100.0 with daily returns in ±3%, seeded from the
/// BLAKE3 hash of the symbol so the same symbol always yields the same series.
pub fn synthetic_series(symbol: &str, start: NaiveDate, end: NaiveDate) -> PriceSeries {
    tracing::warn!(symbol, %start, %end, "generating synthetic price data");

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut points = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        points.push(PricePoint {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += Duration::days(1);
    }

    // Strictly increasing dates and positive prices by construction.
    PriceSeries::new(symbol, points).unwrap_or_else(|_| PriceSeries::empty(symbol))
}
