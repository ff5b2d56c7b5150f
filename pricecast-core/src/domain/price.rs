//! Price points and validated price series: the input boundary of the core.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a price series is rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("dates out of order at index {index}: {date} follows {previous}")]
    OutOfOrder {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("duplicate date {0}")]
    DuplicateDate(NaiveDate),

    #[error("non-positive {field} price on {date}: {value}")]
    NonPositivePrice {
        date: NaiveDate,
        field: &'static str,
        value: f64,
    },

    #[error("high {high} below low {low} on {date}")]
    InvalidRange { date: NaiveDate, high: f64, low: f64 },

    #[error("column lengths differ: {0}")]
    LengthMismatch(String),
}

/// One OHLCV observation for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    /// Returns true if all prices are finite and positive and high >= low.
    pub fn is_sane(&self) -> bool {
        self.check().is_ok()
    }

    fn check(&self) -> Result<(), SeriesError> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SeriesError::NonPositivePrice {
                    date: self.date,
                    field,
                    value,
                });
            }
        }
        if self.high < self.low {
            return Err(SeriesError::InvalidRange {
                date: self.date,
                high: self.high,
                low: self.low,
            });
        }
        Ok(())
    }
}

/// Chronologically ordered price points with unique dates.
///
/// The only way to build one is through a validating constructor, so every
/// function downstream can assume well-formed input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validate and wrap a list of points. An empty series is allowed.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for (i, point) in points.iter().enumerate() {
            point.check()?;
            if i > 0 {
                let previous = points[i - 1].date;
                if point.date == previous {
                    return Err(SeriesError::DuplicateDate(point.date));
                }
                if point.date < previous {
                    return Err(SeriesError::OutOfOrder {
                        index: i,
                        previous,
                        date: point.date,
                    });
                }
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    /// Build a series from parallel columns, rejecting mismatched lengths.
    pub fn from_columns(
        symbol: impl Into<String>,
        dates: &[NaiveDate],
        opens: &[f64],
        highs: &[f64],
        lows: &[f64],
        closes: &[f64],
        volumes: &[u64],
    ) -> Result<Self, SeriesError> {
        let n = dates.len();
        let lengths = [opens.len(), highs.len(), lows.len(), closes.len(), volumes.len()];
        if lengths.iter().any(|&len| len != n) {
            return Err(SeriesError::LengthMismatch(format!(
                "dates={n}, open={}, high={}, low={}, close={}, volume={}",
                lengths[0], lengths[1], lengths[2], lengths[3], lengths[4]
            )));
        }
        let points = (0..n)
            .map(|i| PricePoint {
                date: dates[i],
                open: opens[i],
                high: highs[i],
                low: lows[i],
                close: closes[i],
                volume: volumes[i],
            })
            .collect();
        Self::new(symbol, points)
    }

    /// Build a series from closes on consecutive calendar days.
    ///
    /// open = previous close (or close for the first point),
    /// high/low = max/min(open, close) ± 0.5%, volume = 1000.
    pub fn from_closes(
        symbol: impl Into<String>,
        start: NaiveDate,
        closes: &[f64],
    ) -> Result<Self, SeriesError> {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                PricePoint {
                    date: start + Duration::days(i as i64),
                    open,
                    high: open.max(close) * 1.005,
                    low: open.min(close) * 0.995,
                    close,
                    volume: 1000,
                }
            })
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.low).collect()
    }

    pub fn volumes(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.volume).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn point(d: u32, close: f64) -> PricePoint {
        PricePoint {
            date: day(d),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10_000,
        }
    }

    #[test]
    fn accepts_ordered_series() {
        let series = PriceSeries::new("SPY", vec![point(2, 100.0), point(3, 101.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![100.0, 101.0]);
        assert_eq!(series.last_date(), Some(day(3)));
    }

    #[test]
    fn empty_series_is_allowed() {
        let series = PriceSeries::new("SPY", Vec::new()).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.last_date(), None);
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let err = PriceSeries::new("SPY", vec![point(3, 100.0), point(2, 101.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::OutOfOrder { index: 1, .. }));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceSeries::new("SPY", vec![point(2, 100.0), point(2, 101.0)]).unwrap_err();
        assert_eq!(err, SeriesError::DuplicateDate(day(2)));
    }

    #[test]
    fn rejects_non_positive_close() {
        let mut bad = point(2, 100.0);
        bad.close = 0.0;
        let err = PriceSeries::new("SPY", vec![bad]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::NonPositivePrice { field: "close", .. }
        ));
    }

    #[test]
    fn rejects_high_below_low() {
        let mut bad = point(2, 100.0);
        bad.high = 90.0;
        bad.low = 95.0;
        assert!(!bad.is_sane());
        let err = PriceSeries::new("SPY", vec![bad]).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidRange { .. }));
    }

    #[test]
    fn rejects_mismatched_columns() {
        let err = PriceSeries::from_columns(
            "SPY",
            &[day(2), day(3)],
            &[1.0, 2.0],
            &[1.0, 2.0],
            &[1.0],
            &[1.0, 2.0],
            &[1, 2],
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::LengthMismatch(_)));
    }

    #[test]
    fn from_closes_builds_consecutive_days() {
        let series = PriceSeries::from_closes("TEST", day(1), &[10.0, 11.0, 12.0]).unwrap();
        assert_eq!(series.dates(), vec![day(1), day(2), day(3)]);
        assert!(series.points().iter().all(PricePoint::is_sane));
    }

    #[test]
    fn price_point_serialization_roundtrip() {
        let p = point(2, 100.0);
        let json = serde_json::to_string(&p).unwrap();
        let back: PricePoint = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
