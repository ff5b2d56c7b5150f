//! Technical indicator library.
//!
//! Every indicator is a pure function over a numeric slice, plus a named
//! `Indicator` wrapper so a configured set can be computed over a
//! `PriceSeries` in one pass and stored in an `IndicatorSet`.
//!
//! Output is tail-aligned: an indicator with warm-up `w` returns
//! `len(input) - w` values and index 0 corresponds to input index `w`.
//! Too-short input yields an empty vector, never an error or NaN padding.
//!
//! Multi-series indicators (MACD, Bollinger, Stochastic) are exposed as
//! separate named instances per line, keeping the single-series trait.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod patterns;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use adx::{adx, Adx};
pub use atr::{atr, true_range, Atr};
pub use bollinger::{bollinger_bands, Bollinger, BollingerBand, BollingerBands};
pub use ema::{ema, Ema};
pub use macd::{macd, Macd, MacdLine, MacdOutput};
pub use patterns::{detect_patterns, Pattern};
pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};
pub use stochastic::{stochastic, Stochastic, StochasticLine, StochasticOutput};

use crate::domain::PriceSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trait for named indicators computed over a whole price series.
///
/// # Look-ahead guard
/// No output value may depend on input points after the one it is aligned to.
pub trait Indicator: Send + Sync {
    /// Name under which the output is stored (e.g. "rsi_14", "macd_signal").
    fn name(&self) -> &str;

    /// Number of leading input points without a corresponding output value.
    fn warmup(&self) -> usize;

    /// Compute the tail-aligned output series. Length is
    /// `series.len() - warmup()`, or 0 when the series is too short.
    fn compute(&self, series: &PriceSeries) -> Vec<f64>;
}

/// Named, tail-aligned indicator series derived from one price series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    series: BTreeMap<String, Vec<f64>>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute every indicator over `series`.
    pub fn compute(series: &PriceSeries, indicators: &[Box<dyn Indicator>]) -> Self {
        let mut set = Self::new();
        for indicator in indicators {
            set.insert(indicator.name(), indicator.compute(series));
        }
        set
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Get the full series for a named indicator.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// Most recent value of a named indicator, if it produced any output.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.series.get(name).and_then(|v| v.last().copied())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }

    /// Number of indicator series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Series with the given closes on consecutive days starting 2024-01-02.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> PriceSeries {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    PriceSeries::from_closes("TEST", start, closes).unwrap()
}
