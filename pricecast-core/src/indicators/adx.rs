//! Simplified directional-strength proxy labelled "ADX".
//!
//! This is not Wilder's ADX. For each trailing window of `period + 1` highs:
//!
//!   trend      = (last - first) / first
//!   volatility = stddev(window) / mean(window)
//!   value      = clamp(|trend| / volatility * 100, 0, 100)
//!
//! A window with zero volatility yields 0. Consumers rely on the [0, 100]
//! range of this approximation, so it is kept as is.
//! Warm-up: period.

use super::Indicator;
use crate::domain::PriceSeries;
use crate::stats;

/// Trend-strength proxy over `highs`. Empty when `len <= period`.
pub fn adx(highs: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || highs.len() < period + 1 {
        return Vec::new();
    }

    highs
        .windows(period + 1)
        .map(|window| {
            let first = window[0];
            let last = window[period];
            let mean = stats::mean(window);
            let volatility = if mean > 0.0 {
                stats::std_dev(window) / mean
            } else {
                0.0
            };
            if first <= 0.0 || volatility == 0.0 {
                return 0.0;
            }
            let trend = (last - first) / first;
            (trend.abs() / volatility * 100.0).clamp(0.0, 100.0)
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    name: String,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            name: format!("adx_{period}"),
        }
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        adx(&series.highs(), self.period)
    }
}
