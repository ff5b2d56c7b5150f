//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = EMA[t-1] + alpha * (x[t] - EMA[t-1]), alpha = 2/(period+1).
//! (Same blend as alpha * x + (1 - alpha) * EMA, but exact on flat input.)
//! Seed: SMA of the first `period` values, so the first EMA value equals the
//! first SMA value.
//! Warm-up: period - 1.

use super::Indicator;
use crate::domain::PriceSeries;

/// EMA of `values`. Empty when `len < period` or period is 0.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if period == 0 || n < period {
        return Vec::new();
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(n - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        let next = prev + alpha * (value - prev);
        result.push(next);
        prev = next;
    }

    result
}

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        ema(&series.closes(), self.period)
    }
}
