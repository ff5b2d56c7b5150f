//! Relative Strength Index (RSI).
//!
//! Per-step gains and losses averaged with a simple trailing window of
//! `period` changes: RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Warm-up: period (output length = len - period).
//! Edge case: avg_loss == 0 → RSI = 100, including a flat window.

use super::Indicator;
use crate::domain::PriceSeries;

/// RSI of `closes`. Empty when `len <= period` or period is 0.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    if period == 0 || n < period + 1 {
        return Vec::new();
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    changes
        .windows(period)
        .map(|window| {
            let mut gains = 0.0;
            let mut losses = 0.0;
            for &ch in window {
                if ch > 0.0 {
                    gains += ch;
                } else {
                    losses -= ch;
                }
            }
            compute_rsi(gains / period as f64, losses / period as f64)
        })
        .collect()
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        let value = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        value.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        rsi(&series.closes(), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn rsi_all_gains() {
        let result = rsi(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0], 3);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn rsi_all_losses() {
        let result = rsi(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0], 3);
        assert!(result.iter().all(|&v| v.abs() < 1e-9));
    }

    #[test]
    fn rsi_mixed() {
        // Changes: +0.34, -0.25, -0.48 → gains 0.34, losses 0.73
        // RSI = 100 - 100/(1 + 0.34/0.73)
        let result = rsi(&[44.0, 44.34, 44.09, 43.61], 3);
        assert_eq!(result.len(), 1);
        let expected = 100.0 - 100.0 / (1.0 + 0.34 / 0.73);
        assert_approx(result[0], expected, 1e-9);
    }

    #[test]
    fn rsi_flat_series_is_100() {
        let result = rsi(&[100.0; 30], 14);
        assert_eq!(result.len(), 16);
        assert!(result.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn rsi_bounds() {
        let result = rsi(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0], 3);
        for (i, &v) in result.iter().enumerate() {
            assert!((0.0..=100.0).contains(&v), "RSI out of bounds at {i}: {v}");
        }
    }

    #[test]
    fn rsi_needs_period_plus_one() {
        assert!(rsi(&[1.0, 2.0, 3.0], 3).is_empty());
        assert_eq!(rsi(&[1.0, 2.0, 3.0, 4.0], 3).len(), 1);
    }

    #[test]
    fn rsi_warmup() {
        assert_eq!(Rsi::new(14).warmup(), 14);
    }
}
