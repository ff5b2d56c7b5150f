//! Simple Moving Average (SMA).
//!
//! Rolling mean over a trailing window.
//! Warm-up: period - 1 (output length = len - period + 1).

use super::Indicator;
use crate::domain::PriceSeries;

/// Rolling mean of `values` over `period`. Empty when `len < period` or period is 0.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if period == 0 || n < period {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(n - period + 1);
    let mut sum: f64 = values[..period].iter().sum();
    result.push(sum / period as f64);

    // Roll the window forward
    for i in period..n {
        sum += values[i] - values[i - period];
        result.push(sum / period as f64);
    }

    result
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        sma(&series.closes(), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};

    #[test]
    fn sma_5_first_value_is_window_mean() {
        let result = sma(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], 5);
        assert_eq!(result.len(), 4);
        assert_approx(result[0], 3.0, DEFAULT_EPSILON);
        assert_approx(result[1], 4.0, DEFAULT_EPSILON);
        assert_approx(result[3], 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_identity() {
        let result = sma(&[100.0, 200.0, 300.0], 1);
        assert_eq!(result, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn sma_too_few_values() {
        assert!(sma(&[10.0, 11.0], 5).is_empty());
        assert!(sma(&[10.0, 11.0], 0).is_empty());
    }

    #[test]
    fn sma_exact_length_gives_single_value() {
        let result = sma(&[2.0, 4.0, 6.0], 3);
        assert_eq!(result.len(), 1);
        assert_approx(result[0], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_indicator_uses_closes() {
        let series = make_series(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let ind = Sma::new(5);
        assert_eq!(ind.name(), "sma_5");
        assert_eq!(ind.warmup(), 4);
        let out = ind.compute(&series);
        assert_eq!(out.len(), series.len() - ind.warmup());
        assert_approx(out[0], 12.0, DEFAULT_EPSILON);
    }
}
