//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), defined
//! from the second point on.
//! ATR = SMA(true_range, period).
//! Warm-up: period.

use super::sma::sma;
use super::Indicator;
use crate::domain::PriceSeries;

/// True range series; entry i corresponds to input point i + 1.
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    (1..n)
        .map(|i| {
            let (h, l, pc) = (highs[i], lows[i], closes[i - 1]);
            (h - l).max((h - pc).abs()).max((l - pc).abs())
        })
        .collect()
}

/// ATR over `period` true ranges. Empty when `len <= period`.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    sma(&true_range(highs, lows, closes), period)
}

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        atr(&series.highs(), &series.lows(), &series.closes(), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};

    #[test]
    fn true_range_uses_gap_from_previous_close() {
        // Gap up: prev close 10, bar 12..13 → TR = 13 - 10 = 3
        let tr = true_range(&[11.0, 13.0], &[9.0, 12.0], &[10.0, 12.5]);
        assert_eq!(tr.len(), 1);
        assert_approx(tr[0], 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_inside_bar_is_high_minus_low() {
        let tr = true_range(&[11.0, 10.8], &[9.0, 9.6], &[10.0, 10.2]);
        assert_approx(tr[0], 1.2, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_is_mean_of_true_ranges() {
        let highs = [11.0, 12.0, 13.0, 14.0];
        let lows = [9.0, 10.0, 11.0, 12.0];
        let closes = [10.0, 11.0, 12.0, 13.0];
        // TR each step = 2
        let out = atr(&highs, &lows, &closes, 2);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|&v| (v - 2.0).abs() < DEFAULT_EPSILON));
    }

    #[test]
    fn atr_insufficient_data() {
        assert!(atr(&[1.0, 2.0], &[0.5, 1.5], &[0.8, 1.8], 2).is_empty());
    }

    #[test]
    fn atr_indicator_length() {
        let series = make_series(&[10.0; 20]);
        let ind = Atr::new(14);
        assert_eq!(ind.compute(&series).len(), 6);
    }
}
