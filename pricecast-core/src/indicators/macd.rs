//! Moving Average Convergence Divergence (MACD).
//!
//! line      = EMA(fast) - EMA(slow), aligned on their overlapping tail
//! signal    = EMA(line, signal_period)
//! histogram = line (aligned to signal) - signal
//!
//! Warm-up: slow - 1 for the line, slow + signal - 2 for signal/histogram.

use super::ema::ema;
use super::Indicator;
use crate::domain::PriceSeries;
use serde::{Deserialize, Serialize};

/// The three MACD series. `signal` and `histogram` have equal length and
/// align with the tail of `line`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD of `closes`. All three series are empty when the slow EMA has no output.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdOutput {
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);
    if fast_ema.is_empty() || slow_ema.is_empty() {
        return MacdOutput::default();
    }

    // Start the longer EMA at the offset where it overlaps the shorter one.
    let overlap = fast_ema.len().min(slow_ema.len());
    let fast_tail = &fast_ema[fast_ema.len() - overlap..];
    let slow_tail = &slow_ema[slow_ema.len() - overlap..];
    let line: Vec<f64> = fast_tail
        .iter()
        .zip(slow_tail)
        .map(|(f, s)| f - s)
        .collect();

    let signal = ema(&line, signal_period);
    let offset = line.len() - signal.len();
    let histogram = signal
        .iter()
        .enumerate()
        .map(|(i, s)| line[i + offset] - s)
        .collect();

    MacdOutput {
        line,
        signal,
        histogram,
    }
}

/// Which MACD series an `Indicator` instance exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(
            fast >= 1 && slow >= 1 && signal >= 1,
            "MACD periods must be >= 1"
        );
        let name = match line {
            MacdLine::Line => format!("macd_line_{fast}_{slow}"),
            MacdLine::Signal => format!("macd_signal_{fast}_{slow}_{signal}"),
            MacdLine::Histogram => format!("macd_histogram_{fast}_{slow}_{signal}"),
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name,
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        let line_warmup = self.fast.max(self.slow) - 1;
        match self.line {
            MacdLine::Line => line_warmup,
            MacdLine::Signal | MacdLine::Histogram => line_warmup + self.signal - 1,
        }
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        let out = macd(&series.closes(), self.fast, self.slow, self.signal);
        match self.line {
            MacdLine::Line => out.line,
            MacdLine::Signal => out.signal,
            MacdLine::Histogram => out.histogram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn macd_lengths_follow_warmup() {
        let closes = ramp(40);
        let out = macd(&closes, 12, 26, 9);
        assert_eq!(out.line.len(), 40 - 25);
        assert_eq!(out.signal.len(), 40 - 25 - 8);
        assert_eq!(out.histogram.len(), out.signal.len());
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let out = macd(&ramp(60), 12, 26, 9);
        assert!(out.line.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let out = macd(&[50.0; 40], 12, 26, 9);
        assert!(out.line.iter().all(|&v| v.abs() < DEFAULT_EPSILON));
        assert!(out.histogram.iter().all(|&v| v.abs() < DEFAULT_EPSILON));
    }

    #[test]
    fn histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let out = macd(&closes, 12, 26, 9);
        let offset = out.line.len() - out.signal.len();
        for i in 0..out.signal.len() {
            assert_approx(
                out.histogram[i],
                out.line[i + offset] - out.signal[i],
                DEFAULT_EPSILON,
            );
        }
    }

    #[test]
    fn macd_insufficient_data_is_empty() {
        let out = macd(&ramp(20), 12, 26, 9);
        assert!(out.line.is_empty() && out.signal.is_empty() && out.histogram.is_empty());
    }

    #[test]
    fn macd_short_line_gives_empty_signal() {
        // 30 points: line has 5 values, fewer than the signal period
        let out = macd(&ramp(30), 12, 26, 9);
        assert_eq!(out.line.len(), 5);
        assert!(out.signal.is_empty());
        assert!(out.histogram.is_empty());
    }

    #[test]
    fn macd_indicator_lengths_match_warmup() {
        let series = make_series(&ramp(45));
        for line in [MacdLine::Line, MacdLine::Signal, MacdLine::Histogram] {
            let ind = Macd::new(12, 26, 9, line);
            assert_eq!(ind.compute(&series).len(), series.len() - ind.warmup());
        }
    }
}
