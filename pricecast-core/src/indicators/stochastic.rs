//! Stochastic Oscillator.
//!
//! %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over the
//! trailing `k_period` window; a zero range gives %K = 50.
//! %D = SMA(%K, d_period).
//! Warm-up: k_period - 1 for %K, k_period + d_period - 2 for %D.

use super::sma::sma;
use super::Indicator;
use crate::domain::PriceSeries;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

/// Stochastic %K/%D. Inputs are truncated to the shortest of the three slices.
pub fn stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> StochasticOutput {
    let n = highs.len().min(lows.len()).min(closes.len());
    if k_period == 0 || n < k_period {
        return StochasticOutput::default();
    }

    let k: Vec<f64> = ((k_period - 1)..n)
        .map(|i| {
            let start = i + 1 - k_period;
            let highest = highs[start..=i]
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            let lowest = lows[start..=i]
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min);
            let range = highest - lowest;
            if range == 0.0 {
                50.0
            } else {
                (100.0 * (closes[i] - lowest) / range).clamp(0.0, 100.0)
            }
        })
        .collect();

    let d = sma(&k, d_period);
    StochasticOutput { k, d }
}

/// Which stochastic line an `Indicator` instance exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    K,
    D,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    line: StochasticLine,
    name: String,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize, line: StochasticLine) -> Self {
        assert!(
            k_period >= 1 && d_period >= 1,
            "Stochastic periods must be >= 1"
        );
        let name = match line {
            StochasticLine::K => format!("stochastic_k_{k_period}"),
            StochasticLine::D => format!("stochastic_d_{k_period}_{d_period}"),
        };
        Self {
            k_period,
            d_period,
            line,
            name,
        }
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        match self.line {
            StochasticLine::K => self.k_period - 1,
            StochasticLine::D => self.k_period + self.d_period - 2,
        }
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        let out = stochastic(
            &series.highs(),
            &series.lows(),
            &series.closes(),
            self.k_period,
            self.d_period,
        );
        match self.line {
            StochasticLine::K => out.k,
            StochasticLine::D => out.d,
        }
    }
}
