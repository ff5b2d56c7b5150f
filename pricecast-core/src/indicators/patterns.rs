//! Chart pattern labels from trend-vs-volatility heuristics.
//!
//! Looks at the trailing `PATTERN_WINDOW` closes only:
//! - trend      = (last - first) / first
//! - volatility = stddev of simple returns inside the window
//!
//! Fewer than `PATTERN_WINDOW` points → no labels.

use crate::stats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Points inspected by `detect_patterns`.
pub const PATTERN_WINDOW: usize = 20;

const TREND_THRESHOLD: f64 = 0.05;
const SIDEWAYS_THRESHOLD: f64 = 0.02;
const BREAKOUT_SIGMAS: f64 = 2.0;
const SQUEEZE_VOLATILITY: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pattern {
    #[serde(rename = "Uptrend")]
    Uptrend,
    #[serde(rename = "Downtrend")]
    Downtrend,
    #[serde(rename = "Sideways consolidation")]
    SidewaysConsolidation,
    #[serde(rename = "Volatility breakout")]
    VolatilityBreakout,
    #[serde(rename = "Volatility squeeze")]
    VolatilitySqueeze,
}

impl Pattern {
    pub fn label(&self) -> &'static str {
        match self {
            Pattern::Uptrend => "Uptrend",
            Pattern::Downtrend => "Downtrend",
            Pattern::SidewaysConsolidation => "Sideways consolidation",
            Pattern::VolatilityBreakout => "Volatility breakout",
            Pattern::VolatilitySqueeze => "Volatility squeeze",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Detect pattern labels over the trailing window of `prices`.
pub fn detect_patterns(prices: &[f64]) -> BTreeSet<Pattern> {
    let mut patterns = BTreeSet::new();
    if prices.len() < PATTERN_WINDOW {
        return patterns;
    }

    let window = &prices[prices.len() - PATTERN_WINDOW..];
    let first = window[0];
    let last = window[PATTERN_WINDOW - 1];
    if first <= 0.0 {
        return patterns;
    }
    let trend = (last - first) / first;

    if trend > TREND_THRESHOLD {
        patterns.insert(Pattern::Uptrend);
    } else if trend < -TREND_THRESHOLD {
        patterns.insert(Pattern::Downtrend);
    } else if trend.abs() <= SIDEWAYS_THRESHOLD {
        patterns.insert(Pattern::SidewaysConsolidation);
    }

    let returns = stats::simple_returns(window);
    let volatility = stats::std_dev(&returns);

    // Breakout: the latest move is large relative to the moves before it.
    if let Some((&latest, earlier)) = returns.split_last() {
        let prior_volatility = stats::std_dev(earlier);
        if prior_volatility > 0.0 && latest.abs() > BREAKOUT_SIGMAS * prior_volatility {
            patterns.insert(Pattern::VolatilityBreakout);
        }
    }

    if volatility < SQUEEZE_VOLATILITY {
        patterns.insert(Pattern::VolatilitySqueeze);
    }

    patterns
}
