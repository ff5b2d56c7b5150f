//! Feature extraction: one immutable snapshot per forecast request.
//!
//! Derives volatility, momentum, regime, seasonality counts, pattern labels
//! and the configured indicator set from a price series. Short series degrade
//! to neutral values (zero momentum, sideways regime, empty indicators).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::PriceSeries;
use crate::indicators::{
    detect_patterns, Adx, Atr, Bollinger, Ema, Indicator, IndicatorSet, Macd, MacdLine, Pattern,
    Rsi, Sma, Stochastic, StochasticLine,
};
use crate::stats;

/// History length below which forecasts are considered low quality.
pub const RECOMMENDED_HISTORY: usize = 30;

/// Closes averaged on each side of the momentum comparison.
const MOMENTUM_HALF_WINDOW: usize = 10;

/// Lookback of the regime return.
const REGIME_WINDOW: usize = 20;

const REGIME_THRESHOLD: f64 = 0.05;

/// Coarse classification of the recent trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Bull,
    Bear,
    Sideways,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Regime::Bull => "bull",
            Regime::Bear => "bear",
            Regime::Sideways => "sideways",
        };
        f.write_str(s)
    }
}

/// Observation counts by weekday (Monday first) and by month (January first).
///
/// Diagnostic only; no forecast model reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seasonality {
    pub by_weekday: [u32; 7],
    pub by_month: [u32; 12],
}

impl Seasonality {
    pub fn from_dates(dates: &[NaiveDate]) -> Self {
        let mut seasonality = Self::default();
        for date in dates {
            seasonality.by_weekday[date.weekday().num_days_from_monday() as usize] += 1;
            seasonality.by_month[date.month0() as usize] += 1;
        }
        seasonality
    }

    pub fn total(&self) -> u32 {
        self.by_weekday.iter().sum()
    }
}

/// Periods for the indicators computed during extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
    pub stochastic_k: usize,
    pub stochastic_d: usize,
    pub atr_period: usize,
    pub adx_period: usize,
    pub sma_period: usize,
    pub ema_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_mult: 2.0,
            stochastic_k: 14,
            stochastic_d: 3,
            atr_period: 14,
            adx_period: 14,
            sma_period: 20,
            ema_period: 12,
        }
    }
}

impl IndicatorParams {
    /// Every period must be at least 1 and MACD fast must be below slow.
    pub fn validate(&self) -> Result<(), String> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
            ("stochastic_k", self.stochastic_k),
            ("stochastic_d", self.stochastic_d),
            ("atr_period", self.atr_period),
            ("adx_period", self.adx_period),
            ("sma_period", self.sma_period),
            ("ema_period", self.ema_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(format!("{name} must be >= 1"));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(format!(
                "macd_fast ({}) must be below macd_slow ({})",
                self.macd_fast, self.macd_slow
            ));
        }
        if !self.bollinger_mult.is_finite() || self.bollinger_mult < 0.0 {
            return Err(format!(
                "bollinger_mult must be a non-negative number, got {}",
                self.bollinger_mult
            ));
        }
        Ok(())
    }

    /// Name of the RSI series in the extracted `IndicatorSet`.
    pub fn rsi_name(&self) -> String {
        format!("rsi_{}", self.rsi_period)
    }

    /// Name of the MACD line series in the extracted `IndicatorSet`.
    pub fn macd_line_name(&self) -> String {
        format!("macd_line_{}_{}", self.macd_fast, self.macd_slow)
    }

    /// The full indicator set computed for every bundle.
    pub fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        let (fast, slow, signal) = (self.macd_fast, self.macd_slow, self.macd_signal);
        vec![
            Box::new(Rsi::new(self.rsi_period)),
            Box::new(Macd::new(fast, slow, signal, MacdLine::Line)),
            Box::new(Macd::new(fast, slow, signal, MacdLine::Signal)),
            Box::new(Macd::new(fast, slow, signal, MacdLine::Histogram)),
            Box::new(Sma::new(self.sma_period)),
            Box::new(Ema::new(self.ema_period)),
            Box::new(Bollinger::upper(self.bollinger_period, self.bollinger_mult)),
            Box::new(Bollinger::middle(self.bollinger_period, self.bollinger_mult)),
            Box::new(Bollinger::lower(self.bollinger_period, self.bollinger_mult)),
            Box::new(Stochastic::new(self.stochastic_k, self.stochastic_d, StochasticLine::K)),
            Box::new(Stochastic::new(self.stochastic_k, self.stochastic_d, StochasticLine::D)),
            Box::new(Atr::new(self.atr_period)),
            Box::new(Adx::new(self.adx_period)),
        ]
    }
}

/// Immutable feature snapshot consumed by the forecast models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBundle {
    pub symbol: String,
    /// Date of the last observation; forecasts start the day after.
    pub last_date: Option<NaiveDate>,
    pub prices: Vec<f64>,
    pub volumes: Vec<u64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub indicators: IndicatorSet,
    /// Population stddev of log returns.
    pub volatility: f64,
    pub momentum: f64,
    pub seasonality: Seasonality,
    pub regime: Regime,
    pub patterns: BTreeSet<Pattern>,
    pub latest_rsi: Option<f64>,
    pub latest_macd: Option<f64>,
}

impl FeatureBundle {
    pub fn last_price(&self) -> Option<f64> {
        self.prices.last().copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Builds `FeatureBundle`s with a fixed indicator configuration.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    params: IndicatorParams,
}

impl FeatureExtractor {
    pub fn new(params: IndicatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    pub fn extract(&self, series: &PriceSeries) -> FeatureBundle {
        if series.len() < RECOMMENDED_HISTORY {
            tracing::debug!(
                symbol = series.symbol(),
                points = series.len(),
                recommended = RECOMMENDED_HISTORY,
                "short price history, features degrade toward neutral"
            );
        }

        let prices = series.closes();
        let indicators = IndicatorSet::compute(series, &self.params.indicators());
        let latest_rsi = indicators.latest(&self.params.rsi_name());
        let latest_macd = indicators.latest(&self.params.macd_line_name());

        FeatureBundle {
            symbol: series.symbol().to_string(),
            last_date: series.last_date(),
            volatility: volatility(&prices),
            momentum: momentum(&prices),
            regime: regime(&prices),
            seasonality: Seasonality::from_dates(&series.dates()),
            patterns: detect_patterns(&prices),
            volumes: series.volumes(),
            highs: series.highs(),
            lows: series.lows(),
            indicators,
            latest_rsi,
            latest_macd,
            prices,
        }
    }
}

/// Population stddev of log returns; 0.0 with fewer than 3 prices.
pub fn volatility(prices: &[f64]) -> f64 {
    stats::std_dev(&stats::log_returns(prices))
}

/// (mean of last 10 closes - mean of the 10 before) / mean of the 10 before.
/// Needs 20 points, else 0.0.
pub fn momentum(prices: &[f64]) -> f64 {
    let n = prices.len();
    if n < 2 * MOMENTUM_HALF_WINDOW {
        return 0.0;
    }
    let recent = stats::mean(&prices[n - MOMENTUM_HALF_WINDOW..]);
    let prior = stats::mean(&prices[n - 2 * MOMENTUM_HALF_WINDOW..n - MOMENTUM_HALF_WINDOW]);
    if prior == 0.0 {
        return 0.0;
    }
    (recent - prior) / prior
}

/// Bull above +5% over the trailing 20 points, bear below -5%, else sideways.
pub fn regime(prices: &[f64]) -> Regime {
    let n = prices.len();
    if n < REGIME_WINDOW {
        return Regime::Sideways;
    }
    let base = prices[n - REGIME_WINDOW];
    if base <= 0.0 {
        return Regime::Sideways;
    }
    let change = (prices[n - 1] - base) / base;
    if change > REGIME_THRESHOLD {
        Regime::Bull
    } else if change < -REGIME_THRESHOLD {
        Regime::Bear
    } else {
        Regime::Sideways
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};

    #[test]
    fn constant_series_is_neutral() {
        let bundle = FeatureExtractor::default().extract(&make_series(&[100.0; 30]));
        assert_eq!(bundle.momentum, 0.0);
        assert_eq!(bundle.volatility, 0.0);
        assert_eq!(bundle.regime, Regime::Sideways);
        assert_eq!(bundle.latest_rsi, Some(100.0));
        assert!(bundle.latest_macd.unwrap().abs() < DEFAULT_EPSILON);
    }

    #[test]
    fn rising_series_is_bull() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + 30.0 * i as f64 / 29.0).collect();
        let bundle = FeatureExtractor::default().extract(&make_series(&closes));
        assert_eq!(bundle.regime, Regime::Bull);
        assert!(bundle.momentum > 0.0);
        assert!(bundle.patterns.contains(&Pattern::Uptrend));
    }

    #[test]
    fn falling_series_is_bear() {
        let closes: Vec<f64> = (0..25).map(|i| 130.0 - i as f64).collect();
        assert_eq!(regime(&closes), Regime::Bear);
    }

    #[test]
    fn momentum_known_value() {
        let mut closes = vec![100.0; 10];
        closes.extend(vec![110.0; 10]);
        assert_approx(momentum(&closes), 0.1, DEFAULT_EPSILON);
        assert_eq!(momentum(&closes[1..]), 0.0);
    }

    #[test]
    fn volatility_of_alternating_returns() {
        // log returns +ln2, -ln2 → population stddev ln2
        let v = volatility(&[1.0, 2.0, 1.0]);
        assert_approx(v, 2.0_f64.ln(), 1e-12);
    }

    #[test]
    fn indicators_are_tail_aligned() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.4).sin()).collect();
        let series = make_series(&closes);
        let params = IndicatorParams::default();
        let bundle = FeatureExtractor::new(params.clone()).extract(&series);
        for indicator in params.indicators() {
            let values = bundle.indicators.get(indicator.name()).unwrap();
            assert_eq!(values.len(), 40 - indicator.warmup(), "{}", indicator.name());
        }
    }

    #[test]
    fn short_series_has_empty_indicators() {
        let bundle = FeatureExtractor::default().extract(&make_series(&[100.0, 101.0]));
        assert_eq!(bundle.latest_rsi, None);
        assert_eq!(bundle.latest_macd, None);
        assert_eq!(bundle.regime, Regime::Sideways);
    }

    #[test]
    fn seasonality_counts_every_observation() {
        let series = make_series(&[1.0; 14]);
        let s = Seasonality::from_dates(&series.dates());
        assert_eq!(s.total(), 14);
        assert!(s.by_weekday.iter().all(|&c| c == 2));
        assert_eq!(s.by_month[0], 14);
    }

    #[test]
    fn params_validation() {
        assert!(IndicatorParams::default().validate().is_ok());
        let bad = IndicatorParams {
            macd_fast: 26,
            ..IndicatorParams::default()
        };
        assert!(bad.validate().is_err());
        let zero = IndicatorParams {
            rsi_period: 0,
            ..IndicatorParams::default()
        };
        assert!(zero.validate().unwrap_err().contains("rsi_period"));
    }
}
