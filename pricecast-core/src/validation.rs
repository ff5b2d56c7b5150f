//! Forecast validation against realized prices.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{ForecastPoint, ForecastSequence};

/// Realized closing prices by date.
pub type RealizedPrices = BTreeMap<NaiveDate, f64>;

/// A forecast point with its realized outcome, when one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationPoint {
    #[serde(flatten)]
    pub forecast: ForecastPoint,
    pub actual: Option<f64>,
    /// max(0, 1 - |predicted - actual| / actual)
    pub accuracy: Option<f64>,
}

impl ValidationPoint {
    pub fn is_validated(&self) -> bool {
        self.actual.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub symbol: String,
    pub points: Vec<ValidationPoint>,
    pub overall_accuracy: f64,
    pub mape: f64,
    pub rmse: f64,
    pub last_validated: DateTime<Utc>,
}

impl ValidationResult {
    /// Number of points that had a realized price.
    pub fn validated_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_validated()).count()
    }
}

/// Stateless validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationEngine;

impl ValidationEngine {
    pub fn validate(
        &self,
        symbol: &str,
        forecast: &ForecastSequence,
        realized: &RealizedPrices,
    ) -> ValidationResult {
        self.validate_at(symbol, forecast, realized, Utc::now())
    }

    /// Same as `validate` with an explicit validation timestamp.
    pub fn validate_at(
        &self,
        symbol: &str,
        forecast: &ForecastSequence,
        realized: &RealizedPrices,
        now: DateTime<Utc>,
    ) -> ValidationResult {
        let mut points = Vec::with_capacity(forecast.len());
        let mut accuracy_sum = 0.0;
        let mut pct_error_sum = 0.0;
        let mut squared_error_sum = 0.0;
        let mut matched = 0usize;

        for point in forecast {
            let actual = realized
                .get(&point.date)
                .copied()
                .filter(|a| a.is_finite() && *a > 0.0);

            let accuracy = actual.map(|actual| {
                let abs_error = (point.predicted - actual).abs();
                let pct_error = abs_error / actual;
                matched += 1;
                pct_error_sum += pct_error;
                squared_error_sum += abs_error * abs_error;
                let accuracy = (1.0 - pct_error).max(0.0);
                accuracy_sum += accuracy;
                accuracy
            });

            points.push(ValidationPoint {
                forecast: point.clone(),
                actual,
                accuracy,
            });
        }

        let (overall_accuracy, mape, rmse) = if matched == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let n = matched as f64;
            (
                accuracy_sum / n,
                pct_error_sum / n,
                (squared_error_sum / n).sqrt(),
            )
        };

        tracing::debug!(symbol, matched, total = forecast.len(), overall_accuracy, "validated forecast");

        ValidationResult {
            symbol: symbol.to_string(),
            points,
            overall_accuracy,
            mape,
            rmse,
            last_validated: now,
        }
    }
}

/// Treat a forecast's own predictions as realized prices.
pub fn predictions_as_realized(forecast: &ForecastSequence) -> RealizedPrices {
    forecast.iter().map(|p| (p.date, p.predicted)).collect()
}
