//! Forecast output types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ids::ModelId;

/// A single forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    /// Model confidence in [0, 1].
    pub confidence: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub model_used: ModelId,
    pub features_used: BTreeSet<String>,
}

impl ForecastPoint {
    /// Point with a symmetric percentage band: bounds = predicted · (1 ± band).
    pub fn with_band(
        date: NaiveDate,
        predicted: f64,
        confidence: f64,
        band: f64,
        model_used: ModelId,
        features_used: BTreeSet<String>,
    ) -> Self {
        Self {
            date,
            predicted,
            confidence: confidence.clamp(0.0, 1.0),
            upper_bound: predicted * (1.0 + band),
            lower_bound: predicted * (1.0 - band),
            model_used,
            features_used,
        }
    }

    /// Width of the prediction interval.
    pub fn interval_width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// Consecutive future days, one point per day of the horizon.
pub type ForecastSequence = Vec<ForecastPoint>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_is_symmetric_around_prediction() {
        let p = ForecastPoint::with_band(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            200.0,
            0.9,
            0.05,
            ModelId::from("lstm"),
            BTreeSet::new(),
        );
        assert!((p.upper_bound - 210.0).abs() < 1e-9);
        assert!((p.lower_bound - 190.0).abs() < 1e-9);
        assert!((p.interval_width() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn confidence_is_clamped() {
        let p = ForecastPoint::with_band(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            10.0,
            1.7,
            0.05,
            ModelId::from("lstm"),
            BTreeSet::new(),
        );
        assert_eq!(p.confidence, 1.0);
    }
}
