//! Forecast report returned by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use pricecast_core::domain::{ForecastSequence, ModelId};
use pricecast_core::features::Regime;
use pricecast_core::indicators::Pattern;

/// Current schema version for serialized reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete output of one forecast request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub generated_at: DateTime<Utc>,
    pub horizon_days: usize,
    /// Combined sequence, or the naive fallback when `fallback_used`.
    pub ensemble: ForecastSequence,
    /// Raw output of every evaluated model.
    pub per_model: BTreeMap<ModelId, ForecastSequence>,
    pub regime: Regime,
    pub volatility: f64,
    pub momentum: f64,
    pub patterns: BTreeSet<Pattern>,
    pub fallback_used: bool,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl ForecastReport {
    /// Every sequence in the report keyed by the id stamped on its points,
    /// including the ensemble (or fallback) sequence.
    pub fn sequences(&self) -> BTreeMap<ModelId, &ForecastSequence> {
        let mut all: BTreeMap<ModelId, &ForecastSequence> =
            self.per_model.iter().map(|(id, seq)| (id.clone(), seq)).collect();
        if let Some(first) = self.ensemble.first() {
            all.insert(first.model_used.clone(), &self.ensemble);
        }
        all
    }

    pub fn pattern_labels(&self) -> Vec<&'static str> {
        self.patterns.iter().map(Pattern::label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pricecast_core::domain::ForecastPoint;

    fn sample() -> ForecastReport {
        let point = |model: &str| {
            ForecastPoint::with_band(
                NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
                100.0,
                0.9,
                0.05,
                ModelId::from(model),
                BTreeSet::new(),
            )
        };
        ForecastReport {
            schema_version: SCHEMA_VERSION,
            symbol: "SPY".into(),
            generated_at: Utc::now(),
            horizon_days: 1,
            ensemble: vec![point(ModelId::ENSEMBLE)],
            per_model: [(ModelId::from(ModelId::LSTM), vec![point(ModelId::LSTM)])]
                .into_iter()
                .collect(),
            regime: Regime::Sideways,
            volatility: 0.01,
            momentum: 0.0,
            patterns: [Pattern::SidewaysConsolidation].into_iter().collect(),
            fallback_used: false,
        }
    }

    #[test]
    fn sequences_include_ensemble() {
        let report = sample();
        let all = report.sequences();
        assert_eq!(all.len(), 2);
        assert!(all.contains_key(&ModelId::from(ModelId::ENSEMBLE)));
        assert!(all.contains_key(&ModelId::from(ModelId::LSTM)));
    }

    #[test]
    fn json_round_trip() {
        let report = sample();
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"regime\": \"sideways\""));
        let back: ForecastReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn missing_schema_version_defaults() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let back: ForecastReport = serde_json::from_value(value).unwrap();
        assert_eq!(back.schema_version, SCHEMA_VERSION);
    }
}
