//! Forecast engine: wires feature extraction, model strategies, the ensemble,
//! validation and the validation cache together.
//!
//! The engine is an explicitly constructed value. Callers build one from an
//! `EngineConfig` and pass it by reference; nothing here is global.

use chrono::Utc;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use pricecast_core::domain::{ForecastPoint, ForecastSequence, ModelId, PriceSeries};
use pricecast_core::ensemble::combine;
use pricecast_core::features::{FeatureBundle, FeatureExtractor};
use pricecast_core::models::{create_model, ForecastModel, ModelError};
use pricecast_core::registry::{ModelComparison, ModelRegistry};
use pricecast_core::rng::RngHierarchy;
use pricecast_core::validation::{RealizedPrices, ValidationEngine, ValidationResult};

use crate::cache::{fingerprint, ValidationCache};
use crate::config::{ConfigError, EngineConfig};
use crate::report::{ForecastReport, SCHEMA_VERSION};

/// Confidence of the naive fallback sequence.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;
/// Half-width of the naive fallback band, as a fraction of price.
pub const FALLBACK_BAND: f64 = 0.10;

/// Errors from engine construction.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

pub struct ForecastEngine {
    config: EngineConfig,
    extractor: FeatureExtractor,
    models: Vec<Box<dyn ForecastModel>>,
    registry: ModelRegistry,
    rngs: RngHierarchy,
    validator: ValidationEngine,
    cache: ValidationCache,
}

impl ForecastEngine {
    /// Validate `config` and instantiate its models.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let models = config
            .models
            .iter()
            .map(|id| create_model(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_models(config, models))
    }

    /// Engine over caller-supplied strategies; `config.models` is ignored.
    pub fn with_models(config: EngineConfig, models: Vec<Box<dyn ForecastModel>>) -> Self {
        Self {
            extractor: FeatureExtractor::new(config.indicators.clone()),
            rngs: RngHierarchy::new(config.seed),
            cache: ValidationCache::new(Duration::from_secs(config.cache_ttl_secs)),
            registry: ModelRegistry::with_defaults(),
            validator: ValidationEngine,
            models,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ValidationCache {
        &self.cache
    }

    pub fn model_ids(&self) -> Vec<ModelId> {
        self.models.iter().map(|m| m.id()).collect()
    }

    pub fn extract(&self, series: &PriceSeries) -> FeatureBundle {
        self.extractor.extract(series)
    }

    /// Forecast over the configured horizon.
    pub fn forecast(&self, series: &PriceSeries) -> ForecastReport {
        self.forecast_with_horizon(series, self.config.horizon_days)
    }

    /// Extract features, run every model, and combine the results.
    ///
    /// Each model draws from its own (symbol, model id) stream, so parallel
    /// and sequential evaluation produce identical sequences. When the
    /// ensemble is empty for a non-empty series, a flat naive sequence is
    /// substituted and `fallback_used` is set.
    pub fn forecast_with_horizon(&self, series: &PriceSeries, horizon: usize) -> ForecastReport {
        let symbol = series.symbol();
        if series.len() < self.config.min_history {
            tracing::warn!(
                symbol,
                points = series.len(),
                min_history = self.config.min_history,
                "price history shorter than configured minimum"
            );
        }

        let bundle = self.extractor.extract(series);
        let outputs = self.run_models(&bundle, horizon);

        let sequences: Vec<ForecastSequence> = outputs.iter().map(|(_, seq)| seq.clone()).collect();
        let mut ensemble = combine(&sequences);
        let mut fallback_used = false;

        if ensemble.is_empty() && horizon > 0 {
            if let Some(fallback) = naive_forecast(&bundle, horizon) {
                tracing::warn!(symbol, horizon, "ensemble empty, using naive fallback");
                ensemble = fallback;
                fallback_used = true;
            }
        }

        ForecastReport {
            schema_version: SCHEMA_VERSION,
            symbol: symbol.to_string(),
            generated_at: Utc::now(),
            horizon_days: horizon,
            ensemble,
            per_model: outputs.into_iter().collect(),
            regime: bundle.regime,
            volatility: bundle.volatility,
            momentum: bundle.momentum,
            patterns: bundle.patterns,
            fallback_used,
        }
    }

    fn run_models(&self, bundle: &FeatureBundle, horizon: usize) -> Vec<(ModelId, ForecastSequence)> {
        let run = |model: &dyn ForecastModel| {
            let id = model.id();
            let mut rng = self.rngs.rng_for(&bundle.symbol, id.as_str());
            let started = Instant::now();
            let sequence = model.generate(bundle, horizon, &mut rng);
            tracing::debug!(
                symbol = %bundle.symbol,
                model = %id,
                points = sequence.len(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "model evaluated"
            );
            (id, sequence)
        };

        if self.config.parallel {
            self.models.par_iter().map(|m| run(m.as_ref())).collect()
        } else {
            self.models.iter().map(|m| run(m.as_ref())).collect()
        }
    }

    /// Validate a forecast against realized prices. Always recomputes.
    pub fn validate(
        &self,
        symbol: &str,
        forecast: &ForecastSequence,
        realized: &RealizedPrices,
    ) -> ValidationResult {
        self.validator.validate(symbol, forecast, realized)
    }

    /// Validate through the TTL cache keyed by `symbol`.
    ///
    /// A cached result is reused only while it is fresh and was computed
    /// from the same forecast and realized prices.
    pub fn validate_cached(
        &self,
        symbol: &str,
        forecast: &ForecastSequence,
        realized: &RealizedPrices,
    ) -> Arc<ValidationResult> {
        let key = fingerprint(forecast, realized);
        self.cache
            .get_or_compute(symbol, key, || self.validator.validate(symbol, forecast, realized))
    }

    /// Validate every sequence in `report` and join with the registry.
    pub fn compare(&self, report: &ForecastReport, realized: &RealizedPrices) -> Vec<ModelComparison> {
        let observed: BTreeMap<ModelId, ValidationResult> = report
            .sequences()
            .into_iter()
            .map(|(id, seq)| (id, self.validator.validate(&report.symbol, seq, realized)))
            .collect();
        self.registry.compare(&observed)
    }
}

/// Flat forecast at the last close; `None` for an empty bundle.
pub fn naive_forecast(bundle: &FeatureBundle, horizon: usize) -> Option<ForecastSequence> {
    let last_price = bundle.last_price()?;
    let last_date = bundle.last_date?;
    let features: BTreeSet<String> = ["price".to_string()].into_iter().collect();

    Some(
        (1..=horizon)
            .map(|day| {
                ForecastPoint::with_band(
                    last_date + chrono::Duration::days(day as i64),
                    last_price,
                    FALLBACK_CONFIDENCE,
                    FALLBACK_BAND,
                    ModelId::new(ModelId::NAIVE),
                    features.clone(),
                )
            })
            .collect(),
    )
}
