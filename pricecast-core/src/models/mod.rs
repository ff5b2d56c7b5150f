//! Forecast model strategies.
//!
//! Each strategy turns a `FeatureBundle` into `horizon` consecutive daily
//! forecasts starting the day after the last observation. Randomness comes
//! only from the injected generator, so a seeded generator reproduces the
//! exact sequence.
//!
//! Both built-in strategies are simulation heuristics that stand in for
//! trained models; a trained model only has to implement `ForecastModel`.

pub mod mean_reversion;
pub mod trend_decay;

pub use mean_reversion::MeanReversionModel;
pub use trend_decay::TrendDecayModel;

use chrono::{Duration, NaiveDate};
use rand::RngCore;
use std::collections::BTreeSet;

use crate::domain::{ForecastSequence, ModelId};
use crate::features::FeatureBundle;

/// Errors from model construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("unknown model id: {0}")]
    UnknownModel(String),
}

/// A forecast strategy.
pub trait ForecastModel: Send + Sync {
    /// Identifier stamped on every point this model produces.
    fn id(&self) -> ModelId;

    /// Feature names this model reads from the bundle.
    fn features(&self) -> BTreeSet<String>;

    /// Produce exactly `horizon` points with strictly increasing dates, or an
    /// empty sequence when the bundle has no price history.
    fn generate(
        &self,
        bundle: &FeatureBundle,
        horizon: usize,
        rng: &mut dyn RngCore,
    ) -> ForecastSequence;
}

/// Create a model strategy from its id.
pub fn create_model(id: &str) -> Result<Box<dyn ForecastModel>, ModelError> {
    match id {
        ModelId::LSTM => Ok(Box::new(TrendDecayModel)),
        ModelId::ARIMA => Ok(Box::new(MeanReversionModel)),
        other => Err(ModelError::UnknownModel(other.to_string())),
    }
}

/// Date of forecast day `day` (1-indexed) after `last`.
pub(crate) fn forecast_date(last: NaiveDate, day: usize) -> NaiveDate {
    last + Duration::days(day as i64)
}

/// Confidence for day `day` (1-indexed): `start` minus `step` per elapsed day,
/// never below `floor`.
pub(crate) fn decaying_confidence(start: f64, step: f64, floor: f64, day: usize) -> f64 {
    (start - step * (day.saturating_sub(1)) as f64).max(floor)
}

/// Apply a fractional change to a price, keeping the result positive.
pub(crate) fn step_price(previous: f64, change: f64) -> f64 {
    (previous * (1.0 + change)).max(f64::MIN_POSITIVE)
}

/// Uniform draw in [-0.5, 0.5).
pub(crate) fn centered_uniform(rng: &mut dyn RngCore) -> f64 {
    use rand::Rng;
    rng.gen::<f64>() - 0.5
}

pub(crate) fn tags(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}
