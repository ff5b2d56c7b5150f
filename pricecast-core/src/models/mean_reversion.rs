//! Mean-reversion strategy (reported as "arima").
//!
//! Daily change = 0.5 · mean historical return + uniform noise · 2 · stddev of returns.
//! Confidence 0.9, minus 0.08 per day, floored at 0.5. Bounds ±8%.

use rand::RngCore;
use std::collections::BTreeSet;

use super::{centered_uniform, decaying_confidence, forecast_date, step_price, tags, ForecastModel};
use crate::domain::{ForecastPoint, ForecastSequence, ModelId};
use crate::features::FeatureBundle;
use crate::stats;

const REVERSION_WEIGHT: f64 = 0.5;
const SHOCK_SCALE: f64 = 2.0;
const CONFIDENCE_START: f64 = 0.9;
const CONFIDENCE_STEP: f64 = 0.08;
const CONFIDENCE_FLOOR: f64 = 0.5;
const BAND: f64 = 0.08;

#[derive(Debug, Clone, Copy, Default)]
pub struct MeanReversionModel;

impl ForecastModel for MeanReversionModel {
    fn id(&self) -> ModelId {
        ModelId::new(ModelId::ARIMA)
    }

    fn features(&self) -> BTreeSet<String> {
        tags(&["price", "mean_return", "return_std"])
    }

    fn generate(
        &self,
        bundle: &FeatureBundle,
        horizon: usize,
        rng: &mut dyn RngCore,
    ) -> ForecastSequence {
        let (Some(last_price), Some(last_date)) = (bundle.last_price(), bundle.last_date) else {
            return Vec::new();
        };

        let returns = stats::simple_returns(&bundle.prices);
        let mean_return = stats::mean(&returns);
        let return_std = stats::std_dev(&returns);
        let features = self.features();
        let mut previous = last_price;

        (1..=horizon)
            .map(|day| {
                let shock = centered_uniform(rng) * SHOCK_SCALE * return_std;
                let predicted = step_price(previous, REVERSION_WEIGHT * mean_return + shock);
                previous = predicted;
                ForecastPoint::with_band(
                    forecast_date(last_date, day),
                    predicted,
                    decaying_confidence(CONFIDENCE_START, CONFIDENCE_STEP, CONFIDENCE_FLOOR, day),
                    BAND,
                    self.id(),
                    features.clone(),
                )
            })
            .collect()
    }
}
