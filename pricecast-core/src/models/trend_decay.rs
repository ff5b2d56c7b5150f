//! Trend-decay strategy (reported as "lstm").
//!
//! Daily change = directional bias · 0.95^(day-1) + uniform noise · volatility · 0.5
//! where the bias comes from the latest RSI (oversold +0.001, overbought -0.001)
//! and the sign of the latest MACD line (+/-0.0005).
//! Confidence 0.95, minus 0.05 per day, floored at 0.6. Bounds ±5%.

use rand::RngCore;
use std::collections::BTreeSet;

use super::{centered_uniform, decaying_confidence, forecast_date, step_price, tags, ForecastModel};
use crate::domain::{ForecastPoint, ForecastSequence, ModelId};
use crate::features::FeatureBundle;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_NUDGE: f64 = 0.001;
const MACD_NUDGE: f64 = 0.0005;
const DECAY: f64 = 0.95;
const NOISE_SCALE: f64 = 0.5;
const CONFIDENCE_START: f64 = 0.95;
const CONFIDENCE_STEP: f64 = 0.05;
const CONFIDENCE_FLOOR: f64 = 0.6;
const BAND: f64 = 0.05;

#[derive(Debug, Clone, Copy, Default)]
pub struct TrendDecayModel;

impl TrendDecayModel {
    /// Undecayed daily drift implied by the latest RSI and MACD values.
    /// Missing indicators contribute nothing.
    pub fn trend_bias(bundle: &FeatureBundle) -> f64 {
        let rsi_nudge = match bundle.latest_rsi {
            Some(rsi) if rsi < RSI_OVERSOLD => RSI_NUDGE,
            Some(rsi) if rsi > RSI_OVERBOUGHT => -RSI_NUDGE,
            _ => 0.0,
        };
        let macd_nudge = match bundle.latest_macd {
            Some(macd) if macd > 0.0 => MACD_NUDGE,
            Some(macd) if macd < 0.0 => -MACD_NUDGE,
            _ => 0.0,
        };
        rsi_nudge + macd_nudge
    }
}

impl ForecastModel for TrendDecayModel {
    fn id(&self) -> ModelId {
        ModelId::new(ModelId::LSTM)
    }

    fn features(&self) -> BTreeSet<String> {
        tags(&["price", "rsi", "macd", "volatility"])
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

        let bias = Self::trend_bias(bundle);
        let features = self.features();
        let mut previous = last_price;

        (1..=horizon)
            .map(|day| {
                let decayed = bias * DECAY.powi(day as i32 - 1);
                let noise = centered_uniform(rng) * bundle.volatility * NOISE_SCALE;
                let predicted = step_price(previous, decayed + noise);
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
