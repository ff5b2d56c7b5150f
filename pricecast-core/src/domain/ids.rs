use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a forecast model ("lstm", "arima", "ensemble", ...).
///
/// Shared between the forecast strategies, the ensemble output and the
/// model registry. Kept open-ended so a trained model can be plugged in
/// under a new id without touching the combiner or the validator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub String);

impl ModelId {
    /// Trend-decay strategy.
    pub const LSTM: &'static str = "lstm";
    /// Mean-reversion strategy.
    pub const ARIMA: &'static str = "arima";
    /// Confidence-weighted combination of the other models.
    pub const ENSEMBLE: &'static str = "ensemble";
    /// Flat fallback used when no model produced a forecast.
    pub const NAIVE: &'static str = "naive";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
