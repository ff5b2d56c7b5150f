//! Engine configuration loaded from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! horizon_days = 7
//! seed = 42
//! models = ["lstm", "arima"]
//!
//! [indicators]
//! rsi_period = 14
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use pricecast_core::features::{IndicatorParams, RECOMMENDED_HISTORY};
use pricecast_core::models::create_model;

/// Errors from loading or validating an `EngineConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a `ForecastEngine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Forecast horizon in calendar days.
    pub horizon_days: usize,
    /// Master seed for the per-(symbol, model) RNG hierarchy.
    pub seed: u64,
    /// History length below which a warning is logged.
    pub min_history: usize,
    /// Model ids evaluated and combined, in order.
    pub models: Vec<String>,
    /// Lifetime of cached validation results.
    pub cache_ttl_secs: u64,
    /// Evaluate models on the rayon pool instead of sequentially.
    pub parallel: bool,
    pub indicators: IndicatorParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            seed: 42,
            min_history: RECOMMENDED_HISTORY,
            models: vec!["lstm".into(), "arima".into()],
            cache_ttl_secs: 300,
            parallel: true,
            indicators: IndicatorParams::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_days == 0 {
            return Err(ConfigError::Invalid("horizon_days must be >= 1".into()));
        }
        for id in &self.models {
            create_model(id).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        let mut seen = std::collections::BTreeSet::new();
        if let Some(dup) = self.models.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(ConfigError::Invalid(format!("model '{dup}' listed twice")));
        }
        self.indicators
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("indicators: {e}")))
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
