//! Pricecast Runner: forecast orchestration on top of `pricecast-core`.
//!
//! This crate provides:
//! - `ForecastEngine`: feature extraction, model evaluation (parallel or
//!   sequential), ensemble with naive fallback, validation, model comparison
//! - TOML engine configuration
//! - CSV and synthetic price loading
//! - TTL validation cache with per-symbol single-flight recompute

pub mod cache;
pub mod config;
pub mod data_loader;
pub mod engine;
pub mod report;

pub use cache::{fingerprint, Fingerprint, ValidationCache};
pub use config::{ConfigError, EngineConfig};
pub use data_loader::{load_csv, load_realized, parse_csv, synthetic_series, LoadError};
pub use engine::{naive_forecast, EngineError, ForecastEngine};
pub use report::ForecastReport;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn engine_is_send_sync() {
        assert_send::<ForecastEngine>();
        assert_sync::<ForecastEngine>();
    }

    #[test]
    fn cache_is_send_sync() {
        assert_send::<ValidationCache>();
        assert_sync::<ValidationCache>();
    }

    #[test]
    fn config_and_report_are_send_sync() {
        assert_send::<EngineConfig>();
        assert_sync::<EngineConfig>();
        assert_send::<ForecastReport>();
        assert_sync::<ForecastReport>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<ConfigError>();
        assert_sync::<ConfigError>();
        assert_send::<LoadError>();
        assert_sync::<LoadError>();
        assert_send::<EngineError>();
        assert_sync::<EngineError>();
    }
}
