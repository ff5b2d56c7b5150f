//! Pricecast Core: indicators, feature extraction, forecast models, ensemble, validation.
//!
//! This crate is the numerical heart of Pricecast and performs no I/O:
//! - Domain types (price series, forecast points, model ids)
//! - Indicator library (RSI, SMA, EMA, MACD, Bollinger, Stochastic, ATR, ADX proxy, patterns)
//! - Feature extraction into an immutable `FeatureBundle`
//! - Two forecast strategies behind the `ForecastModel` trait
//! - Confidence-weighted ensemble combination
//! - Validation of forecasts against realized prices
//! - Read-only model registry for reporting
//! - Deterministic, order-independent RNG hierarchy
//!
//! Insufficient input never fails: every function returns an empty or
//! neutral result instead.

pub mod domain;
pub mod ensemble;
pub mod features;
pub mod indicators;
pub mod models;
pub mod registry;
pub mod rng;
pub mod stats;
pub mod validation;

pub use domain::{ForecastPoint, ForecastSequence, ModelId, PricePoint, PriceSeries, SeriesError};
pub use ensemble::combine;
pub use features::{FeatureBundle, FeatureExtractor, IndicatorParams, Regime, Seasonality};
pub use indicators::{Indicator, IndicatorSet, Pattern};
pub use models::{create_model, ForecastModel, MeanReversionModel, ModelError, TrendDecayModel};
pub use registry::{ModelComparison, ModelDescriptor, ModelRegistry};
pub use rng::RngHierarchy;
pub use validation::{RealizedPrices, ValidationEngine, ValidationPoint, ValidationResult};
