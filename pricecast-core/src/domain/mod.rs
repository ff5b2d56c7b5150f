//! Domain types for PriceCast

pub mod forecast;
pub mod ids;
pub mod price;

pub use forecast::{ForecastPoint, ForecastSequence};
pub use ids::ModelId;
pub use price::{PricePoint, PriceSeries, SeriesError};
