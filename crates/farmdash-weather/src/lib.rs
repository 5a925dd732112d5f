//! Weather service for Farmdash
//!
//! Fetches 5-day forecasts and current conditions from an
//! OpenWeather-style API, caches the latest forecast per client, and
//! derives planting advisories from the forecast.

pub mod advisory;
pub mod cache;
pub mod error;
pub mod location;
pub mod provider;
pub mod service;
pub mod types;

pub use advisory::{icon_category, planting_recommendation, IconCategory};
pub use cache::{CacheInfo, ForecastCache, MAX_CACHE_AGE_HOURS};
pub use error::WeatherError;
pub use location::{resolve, LocationDefaults, LocationQuery, ProviderParams, ResolvedLocation};
pub use provider::OpenWeatherClient;
pub use service::WeatherService;
pub use types::*;
