//! Weather data for SkyCast
//!
//! Wire types for the OpenWeatherMap-style API, the HTTP client, unit
//! conversion and daily forecast aggregation.

pub mod aggregate;
pub mod client;
pub mod types;
pub mod units;

pub use aggregate::{aggregate_daily, aggregate_daily_in};
pub use client::{FetchError, FixedLanguage, LanguageSource, WeatherClient};
pub use types::*;
pub use units::{TemperatureUnit, WindSpeedUnit};
