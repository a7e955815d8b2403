//! HTTP client for the OpenWeatherMap-style REST API.
//!
//! One GET per call, no retries. Values are always requested in metric units
//! so that everything downstream works in Celsius and m/s.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use skycast_core::error::{NetworkError, ReqwestErrorExt};
use skycast_core::ApiConfig;
use thiserror::Error;
use tracing::instrument;

use crate::types::{CurrentWeather, Forecast};

/// Unit system requested from the API.
pub const UNITS: &str = "metric";

/// Language used when no preference is available.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Errors from a single remote fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetch failed: HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("fetch failed: empty response body")]
    EmptyBody,

    #[error("fetch failed: {0}")]
    Network(#[from] NetworkError),

    #[error("fetch failed: could not decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Collapse into the shared network error type.
    pub fn into_network_error(self) -> NetworkError {
        match self {
            Self::Status { status, message } => NetworkError::ServerError { status, message },
            Self::EmptyBody => NetworkError::EmptyResponse,
            Self::Network(e) => e,
            Self::Decode(msg) => NetworkError::InvalidResponse(msg),
        }
    }
}

/// Supplies the `lang` query parameter at request time.
pub trait LanguageSource: Send + Sync {
    fn language(&self) -> String;
}

/// A language that never changes.
#[derive(Debug, Clone)]
pub struct FixedLanguage(pub String);

impl LanguageSource for FixedLanguage {
    fn language(&self) -> String {
        self.0.clone()
    }
}

#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: Arc<dyn LanguageSource>,
}

impl std::fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WeatherClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
        language: Arc<dyn LanguageSource>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.into_network_error()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            language,
        })
    }

    /// Build a client from the `[api]` config section.
    pub fn from_config(api: &ApiConfig, language: Arc<dyn LanguageSource>) -> Result<Self, FetchError> {
        let api_key = api.effective_api_key().unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("No weather API key configured; requests will likely be rejected");
        }
        Self::new(
            &api.base_url,
            &api_key,
            Duration::from_secs(api.timeout_secs),
            language,
        )
    }

    /// Current conditions (`GET /weather`).
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current(&self, lat: f64, lon: f64) -> Result<CurrentWeather, FetchError> {
        self.get_json("weather", lat, lon).await
    }

    /// 3-hour forecast series (`GET /forecast`).
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_hourly(&self, lat: f64, lon: f64) -> Result<Forecast, FetchError> {
        self.get_json("forecast", lat, lon).await
    }

    /// Raw series for the daily view (`GET /forecast`), before aggregation.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_daily(&self, lat: f64, lon: f64) -> Result<Forecast, FetchError> {
        self.get_json("forecast", lat, lon).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        lat: f64,
        lon: f64,
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let lang = self.language.language();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", UNITS.to_string()),
                ("lang", lang),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.into_network_error()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.into_network_error()))?;

        if !status.is_success() {
            tracing::warn!("{} returned status {}", endpoint, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(FetchError::EmptyBody);
        }

        tracing::debug!("{} returned {} bytes", endpoint, body.len());
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
