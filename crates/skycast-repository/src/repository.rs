//! Single entry point over the remote API and the local stores.
//!
//! Every method forwards to exactly one collaborator. Nothing is cached here
//! and failed fetches are returned as-is; falling back to saved favorites when
//! offline is up to the caller.

use skycast_core::AppError;
use skycast_store::{
    AlarmStore, FavoritesStore, FavoritesSubscription, PreferenceStore, StoreError, Subscription,
};
use skycast_weather::{
    aggregate_daily, CurrentWeather, DailyForecast, FetchError, Forecast, TemperatureUnit,
    WeatherAlarm, WeatherClient, WeatherSnapshot, WindSpeedUnit,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Fetch(e) => AppError::Network(e.into_network_error()),
            RepositoryError::Storage(e) => AppError::Database(e.into_database_error()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Clone)]
pub struct WeatherRepository {
    client: WeatherClient,
    preferences: PreferenceStore,
    favorites: FavoritesStore,
    alarms: AlarmStore,
}

impl WeatherRepository {
    pub fn new(
        client: WeatherClient,
        preferences: PreferenceStore,
        favorites: FavoritesStore,
        alarms: AlarmStore,
    ) -> Self {
        Self {
            client,
            preferences,
            favorites,
            alarms,
        }
    }

    // Remote

    pub async fn fetch_current_weather(&self, lat: f64, lon: f64) -> RepositoryResult<CurrentWeather> {
        Ok(self.client.fetch_current(lat, lon).await?)
    }

    pub async fn fetch_hourly_forecast(&self, lat: f64, lon: f64) -> RepositoryResult<Forecast> {
        Ok(self.client.fetch_hourly(lat, lon).await?)
    }

    /// One summary per local calendar day, earliest first.
    pub async fn fetch_daily_forecast(&self, lat: f64, lon: f64) -> RepositoryResult<DailyForecast> {
        let forecast = self.client.fetch_daily(lat, lon).await?;
        let days = aggregate_daily(&forecast.list);
        tracing::debug!(
            "Aggregated {} samples into {} days",
            forecast.list.len(),
            days.len()
        );
        Ok(DailyForecast {
            city: forecast.city,
            days,
        })
    }

    // Preferences

    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.preferences.temperature_unit()
    }

    pub async fn set_temperature_unit(&self, unit: TemperatureUnit) -> RepositoryResult<()> {
        Ok(self.preferences.set_temperature_unit(unit).await?)
    }

    pub fn wind_speed_unit(&self) -> WindSpeedUnit {
        self.preferences.wind_speed_unit()
    }

    pub async fn set_wind_speed_unit(&self, unit: WindSpeedUnit) -> RepositoryResult<()> {
        Ok(self.preferences.set_wind_speed_unit(unit).await?)
    }

    pub fn notification_preference(&self) -> bool {
        self.preferences.notifications_enabled()
    }

    pub async fn set_notification_preference(&self, enabled: bool) -> RepositoryResult<()> {
        Ok(self.preferences.set_notifications_enabled(enabled).await?)
    }

    pub async fn save_location(&self, latitude: f64, longitude: f64) -> RepositoryResult<()> {
        Ok(self.preferences.save_location(latitude, longitude).await?)
    }

    pub fn location(&self) -> Option<(f64, f64)> {
        self.preferences.location()
    }

    pub fn language(&self) -> String {
        self.preferences.language()
    }

    pub async fn set_language(&self, language: &str) -> RepositoryResult<()> {
        Ok(self.preferences.set_language(language).await?)
    }

    // Favorites

    pub async fn insert_weather(&self, snapshot: WeatherSnapshot) -> RepositoryResult<()> {
        Ok(self.favorites.insert(snapshot).await?)
    }

    /// Live view of all favorites.
    pub async fn all_weather_data(&self) -> RepositoryResult<FavoritesSubscription> {
        Ok(self.favorites.subscribe().await?)
    }

    pub async fn weather_list(&self) -> RepositoryResult<Vec<WeatherSnapshot>> {
        Ok(self.favorites.list_all().await?)
    }

    pub async fn delete_weather(&self, snapshot: &WeatherSnapshot) -> RepositoryResult<bool> {
        Ok(self.favorites.delete(snapshot).await?)
    }

    pub async fn weather_city(&self, city_name: &str) -> RepositoryResult<Option<WeatherSnapshot>> {
        Ok(self.favorites.find_by_city(city_name).await?)
    }

    // Alarms

    pub async fn set_alarm(&self, alarm: WeatherAlarm) -> RepositoryResult<()> {
        Ok(self.alarms.set_alarm(alarm).await?)
    }

    pub async fn alarms(&self) -> RepositoryResult<Vec<WeatherAlarm>> {
        Ok(self.alarms.list().await?)
    }

    pub async fn all_alarms(&self) -> RepositoryResult<Subscription<WeatherAlarm>> {
        Ok(self.alarms.subscribe().await?)
    }

    pub async fn delete_alarm(&self, alarm_id: i32) -> RepositoryResult<bool> {
        Ok(self.alarms.delete_alarm(alarm_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::{DatabaseError, NetworkError};

    #[test]
    fn test_fetch_error_becomes_network_app_error() {
        let err = RepositoryError::from(FetchError::Status {
            status: 500,
            message: "boom".into(),
        });
        assert!(err.to_string().starts_with("fetch failed"));

        let app: AppError = err.into();
        assert!(matches!(
            app,
            AppError::Network(NetworkError::ServerError { status: 500, .. })
        ));
        assert!(app.user_message().contains("weather service"));
    }

    #[test]
    fn test_store_error_becomes_database_app_error() {
        let err = RepositoryError::from(StoreError::Storage(DatabaseError::Full("disk".into())));
        let app: AppError = err.into();
        assert!(matches!(app, AppError::Database(DatabaseError::Full(_))));
    }
}
