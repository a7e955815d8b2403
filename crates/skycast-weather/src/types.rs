use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from OpenWeatherMap descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    FewClouds,
    ScatteredClouds,
    BrokenClouds,
    OvercastClouds,
    Rain,
    Snow,
    Thunderstorm,
    Mist,
}

impl WeatherCondition {
    /// Map an API description (e.g. "light rain") to a condition.
    ///
    /// Unknown descriptions default to clear.
    pub fn from_description(description: &str) -> Self {
        match description.trim().to_lowercase().as_str() {
            "clear sky" => Self::Clear,
            "few clouds" => Self::FewClouds,
            "scattered clouds" => Self::ScatteredClouds,
            "broken clouds" => Self::BrokenClouds,
            "overcast clouds" => Self::OvercastClouds,
            "light intensity shower rain" | "light rain" | "moderate rain" => Self::Rain,
            "light snow" | "snow" => Self::Snow,
            "thunderstorm" => Self::Thunderstorm,
            "mist" => Self::Mist,
            _ => Self::Clear,
        }
    }

    /// Opaque animation id stored with saved snapshots.
    pub fn animation_id(&self) -> i32 {
        match self {
            Self::Clear => 1,
            Self::FewClouds => 2,
            Self::ScatteredClouds => 3,
            Self::BrokenClouds => 4,
            Self::OvercastClouds => 5,
            Self::Rain => 6,
            Self::Snow => 7,
            Self::Thunderstorm => 8,
            Self::Mist => 9,
        }
    }
}

/// Geographic coordinates as the API reports them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// One entry of the API's `weather` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConditionInfo {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// The `main` block: temperatures in Celsius (metric units), pressure in hPa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MainInfo {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    #[serde(default)]
    pub pressure: i32,
    #[serde(default)]
    pub humidity: i32,
}

/// Wind speed in m/s, direction in degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

/// Cloud coverage percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Clouds {
    #[serde(default)]
    pub all: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Sys {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// Body of `GET /weather`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub coord: Coord,
    #[serde(default)]
    pub weather: Vec<ConditionInfo>,
    #[serde(default)]
    pub base: String,
    pub main: MainInfo,
    #[serde(default)]
    pub visibility: i32,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub clouds: Clouds,
    pub dt: i64,
    #[serde(default)]
    pub sys: Sys,
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cod: i32,
}

impl CurrentWeather {
    /// The first condition descriptor, if the API sent any.
    pub fn primary_condition(&self) -> Option<&ConditionInfo> {
        self.weather.first()
    }
}

/// A raw 3-hour forecast point from `GET /forecast`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub dt: i64,
    pub main: MainInfo,
    #[serde(default)]
    pub weather: Vec<ConditionInfo>,
    #[serde(default)]
    pub clouds: Clouds,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub visibility: i32,
    /// Probability of precipitation (0-1)
    #[serde(default)]
    pub pop: f64,
    #[serde(default)]
    pub dt_txt: String,
}

/// City block of a forecast response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct City {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub coord: Coord,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// Body of `GET /forecast`: 3-hour samples, typically 5 days x 8
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default, deserialize_with = "de_code")]
    pub cod: String,
    #[serde(default)]
    pub cnt: i32,
    #[serde(default)]
    pub list: Vec<ForecastSample>,
    #[serde(default)]
    pub city: City,
}

/// The forecast API sends `cod` as a string, the current-weather API as a number.
fn de_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Ok(String::new()),
    }
}

/// One aggregated forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Local calendar date the samples were grouped under
    pub date: NaiveDate,
    /// First sample of the day with `temp_min`/`temp_max` replaced by the day's extremes
    pub sample: ForecastSample,
}

impl DaySummary {
    pub fn max_temp(&self) -> f64 {
        self.sample.main.temp_max
    }

    pub fn min_temp(&self) -> f64 {
        self.sample.main.temp_min
    }
}

/// Daily forecast: the city plus one summary per day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub city: City,
    pub days: Vec<DaySummary>,
}

/// A saved favorite location with its conditions at save time.
///
/// Temperatures are Celsius and wind speed is m/s regardless of display preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city_name: String,
    pub description: String,
    pub current_temp: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub pressure: i32,
    pub humidity: i32,
    pub wind_speed: f64,
    pub clouds: i32,
    pub sunrise: i64,
    pub sunset: i64,
    pub date: String,
    pub latitude: f64,
    pub longitude: f64,
    pub animation: i32,
}

impl WeatherSnapshot {
    /// Build a snapshot from a current-weather response.
    ///
    /// `city_name` and the coordinates come from the caller (the place the user
    /// picked), not from the response, which may name a nearby station.
    pub fn from_current(
        weather: &CurrentWeather,
        city_name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        date: impl Into<String>,
    ) -> Self {
        let description = weather
            .primary_condition()
            .map(|c| c.description.clone())
            .unwrap_or_default();
        let animation = WeatherCondition::from_description(&description).animation_id();

        Self {
            city_name: city_name.into(),
            description,
            current_temp: weather.main.temp,
            min_temp: weather.main.temp_min,
            max_temp: weather.main.temp_max,
            pressure: weather.main.pressure,
            humidity: weather.main.humidity,
            wind_speed: weather.wind.speed,
            clouds: weather.clouds.all,
            sunrise: weather.sys.sunrise,
            sunset: weather.sys.sunset,
            date: date.into(),
            latitude,
            longitude,
            animation,
        }
    }
}

/// A stored weather alarm; trigger time in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherAlarm {
    pub alarm_id: i32,
    pub time_millis: i64,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const CURRENT_BODY: &str = r#"{
        "coord": {"lon": 31.2357, "lat": 30.0444},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "base": "stations",
        "main": {"temp": 30.0, "feels_like": 31.2, "temp_min": 25.0, "temp_max": 35.0, "pressure": 1012, "humidity": 50},
        "visibility": 10000,
        "wind": {"speed": 5.0, "deg": 180},
        "clouds": {"all": 10},
        "dt": 1600000000,
        "sys": {"country": "EG", "sunrise": 1600000000, "sunset": 1600040000},
        "timezone": 7200,
        "id": 360630,
        "name": "Cairo",
        "cod": 200
    }"#;

    #[test]
    fn test_condition_from_description() {
        assert_eq!(WeatherCondition::from_description("clear sky"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_description("Light Rain"), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_description("snow"), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_description("mist"), WeatherCondition::Mist);
    }

    #[test]
    fn test_unknown_description_defaults_to_clear() {
        assert_eq!(WeatherCondition::from_description("volcanic ash"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_description(""), WeatherCondition::Clear);
    }

    #[test]
    fn test_decode_current_weather() {
        let weather: CurrentWeather = serde_json::from_str(CURRENT_BODY).unwrap();
        assert_eq!(weather.name, "Cairo");
        assert_eq!(weather.main.pressure, 1012);
        assert_eq!(weather.sys.sunset, 1600040000);
        assert_eq!(weather.primary_condition().unwrap().icon, "01d");
    }

    #[test]
    fn test_decode_forecast_with_string_code() {
        let body = r#"{
            "cod": "200",
            "cnt": 1,
            "list": [{
                "dt": 1700000000,
                "main": {"temp": 12.0, "temp_min": 10.0, "temp_max": 14.0},
                "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
                "dt_txt": "2023-11-14 22:00:00"
            }],
            "city": {"id": 1, "name": "Oslo", "coord": {"lat": 59.9, "lon": 10.7}, "country": "NO"}
        }"#;
        let forecast: Forecast = serde_json::from_str(body).unwrap();
        assert_eq!(forecast.cod, "200");
        assert_eq!(forecast.list.len(), 1);
        assert_eq!(forecast.list[0].main.temp_max, 14.0);
        assert_eq!(forecast.city.name, "Oslo");
    }

    #[test]
    fn test_snapshot_from_current() {
        let weather: CurrentWeather = serde_json::from_str(CURRENT_BODY).unwrap();
        let snapshot = WeatherSnapshot::from_current(&weather, "Cairo", 30.0444, 31.2357, "28 September 2024");

        assert_eq!(snapshot.city_name, "Cairo");
        assert_eq!(snapshot.description, "clear sky");
        assert_eq!(snapshot.current_temp, 30.0);
        assert_eq!(snapshot.max_temp, 35.0);
        assert_eq!(snapshot.clouds, 10);
        assert_eq!(snapshot.animation, WeatherCondition::Clear.animation_id());
    }
}
