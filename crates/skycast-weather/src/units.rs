//! Unit conversion for display.
//!
//! Everything is fetched and stored in Celsius and m/s; these helpers convert
//! at the edge. Unit names that don't parse fall back to the canonical unit
//! instead of failing.

use serde::{Deserialize, Serialize};

/// 1 m/s expressed in mph.
pub const MPS_TO_MPH: f64 = 2.23694;

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    /// Parse a stored unit name. Unknown names yield `Celsius`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Celsius" => Self::Celsius,
            "Fahrenheit" => Self::Fahrenheit,
            "Kelvin" => Self::Kelvin,
            _ => Self::Celsius,
        }
    }

    /// Name as persisted in preferences.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Celsius => "Celsius",
            Self::Fahrenheit => "Fahrenheit",
            Self::Kelvin => "Kelvin",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
            Self::Kelvin => "K",
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wind speed unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WindSpeedUnit {
    #[default]
    MetersPerSecond,
    MilesPerHour,
}

impl WindSpeedUnit {
    /// Parse a stored unit name. Unknown names yield `MetersPerSecond`.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "Meter/Second" => Some(Self::MetersPerSecond),
            "Miles/Hour" => Some(Self::MilesPerHour),
            _ => None,
        }
    }

    /// Name as persisted in preferences.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MetersPerSecond => "Meter/Second",
            Self::MilesPerHour => "Miles/Hour",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::MetersPerSecond => "m/s",
            Self::MilesPerHour => "mph",
        }
    }
}

impl std::fmt::Display for WindSpeedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a Celsius temperature to `target`.
pub fn convert_temperature(celsius: f64, target: TemperatureUnit) -> f64 {
    match target {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        TemperatureUnit::Kelvin => celsius + 273.15,
    }
}

/// Like [`convert_temperature`] with the unit given by name; unknown names leave the value as is.
pub fn convert_temperature_named(celsius: f64, target: &str) -> f64 {
    convert_temperature(celsius, TemperatureUnit::from_name(target))
}

pub fn temperature_symbol(unit: TemperatureUnit) -> &'static str {
    unit.symbol()
}

/// Symbol for a unit name; unknown names give "C".
pub fn temperature_symbol_named(unit: &str) -> &'static str {
    TemperatureUnit::from_name(unit).symbol()
}

pub fn wind_speed_symbol(unit: WindSpeedUnit) -> &'static str {
    unit.symbol()
}

/// Convert a wind speed between units.
pub fn convert_wind_speed(speed: f64, from: WindSpeedUnit, to: WindSpeedUnit) -> f64 {
    match (from, to) {
        (WindSpeedUnit::MetersPerSecond, WindSpeedUnit::MilesPerHour) => speed * MPS_TO_MPH,
        (WindSpeedUnit::MilesPerHour, WindSpeedUnit::MetersPerSecond) => speed / MPS_TO_MPH,
        _ => speed,
    }
}

/// Like [`convert_wind_speed`] with units given by name.
///
/// If either name is unrecognised the speed passes through unchanged.
pub fn convert_wind_speed_named(speed: f64, from: &str, to: &str) -> f64 {
    match (WindSpeedUnit::parse(from), WindSpeedUnit::parse(to)) {
        (Some(from), Some(to)) => convert_wind_speed(speed, from, to),
        _ => speed,
    }
}

/// Format a Celsius temperature for display in `unit`, e.g. `25°C`.
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{:.0}°{}", convert_temperature(celsius, unit), unit.symbol())
}
