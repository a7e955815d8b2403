//! Key/value user preferences.
//!
//! Reads are served from memory and never fail; a missing or unreadable value
//! yields the documented default. Writes go to SQLite and the in-memory copy
//! under the same lock, so a completed write is visible to the next read.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rusqlite::params;
use skycast_weather::client::{LanguageSource, DEFAULT_LANGUAGE};
use skycast_weather::units::{TemperatureUnit, WindSpeedUnit};

use crate::db::Database;
use crate::error::StoreResult;

/// Preference keys as persisted.
pub mod keys {
    pub const LANGUAGE: &str = "Language";
    pub const TEMPERATURE_UNIT: &str = "TempUnit";
    pub const WIND_SPEED_UNIT: &str = "wind_speed_unit";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const NOTIFICATIONS: &str = "notifications_enabled";
}

#[derive(Clone)]
pub struct PreferenceStore {
    db: Database,
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("entries", &self.values.read().len())
            .finish()
    }
}

impl PreferenceStore {
    /// Load all stored preferences from `db`.
    pub fn open(db: Database) -> StoreResult<Self> {
        let values = db.run_blocking(|conn| {
            let mut stmt = conn.prepare("SELECT key, value FROM preferences")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                .collect::<Result<HashMap<_, _>, _>>()?;
            Ok(rows)
        })?;

        tracing::debug!("Loaded {} preferences", values.len());
        Ok(Self {
            db,
            values: Arc::new(RwLock::new(values)),
        })
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .read()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    pub async fn put_string(&self, key: &str, value: &str) -> StoreResult<()> {
        self.put_all(vec![(key.to_string(), value.to_string())]).await
    }

    /// Write several keys in one transaction.
    async fn put_all(&self, entries: Vec<(String, String)>) -> StoreResult<()> {
        let values = self.values.clone();
        self.db
            .run(move |conn| {
                let tx = conn.unchecked_transaction()?;
                for (key, value) in &entries {
                    tx.execute(
                        "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                        params![key, value],
                    )?;
                }
                tx.commit()?;

                let mut values = values.write();
                for (key, value) in entries {
                    tracing::debug!("Preference {} = {}", key, value);
                    values.insert(key, value);
                }
                Ok(())
            })
            .await
    }

    /// Defaults to Celsius; unknown stored names also read as Celsius.
    pub fn temperature_unit(&self) -> TemperatureUnit {
        TemperatureUnit::from_name(
            &self.get_string(keys::TEMPERATURE_UNIT, TemperatureUnit::Celsius.as_str()),
        )
    }

    pub async fn set_temperature_unit(&self, unit: TemperatureUnit) -> StoreResult<()> {
        self.put_string(keys::TEMPERATURE_UNIT, unit.as_str()).await
    }

    /// Defaults to m/s.
    pub fn wind_speed_unit(&self) -> WindSpeedUnit {
        WindSpeedUnit::from_name(
            &self.get_string(keys::WIND_SPEED_UNIT, WindSpeedUnit::MetersPerSecond.as_str()),
        )
    }

    pub async fn set_wind_speed_unit(&self, unit: WindSpeedUnit) -> StoreResult<()> {
        self.put_string(keys::WIND_SPEED_UNIT, unit.as_str()).await
    }

    /// Defaults to enabled.
    pub fn notifications_enabled(&self) -> bool {
        self.get_string(keys::NOTIFICATIONS, "true") != "false"
    }

    pub async fn set_notifications_enabled(&self, enabled: bool) -> StoreResult<()> {
        self.put_string(keys::NOTIFICATIONS, if enabled { "true" } else { "false" })
            .await
    }

    pub async fn save_location(&self, latitude: f64, longitude: f64) -> StoreResult<()> {
        self.put_all(vec![
            (keys::LATITUDE.to_string(), latitude.to_string()),
            (keys::LONGITUDE.to_string(), longitude.to_string()),
        ])
        .await
    }

    /// The last saved location, or `None` if it was never saved.
    ///
    /// Presence is checked per key, so `(0.0, 0.0)` is a real location.
    pub fn location(&self) -> Option<(f64, f64)> {
        let values = self.values.read();
        let latitude = values.get(keys::LATITUDE)?.parse::<f64>().ok()?;
        let longitude = values.get(keys::LONGITUDE)?.parse::<f64>().ok()?;
        Some((latitude, longitude))
    }

    /// Defaults to `"en"`.
    pub fn language(&self) -> String {
        self.get_string(keys::LANGUAGE, DEFAULT_LANGUAGE)
    }

    pub async fn set_language(&self, language: &str) -> StoreResult<()> {
        self.put_string(keys::LANGUAGE, language).await
    }
}

impl LanguageSource for PreferenceStore {
    fn language(&self) -> String {
        PreferenceStore::language(self)
    }
}
