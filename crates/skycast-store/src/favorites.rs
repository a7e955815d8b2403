//! Saved weather snapshots ("favorites").
//!
//! Rows have no identity beyond their contents. Inserting the same snapshot
//! twice keeps two rows, and deleting removes one row equal to the argument.

use rusqlite::{params, Connection, OptionalExtension, Row};
use skycast_weather::types::WeatherSnapshot;
use tokio::sync::broadcast;

use crate::db::Database;
use crate::error::StoreResult;
use crate::subscription::{Subscription, UPDATE_CAPACITY};

const SELECT_COLUMNS: &str = "SELECT city_name, description, current_temp, min_temp, max_temp, \
     pressure, humidity, wind_speed, clouds, sunrise, sunset, date, latitude, longitude, animation \
     FROM favorites";

/// Live view of the favorites list.
pub type FavoritesSubscription = Subscription<WeatherSnapshot>;

/// Persistent favorites with live full-list updates.
#[derive(Clone)]
pub struct FavoritesStore {
    db: Database,
    updates: broadcast::Sender<Vec<WeatherSnapshot>>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("subscribers", &self.updates.receiver_count())
            .finish()
    }
}

impl FavoritesStore {
    pub fn new(db: Database) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        Self { db, updates }
    }

    /// Store a snapshot. Duplicates are kept.
    pub async fn insert(&self, snapshot: WeatherSnapshot) -> StoreResult<()> {
        let updates = self.updates.clone();
        self.db
            .run(move |conn| {
                conn.execute(
                    "INSERT INTO favorites (city_name, description, current_temp, min_temp, max_temp,
                         pressure, humidity, wind_speed, clouds, sunrise, sunset, date,
                         latitude, longitude, animation)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                    params![
                        snapshot.city_name,
                        snapshot.description,
                        snapshot.current_temp,
                        snapshot.min_temp,
                        snapshot.max_temp,
                        snapshot.pressure,
                        snapshot.humidity,
                        snapshot.wind_speed,
                        snapshot.clouds,
                        snapshot.sunrise,
                        snapshot.sunset,
                        snapshot.date,
                        snapshot.latitude,
                        snapshot.longitude,
                        snapshot.animation,
                    ],
                )?;
                tracing::info!("Saved favorite {}", snapshot.city_name);
                publish(conn, &updates)
            })
            .await
    }

    /// All favorites in insertion order.
    pub async fn list_all(&self) -> StoreResult<Vec<WeatherSnapshot>> {
        self.db.run(query_all).await
    }

    /// Remove one row equal to `snapshot`.
    ///
    /// The oldest matching row goes first. Returns `false` when nothing matched,
    /// in which case subscribers are not notified.
    pub async fn delete(&self, snapshot: &WeatherSnapshot) -> StoreResult<bool> {
        let snapshot = snapshot.clone();
        let updates = self.updates.clone();
        self.db
            .run(move |conn| {
                let removed = conn.execute(
                    "DELETE FROM favorites WHERE id = (
                         SELECT id FROM favorites
                         WHERE city_name = ?1 AND description = ?2 AND current_temp = ?3
                           AND min_temp = ?4 AND max_temp = ?5 AND pressure = ?6
                           AND humidity = ?7 AND wind_speed = ?8 AND clouds = ?9
                           AND sunrise = ?10 AND sunset = ?11 AND date = ?12
                           AND latitude = ?13 AND longitude = ?14 AND animation = ?15
                         ORDER BY id
                         LIMIT 1)",
                    params![
                        snapshot.city_name,
                        snapshot.description,
                        snapshot.current_temp,
                        snapshot.min_temp,
                        snapshot.max_temp,
                        snapshot.pressure,
                        snapshot.humidity,
                        snapshot.wind_speed,
                        snapshot.clouds,
                        snapshot.sunrise,
                        snapshot.sunset,
                        snapshot.date,
                        snapshot.latitude,
                        snapshot.longitude,
                        snapshot.animation,
                    ],
                )?;

                if removed == 0 {
                    tracing::debug!("No favorite matched {}", snapshot.city_name);
                    return Ok(false);
                }

                tracing::info!("Removed favorite {}", snapshot.city_name);
                publish(conn, &updates)?;
                Ok(true)
            })
            .await
    }

    /// The first favorite (in insertion order) whose city name matches exactly.
    pub async fn find_by_city(&self, city_name: &str) -> StoreResult<Option<WeatherSnapshot>> {
        let city_name = city_name.to_string();
        self.db
            .run(move |conn| {
                let snapshot = conn
                    .query_row(
                        &format!("{SELECT_COLUMNS} WHERE city_name = ?1 ORDER BY id LIMIT 1"),
                        [city_name],
                        row_to_snapshot,
                    )
                    .optional()?;
                Ok(snapshot)
            })
            .await
    }

    /// Subscribe to the favorites list.
    ///
    /// The first item is the current list; each mutation afterwards yields the
    /// complete new list.
    pub async fn subscribe(&self) -> StoreResult<FavoritesSubscription> {
        let updates = self.updates.clone();
        self.db
            .run(move |conn| {
                // Both happen under the connection lock, so no mutation can fall
                // between the snapshot and the first update.
                let receiver = updates.subscribe();
                let initial = query_all(conn)?;
                Ok(Subscription::new(initial, receiver))
            })
            .await
    }
}

fn query_all(conn: &Connection) -> StoreResult<Vec<WeatherSnapshot>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
    let rows = stmt
        .query_map([], row_to_snapshot)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn publish(conn: &Connection, updates: &broadcast::Sender<Vec<WeatherSnapshot>>) -> StoreResult<()> {
    if updates.receiver_count() == 0 {
        return Ok(());
    }
    let list = query_all(conn)?;
    // A send only fails when every receiver is gone.
    let _ = updates.send(list);
    Ok(())
}

fn row_to_snapshot(row: &Row) -> rusqlite::Result<WeatherSnapshot> {
    Ok(WeatherSnapshot {
        city_name: row.get(0)?,
        description: row.get(1)?,
        current_temp: row.get(2)?,
        min_temp: row.get(3)?,
        max_temp: row.get(4)?,
        pressure: row.get(5)?,
        humidity: row.get(6)?,
        wind_speed: row.get(7)?,
        clouds: row.get(8)?,
        sunrise: row.get(9)?,
        sunset: row.get(10)?,
        date: row.get(11)?,
        latitude: row.get(12)?,
        longitude: row.get(13)?,
        animation: row.get(14)?,
    })
}
