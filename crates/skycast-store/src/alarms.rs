//! Scheduled weather alarms.

use rusqlite::{params, Connection};
use skycast_weather::types::WeatherAlarm;
use tokio::sync::broadcast;

use crate::db::Database;
use crate::error::StoreResult;
use crate::subscription::{Subscription, UPDATE_CAPACITY};

/// Alarms keyed by `alarm_id`, listed by trigger time.
#[derive(Clone)]
pub struct AlarmStore {
    db: Database,
    updates: broadcast::Sender<Vec<WeatherAlarm>>,
}

impl std::fmt::Debug for AlarmStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmStore").finish_non_exhaustive()
    }
}

impl AlarmStore {
    pub fn new(db: Database) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        Self { db, updates }
    }

    /// Create an alarm or move an existing one to a new time.
    pub async fn set_alarm(&self, alarm: WeatherAlarm) -> StoreResult<()> {
        let updates = self.updates.clone();
        self.db
            .run(move |conn| {
                conn.execute(
                    "INSERT INTO alarms (alarm_id, time_millis) VALUES (?1, ?2)
                     ON CONFLICT(alarm_id) DO UPDATE SET time_millis = excluded.time_millis",
                    params![alarm.alarm_id, alarm.time_millis],
                )?;
                tracing::info!("Alarm {} set for {}", alarm.alarm_id, alarm.time_millis);
                publish(conn, &updates)
            })
            .await
    }

    /// Returns `false` if no alarm had that id.
    pub async fn delete_alarm(&self, alarm_id: i32) -> StoreResult<bool> {
        let updates = self.updates.clone();
        self.db
            .run(move |conn| {
                let removed = conn.execute("DELETE FROM alarms WHERE alarm_id = ?1", [alarm_id])?;
                if removed == 0 {
                    return Ok(false);
                }
                tracing::info!("Alarm {} removed", alarm_id);
                publish(conn, &updates)?;
                Ok(true)
            })
            .await
    }

    pub async fn list(&self) -> StoreResult<Vec<WeatherAlarm>> {
        self.db.run(query_all).await
    }

    pub async fn subscribe(&self) -> StoreResult<Subscription<WeatherAlarm>> {
        let updates = self.updates.clone();
        self.db
            .run(move |conn| {
                let receiver = updates.subscribe();
                Ok(Subscription::new(query_all(conn)?, receiver))
            })
            .await
    }
}

fn query_all(conn: &Connection) -> StoreResult<Vec<WeatherAlarm>> {
    let mut stmt =
        conn.prepare("SELECT alarm_id, time_millis FROM alarms ORDER BY time_millis, alarm_id")?;
    let alarms = stmt
        .query_map([], |row| {
            Ok(WeatherAlarm {
                alarm_id: row.get(0)?,
                time_millis: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(alarms)
}

fn publish(conn: &Connection, updates: &broadcast::Sender<Vec<WeatherAlarm>>) -> StoreResult<()> {
    if updates.receiver_count() > 0 {
        let _ = updates.send(query_all(conn)?);
    }
    Ok(())
}
