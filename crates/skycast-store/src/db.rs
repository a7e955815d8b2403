//! Shared SQLite handle.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};

use crate::error::{StoreError, StoreResult};

const SCHEMA_VERSION: i32 = 1;

/// A SQLite connection shared by all stores.
///
/// Cloning is cheap; every clone refers to the same connection. Queries are
/// serialized by the inner mutex, which is what keeps two writes to the same
/// key from interleaving.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open or create the database at `path`, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Storage(skycast_core::DatabaseError::ConnectionFailed(format!(
                        "Failed to create {}: {}",
                        parent.display(),
                        e
                    )))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        tracing::info!("Opened database at {}", path.display());
        Self::with_connection(conn)
    }

    /// Create an in-memory database. Contents are lost when the last clone drops.
    pub fn in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking thread pool.
    pub(crate) async fn run<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Run `f` against the connection on the current thread.
    ///
    /// Only for startup paths that run before the async runtime is busy.
    pub(crate) fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }
}

fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
        .optional()?
        .unwrap_or(0);

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS favorites (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            city_name TEXT NOT NULL,
            description TEXT NOT NULL,
            current_temp REAL NOT NULL,
            min_temp REAL NOT NULL,
            max_temp REAL NOT NULL,
            pressure INTEGER NOT NULL,
            humidity INTEGER NOT NULL,
            wind_speed REAL NOT NULL,
            clouds INTEGER NOT NULL,
            sunrise INTEGER NOT NULL,
            sunset INTEGER NOT NULL,
            date TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            animation INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_favorites_city ON favorites(city_name);

        CREATE TABLE IF NOT EXISTS preferences (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS alarms (
            alarm_id INTEGER PRIMARY KEY,
            time_millis INTEGER NOT NULL
        );
        "#,
    )?;

    if version < SCHEMA_VERSION {
        conn.execute("DELETE FROM schema_version", [])?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [SCHEMA_VERSION],
        )?;
        tracing::debug!("Database schema at version {}", SCHEMA_VERSION);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn table_names(db: &Database) -> Vec<String> {
        db.run_blocking(|conn| {
            let mut stmt =
                conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(names)
        })
        .unwrap()
    }

    #[test]
    fn test_in_memory_creates_schema() {
        let db = Database::in_memory().unwrap();
        let names = table_names(&db);
        for table in ["alarms", "favorites", "preferences", "schema_version"] {
            assert!(names.iter().any(|n| n == table), "missing table {}", table);
        }
    }

    #[test]
    fn test_open_creates_parent_dirs_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("skycast.db");

        let db = Database::open(&path).unwrap();
        db.run_blocking(|conn| {
            conn.execute(
                "INSERT INTO preferences (key, value) VALUES ('Language', 'ar')",
                [],
            )?;
            Ok(())
        })
        .unwrap();
        drop(db);

        let reopened = Database::open(&path).unwrap();
        let value: String = reopened
            .run_blocking(|conn| {
                Ok(conn.query_row(
                    "SELECT value FROM preferences WHERE key = 'Language'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(value, "ar");
    }

    #[tokio::test]
    async fn test_run_executes_on_blocking_pool() {
        let db = Database::in_memory().unwrap();
        let count: i64 = db
            .run(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM favorites", [], |r| r.get(0))?))
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
