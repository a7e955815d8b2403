use anyhow::{Context, Result};
use std::sync::Arc;

use skycast_core::Config;
use skycast_store::{AlarmStore, Database, FavoritesStore, PreferenceStore};
use skycast_weather::WeatherClient;

use crate::WeatherRepository;

/// Application wiring: one database handle shared by every store.
pub struct App {
    config: Arc<Config>,
    repository: WeatherRepository,
}

impl App {
    /// Open the on-disk database named by `config.storage` and build the repository.
    pub fn new(config: Config) -> Result<Self> {
        let path = config.storage.database_path();
        let database = Database::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Self::with_database(config, database)
    }

    /// Same as [`App::new`] but against an in-memory database.
    pub fn in_memory(config: Config) -> Result<Self> {
        let database = Database::in_memory().context("Failed to open in-memory database")?;
        Self::with_database(config, database)
    }

    fn with_database(config: Config, database: Database) -> Result<Self> {
        let preferences =
            PreferenceStore::open(database.clone()).context("Failed to load preferences")?;
        let favorites = FavoritesStore::new(database.clone());
        let alarms = AlarmStore::new(database.clone());

        // The client reads the language preference on every request.
        let client = WeatherClient::from_config(&config.api, Arc::new(preferences.clone()))
            .context("Failed to create weather client")?;

        tracing::info!("Application initialized with API at {}", config.api.base_url);

        Ok(Self {
            config: Arc::new(config),
            repository: WeatherRepository::new(client, preferences, favorites, alarms),
        })
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &WeatherRepository {
        &self.repository
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[tokio::test]
    async fn test_in_memory_app_starts_empty() {
        let app = App::in_memory(Config::default()).unwrap();
        let repo = app.repository();

        assert!(repo.weather_list().await.unwrap().is_empty());
        assert_eq!(repo.location(), None);
        assert_eq!(repo.language(), "en");
    }

    #[tokio::test]
    async fn test_on_disk_app_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = dir.path().join("data");

        {
            let app = App::new(config.clone()).unwrap();
            app.repository().save_location(30.0444, 31.2357).await.unwrap();
        }

        let app = App::new(config).unwrap();
        assert_eq!(app.repository().location(), Some((30.0444, 31.2357)));
        assert!(app.config().storage.database_path().exists());
    }
}
