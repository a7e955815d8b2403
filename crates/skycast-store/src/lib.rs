//! Local persistence for SkyCast.
//!
//! A single SQLite [`Database`] handle is opened at startup and shared by the
//! preference, favorites and alarm stores.

pub mod alarms;
pub mod db;
pub mod error;
pub mod favorites;
pub mod preferences;
pub mod subscription;

pub use alarms::AlarmStore;
pub use db::Database;
pub use error::{StoreError, StoreResult};
pub use favorites::{FavoritesStore, FavoritesSubscription};
pub use preferences::PreferenceStore;
pub use subscription::Subscription;
