//! SkyCast repository
//!
//! The [`WeatherRepository`] facade that the presentation layer talks to, and
//! the [`App`] bootstrap that wires it to storage and the remote API.

pub mod app;
pub mod repository;

pub use app::App;
pub use repository::{RepositoryError, RepositoryResult, WeatherRepository};
pub use skycast_store::Subscription;
