//! Shared error vocabulary for SkyCast.
//!
//! The weather and storage crates keep their own error enums and collapse
//! into [`NetworkError`] or [`DatabaseError`] at the edge. [`AppError`] is what
//! a front end sees, and [`AppError::user_message`] is what it shows.

use thiserror::Error;

/// Anything the presentation layer may have to report.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// The config file was readable but its values were rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Short, non-technical text suitable for a toast or banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Database(e) => e.user_message(),
            AppError::InvalidConfig(_) => "SkyCast settings are invalid. Check your config file.",
            AppError::Other(_) => "Something went wrong. Please try again.",
        }
    }
}

/// Failures talking to the weather API.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Could not reach the weather service: {0}")]
    ConnectionFailed(String),

    #[error("Weather request timed out")]
    Timeout,

    #[error("Weather service returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Unreadable weather response: {0}")]
    InvalidResponse(String),

    #[error("Weather service sent an empty response")]
    EmptyResponse,
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => "You appear to be offline. Showing saved locations.",
            NetworkError::Timeout => "Weather is taking too long to load. Please try again.",
            NetworkError::ServerError { status: 401, .. } => {
                "Weather API key is invalid. Check settings."
            }
            NetworkError::ServerError { status: 404, .. } => "No weather found for this location.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "Weather could not be loaded. Please try again.",
            NetworkError::InvalidResponse(_) | NetworkError::EmptyResponse => {
                "Weather data could not be read. Please try again."
            }
        }
    }
}

/// Failures in the local SQLite store.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Could not open database: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Database is corrupt: {0}")]
    Corruption(String),

    #[error("Disk full: {0}")]
    Full(String),
}

impl DatabaseError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed(_) => {
                "Unable to access saved locations. Try restarting the app."
            }
            DatabaseError::QueryFailed(_) => "Your change could not be saved. Please try again.",
            DatabaseError::Corruption(_) => {
                "Saved locations are damaged. Clearing app data may help."
            }
            DatabaseError::Full(_) => "The device is out of storage space.",
        }
    }
}

/// Classify a `reqwest` failure.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            return NetworkError::Timeout;
        }
        if let Some(status) = self.status() {
            return NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            };
        }
        if self.is_decode() || self.is_body() {
            return NetworkError::InvalidResponse(self.to_string());
        }
        NetworkError::ConnectionFailed(self.to_string())
    }
}

/// Classify a `rusqlite` failure by its SQLite result code.
pub trait RusqliteErrorExt {
    fn into_database_error(self) -> DatabaseError;
}

impl RusqliteErrorExt for rusqlite::Error {
    fn into_database_error(self) -> DatabaseError {
        use rusqlite::ErrorCode;

        let code = match &self {
            rusqlite::Error::SqliteFailure(e, _) => Some(e.code),
            _ => None,
        };
        let message = self.to_string();
        match code {
            Some(ErrorCode::DiskFull) => DatabaseError::Full(message),
            Some(ErrorCode::DatabaseCorrupt | ErrorCode::NotADatabase) => {
                DatabaseError::Corruption(message)
            }
            Some(ErrorCode::CannotOpen) => DatabaseError::ConnectionFailed(message),
            _ => DatabaseError::QueryFailed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_converts() {
        let app_err: AppError = NetworkError::Timeout.into();
        assert!(matches!(app_err, AppError::Network(NetworkError::Timeout)));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Database(DatabaseError::Full("disk".into()));
        assert_eq!(app_err.user_message(), "The device is out of storage space.");

        let offline = AppError::Network(NetworkError::ConnectionFailed("dns".into()));
        assert!(offline.user_message().contains("offline"));
    }

    #[test]
    fn test_server_error_messages_by_status() {
        let server_error = |status| NetworkError::ServerError {
            status,
            message: String::new(),
        };
        assert!(server_error(503).user_message().contains("try again later"));
        assert!(server_error(401).user_message().contains("API key"));
        assert!(server_error(404).user_message().contains("location"));
        assert!(server_error(429).user_message().contains("could not be loaded"));
    }

    #[test]
    fn test_rusqlite_error_classification() {
        let full = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
            None,
        );
        assert!(matches!(full.into_database_error(), DatabaseError::Full(_)));

        let corrupt = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CORRUPT),
            None,
        );
        assert!(matches!(corrupt.into_database_error(), DatabaseError::Corruption(_)));

        let missing = rusqlite::Error::QueryReturnedNoRows;
        assert!(matches!(missing.into_database_error(), DatabaseError::QueryFailed(_)));
    }

    #[test]
    fn test_invalid_config_message() {
        let err = AppError::InvalidConfig("api.timeout_secs: must be > 0".into());
        assert!(err.to_string().contains("api.timeout_secs"));
        assert!(err.user_message().contains("config"));
    }
}
