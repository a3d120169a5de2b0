//! Infrastructure error types
//!
//! These cover startup and operator paths (configuration, I/O, database
//! connection, migrations). Request-level failures are modelled by
//! [`crate::filter::ApiError`].

use thiserror::Error;

use crate::repository::StoreError;

/// Service error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration loaded but is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Database connection could not be established
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Datastore operation failed outside a request
    #[error("Datastore error: {0}")]
    Store(#[from] StoreError),

    /// Embedded migrations failed to apply
    #[error("Migration error: {0}")]
    Migration(Box<sqlx::migrate::MigrateError>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Error::Migration(Box::new(err))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_conversion() {
        let err: Error = StoreError::NotFound.into();
        assert!(matches!(err, Error::Store(StoreError::NotFound)));
        assert_eq!(err.to_string(), "Datastore error: record not found");
    }

    #[test]
    fn test_invalid_config_display() {
        let err = Error::InvalidConfig("missing url".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: missing url");
    }
}
