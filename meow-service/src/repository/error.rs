//! Datastore error types
//!
//! Every repository implementation converts its driver errors into
//! [`StoreError`] at the point where they are caught, so nothing above the
//! repository layer ever inspects a driver-specific error.
//!
//! # Example
//!
//! ```rust
//! use meow_service::repository::StoreError;
//!
//! let error = StoreError::unique_violation("name");
//! assert_eq!(error.code(), "unique_violation");
//! assert_eq!(error.to_string(), "unique constraint violated on name");
//! ```

use thiserror::Error;

/// Closed set of datastore failures the HTTP layer knows how to translate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record matched the identifier
    #[error("record not found")]
    NotFound,

    /// A unique constraint rejected the write
    #[error("unique constraint violated on {}", field.as_deref().unwrap_or("unknown field"))]
    UniqueViolation {
        /// API field name the constraint covers, when it could be determined
        field: Option<String>,
    },

    /// A foreign key constraint rejected the write
    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    /// The identifier could not be interpreted by the datastore
    #[error("invalid identifier supplied")]
    InvalidReference,

    /// Anything the datastore reported that has no dedicated variant
    #[error("unclassified datastore error {code}: {message}")]
    Unknown {
        /// SQLSTATE or driver failure label
        code: String,
        /// Driver message, logged but never returned to clients
        message: String,
    },
}

impl StoreError {
    /// Create a unique violation naming `field`
    pub fn unique_violation(field: impl Into<String>) -> Self {
        Self::UniqueViolation {
            field: Some(field.into()),
        }
    }

    /// Create an unclassified error
    pub fn unknown(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unknown {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Stable code used in logs
    ///
    /// Unclassified errors report the datastore's own code.
    pub fn code(&self) -> &str {
        match self {
            Self::NotFound => "not_found",
            Self::UniqueViolation { .. } => "unique_violation",
            Self::ForeignKeyViolation => "foreign_key_violation",
            Self::InvalidReference => "invalid_reference",
            Self::Unknown { code, .. } => code,
        }
    }
}
