//! Error translation at the HTTP boundary
//!
//! Handlers and extractors fail with [`ApiError`]. Its `IntoResponse` impl
//! picks the status and body, logs datastore failures, and attaches the
//! [`ErrorEnvelope`] to the response. The [`translate_errors`] middleware then
//! stamps the envelope with the request path and the response time.
//! Responses without an envelope (unmatched routes, method mismatches, body
//! limit rejections, caught panics) pass through untouched.

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::repository::StoreError;
use crate::validation::{Violation, Violations};

/// Request-level failure
#[derive(Debug, Error)]
pub enum ApiError {
    /// Payload or query rejected before reaching the service
    #[error("validation failed: {0}")]
    Validation(Violations),

    /// Datastore failure reported by the repository
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<Violations> for ApiError {
    fn from(violations: Violations) -> Self {
        ApiError::Validation(violations)
    }
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(err) => match err {
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::UniqueViolation { .. } => StatusCode::CONFLICT,
                StoreError::ForeignKeyViolation | StoreError::InvalidReference => {
                    StatusCode::BAD_REQUEST
                }
                StoreError::Unknown { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Client-facing message; never includes driver detail
    pub fn message(&self) -> String {
        match self {
            Self::Validation(_) => "Validation failed".to_string(),
            Self::Store(err) => match err {
                StoreError::NotFound => "Resource not found".to_string(),
                StoreError::UniqueViolation { field } => format!(
                    "A record with this {} already exists",
                    field.as_deref().unwrap_or("field")
                ),
                StoreError::ForeignKeyViolation => {
                    "Invalid reference to related resource".to_string()
                }
                StoreError::InvalidReference => "Invalid ID provided".to_string(),
                StoreError::Unknown { .. } => "An unexpected error occurred".to_string(),
            },
        }
    }

    /// Unstamped envelope for this error
    pub fn envelope(&self) -> ErrorEnvelope {
        let status = self.status();
        ErrorEnvelope {
            status_code: status.as_u16(),
            message: self.message(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            violations: match self {
                Self::Validation(violations) => Some(violations.iter().cloned().collect()),
                Self::Store(_) => None,
            },
            timestamp: None,
            path: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Store(err) => {
                tracing::error!(code = %err.code(), "Datastore error: {} - {}", err.code(), err);
            }
            Self::Validation(violations) => {
                tracing::debug!(fields = ?violations.fields(), "Request rejected: {}", violations);
            }
        }

        let envelope = self.envelope();
        let mut response = (self.status(), Json(&envelope)).into_response();
        response.extensions_mut().insert(envelope);
        response
    }
}

/// JSON body of every error response this service produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub message: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorEnvelope {
    /// Record where and when the error was answered
    #[must_use]
    pub fn stamped(mut self, path: impl Into<String>) -> Self {
        self.timestamp = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        self.path = Some(path.into());
        self
    }
}

/// Render any attached [`ErrorEnvelope`] with its `timestamp` and `path`
pub async fn translate_errors(request: Request, next: Next) -> Response {
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let mut response = next.run(request).await;

    let Some(envelope) = response.extensions_mut().remove::<ErrorEnvelope>() else {
        return response;
    };

    match serde_json::to_vec(&envelope.stamped(path)) {
        Ok(body) => {
            response.headers_mut().remove(header::CONTENT_LENGTH);
            *response.body_mut() = Body::from(body);
            response
        }
        Err(e) => {
            tracing::warn!("Failed to stamp error envelope: {}", e);
            response
        }
    }
}
