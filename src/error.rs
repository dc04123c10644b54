//! Hub error types with HTTP status code mapping.
//!
//! [`HubError`] is the central error type for the hub. Each variant maps
//! to a numeric code and an HTTP status. The same code/message pair is
//! sent to WebSocket clients inside `error` frames.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ConnectionId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "room not found: movie1"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Hub error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server          | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Inbound frame or body could not be decoded.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Room identifier is empty or contains a path separator.
    #[error("invalid room id: {0:?}")]
    InvalidRoomId(String),

    /// Subscription target is not a `/topic/...` destination.
    #[error("invalid topic: {0}")]
    InvalidTopic(String),

    /// Room with the given ID does not exist.
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// Connection was never registered or has already been dropped.
    #[error("unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    /// No route is registered for the inbound destination.
    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HubError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MalformedFrame(_) => 1001,
            Self::InvalidRoomId(_) => 1002,
            Self::InvalidTopic(_) => 1003,
            Self::RoomNotFound(_) => 2001,
            Self::UnknownConnection(_) => 2002,
            Self::UnknownDestination(_) => 2003,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedFrame(_) | Self::InvalidRoomId(_) | Self::InvalidTopic(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::RoomNotFound(_) | Self::UnknownConnection(_) | Self::UnknownDestination(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the serializable body shared by REST and WebSocket errors.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.error_code(),
            message: self.to_string(),
            details: None,
        }
    }
}

impl From<serde_json::Error> for HubError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedFrame(err.to_string())
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_body(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
