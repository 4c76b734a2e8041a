//! The JSON envelope shared by every API response.
//!
//! Responses take the form:
//!
//! ```json
//! {
//!   "meta": { "message": "Campaign created successfully", "code": 201, "status": "success" },
//!   "data": { ... }
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether the request succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The request succeeded.
    Success,
    /// The request failed, see the message for why.
    Error,
}

/// Describes the outcome of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// A human readable summary of the outcome.
    pub message: String,
    /// The HTTP status code, repeated in the body for clients that only look at the body.
    pub code: u16,
    /// Whether the request succeeded.
    pub status: ResponseStatus,
}

/// The response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// The outcome of the request.
    pub meta: Meta,
    /// The payload, if any.
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a response for a request that succeeded.
    pub fn success(status_code: StatusCode, message: &str, data: T) -> Self {
        Self {
            meta: Meta {
                message: message.to_owned(),
                code: status_code.as_u16(),
                status: ResponseStatus::Success,
            },
            data: Some(data),
        }
    }

    /// Create a response for a request that failed.
    pub fn error(status_code: StatusCode, message: &str, data: Option<T>) -> Self {
        Self {
            meta: Meta {
                message: message.to_owned(),
                code: status_code.as_u16(),
                status: ResponseStatus::Error,
            },
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.meta.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status_code, Json(self)).into_response()
    }
}

/// The error detail attached to failed requests, e.g. `{"errors": "not authorized"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// A description of what went wrong.
    pub errors: String,
}

impl From<&Error> for ErrorDetails {
    fn from(error: &Error) -> Self {
        Self {
            errors: error.to_string(),
        }
    }
}

/// The data returned by the image upload endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadStatus {
    /// Whether the image was saved.
    pub is_uploaded: bool,
}

/// Shortcut for a successful [ApiResponse] converted into a [Response].
pub fn success_response<T: Serialize>(status_code: StatusCode, message: &str, data: T) -> Response {
    ApiResponse::success(status_code, message, data).into_response()
}

/// Shortcut for a failed [ApiResponse] converted into a [Response].
pub fn error_response<T: Serialize>(
    status_code: StatusCode,
    message: &str,
    data: Option<T>,
) -> Response {
    ApiResponse::error(status_code, message, data).into_response()
}

/// A failed [ApiResponse] with a message chosen by the endpoint.
///
/// The error's description is included as [ErrorDetails] for client errors. Server errors are
/// logged and their details are withheld.
pub fn endpoint_error_response(error: &Error, status_code: StatusCode, message: &str) -> Response {
    if status_code.is_server_error() {
        tracing::error!("{message}: {error}");
        return error_response(status_code, message, None::<ErrorDetails>);
    }

    error_response(status_code, message, Some(ErrorDetails::from(error)))
}
