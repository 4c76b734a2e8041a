//! The response for requests that do not match any route.

use axum::{http::StatusCode, response::Response};

use crate::response::{ErrorDetails, error_response};

/// The fallback handler for unknown routes.
pub async fn get_404_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found", None::<ErrorDetails>)
}
