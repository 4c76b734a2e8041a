//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The maximum number of characters of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Multipart bodies (image uploads) are not logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let request = if is_multipart(&parts.headers) {
        tracing::info!("Received request: {parts:#?}\nbody: <multipart>");
        Request::from_parts(parts, body)
    } else {
        let body_bytes = match read_body(body).await {
            Ok(bytes) => bytes,
            Err(response) => return response,
        };
        log_body("Received request", &parts, &body_bytes);
        Request::from_parts(parts, Body::from(body_bytes))
    };

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match read_body(body).await {
        Ok(bytes) => bytes,
        Err(response) => return response,
    };
    log_body("Sending response", &parts, &body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("multipart/"))
}

async fn read_body(body: Body) -> Result<Bytes, Response> {
    axum::body::to_bytes(body, usize::MAX).await.map_err(|error| {
        tracing::error!("Could not read body for logging: {error}");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

fn log_body(event: &str, parts: &impl std::fmt::Debug, body: &[u8]) {
    let body = String::from_utf8_lossy(body);

    match body.char_indices().nth(LOG_BODY_LENGTH_LIMIT) {
        Some((end, _)) => {
            tracing::info!("{event}: {parts:#?}\nbody: {}...", &body[..end]);
            tracing::debug!("Full body: {body:?}");
        }
        None => tracing::info!("{event}: {parts:#?}\nbody: {body:?}"),
    }
}
