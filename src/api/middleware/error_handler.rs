//! Error rendering for the HTTP surface.
//!
//! `AppError` renders as the same failure envelope the role service produces,
//! and [`global_error_handler`] rewrites the plain-text errors axum generates
//! itself (unknown route, wrong method) into that shape too.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::dto::{ResponseBo, StatusMessage};
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            tracing::debug!(error = %self, "Request rejected");
        } else {
            tracing::error!(error = ?self, "Request failed");
        }
        ResponseBo::from_error(&self).into_response()
    }
}

/// Picks the envelope message for an error status produced outside a handler.
pub fn status_message(status: StatusCode) -> StatusMessage {
    match status {
        StatusCode::NOT_FOUND => StatusMessage::NotFound {
            entity: "Resource".to_string(),
        },
        StatusCode::METHOD_NOT_ALLOWED => StatusMessage::MethodNotAllowed,
        StatusCode::UNSUPPORTED_MEDIA_TYPE => StatusMessage::UnsupportedMediaType,
        StatusCode::SERVICE_UNAVAILABLE => StatusMessage::ServiceUnavailable,
        status if status.is_client_error() => StatusMessage::BadRequest,
        _ => StatusMessage::InternalServerError,
    }
}

/// Global error handling middleware.
///
/// Error responses that are already JSON pass through untouched; anything
/// else is replaced by a failure envelope.
pub async fn global_error_handler(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));
    if is_json {
        return response;
    }

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap_or_default();
    tracing::debug!(
        status = status.as_u16(),
        original = %String::from_utf8_lossy(&body).trim(),
        "Rewriting error response"
    );

    ResponseBo::new(status_message(status), None).into_response()
}
