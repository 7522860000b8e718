//! HTTP rendering of the response envelopes.
//!
//! The HTTP status mirrors the envelope `code`, except that a 204 envelope is
//! sent with status 200: a 204 response may not carry a body, and the empty
//! listing still has to report its totals.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::dto::{PageableResponse, ResponseBo};

/// Maps an envelope code onto the HTTP status it travels with.
pub fn http_status(code: u16) -> StatusCode {
    match StatusCode::from_u16(code) {
        Ok(StatusCode::NO_CONTENT) => StatusCode::OK,
        Ok(status) => status,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ResponseBo {
    fn into_response(self) -> Response {
        (http_status(self.code), Json(self)).into_response()
    }
}

impl IntoResponse for PageableResponse {
    fn into_response(self) -> Response {
        (http_status(self.code), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::StatusMessage;

    #[test]
    fn test_http_status_mirrors_code() {
        assert_eq!(http_status(201), StatusCode::CREATED);
        assert_eq!(http_status(409), StatusCode::CONFLICT);
        assert_eq!(http_status(500), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_no_content_envelope_keeps_its_body() {
        assert_eq!(http_status(204), StatusCode::OK);

        let response =
            PageableResponse::page(StatusMessage::NoRecordFound, 1, 10, 0, Vec::new()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_out_of_range_code_is_internal_error() {
        assert_eq!(http_status(42), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
