//! Request ID middleware for request tracing.
//!
//! Every request gets an identifier, taken from `X-Request-ID`, then from
//! `X-Worker-ID` (sent by older clients), or freshly generated.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Legacy correlation header, accepted when no request ID is sent.
pub const WORKER_ID_HEADER: &str = "x-worker-id";

/// Request ID stored in request extensions for downstream access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

fn incoming_id(request: &Request) -> Option<String> {
    [REQUEST_ID_HEADER, WORKER_ID_HEADER]
        .iter()
        .filter_map(|name| request.headers().get(*name))
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(String::from)
}

/// Middleware that ensures every request has a unique request ID.
///
/// The ID is stored in the request extensions and echoed in the
/// `x-request-id` response header.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = incoming_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use axum::{Extension, Router, middleware};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(id): Extension<RequestId>| async move { id.0 }),
            )
            .layer(middleware::from_fn(request_id_middleware))
    }

    async fn call(headers: &[(&str, &str)]) -> (String, String) {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (header, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_propagates_request_id() {
        let (header, seen) = call(&[(REQUEST_ID_HEADER, "req-123")]).await;
        assert_eq!(header, "req-123");
        assert_eq!(seen, "req-123");
    }

    #[tokio::test]
    async fn test_falls_back_to_worker_id() {
        let (header, _) = call(&[(WORKER_ID_HEADER, "worker-7")]).await;
        assert_eq!(header, "worker-7");

        let (header, _) = call(&[(WORKER_ID_HEADER, "worker-7"), (REQUEST_ID_HEADER, "req-1")]).await;
        assert_eq!(header, "req-1");
    }

    #[tokio::test]
    async fn test_generates_uuid_when_missing() {
        let (header, seen) = call(&[]).await;
        assert_eq!(header, seen);
        assert!(Uuid::parse_str(&header).is_ok());
    }
}
