//! Extractors whose rejections are [`AppError`]s.
//!
//! Malformed bodies, query strings and path segments are reported with the
//! same envelope as every other failure instead of axum's plain-text bodies.

use crate::error::{AppError, AppResult};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

/// JSON request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// Query string parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(QueryParams(value))
    }
}

/// Path segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParam<T>(pub T);

impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(PathParam(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
        description: Option<String>,
    }

    fn json_request(body: &str, content_type: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/roles")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_json_body() {
        let request = json_request(r#"{"name": "admin"}"#, "application/json");
        let JsonBody(payload) = JsonBody::<Payload>::from_request(request, &()).await.unwrap();

        assert_eq!(payload.name, "admin");
        assert_eq!(payload.description, None);
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let request = json_request(r#"{"description": "x"}"#, "application/json");
        let result = JsonBody::<Payload>::from_request(request, &()).await;

        match result {
            Err(AppError::BadRequest { message }) => assert!(message.contains("name")),
            other => panic!("Expected BadRequest error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() {
        let request = json_request(r#"{"name": "#, "application/json");
        let result = JsonBody::<Payload>::from_request(request, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_wrong_content_type_is_bad_request() {
        let request = json_request(r#"{"name": "admin"}"#, "text/plain");
        let result = JsonBody::<Payload>::from_request(request, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        page: Option<i64>,
    }

    #[tokio::test]
    async fn test_query_params() {
        let request = Request::builder().uri("/roles?page=3").body(Body::empty()).unwrap();
        let (mut parts, _) = request.into_parts();
        let QueryParams(paging) = QueryParams::<Paging>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(paging.page, Some(3));

        let request = Request::builder().uri("/roles?page=abc").body(Body::empty()).unwrap();
        let (mut parts, _) = request.into_parts();
        let result = QueryParams::<Paging>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }
}
