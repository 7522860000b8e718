//! Role CRUD request handlers.
//!
//! Handlers only extract and delegate; the role service decides the envelope
//! and its code, and the envelope decides the HTTP status.

use axum::extract::State;
use serde::Deserialize;
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ROLE_TAG;
use crate::dto::{CreateRole, PageableResponse, ResponseBo, UpdateRole};
use crate::state::AppState;
use crate::utils::extract::{JsonBody, PathParam, QueryParams};

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

/// Query parameters of the role listing.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRolesQuery {
    /// 1-based page number
    #[serde(default = "default_page")]
    #[param(default = 1, minimum = 1)]
    pub page: i64,
    /// Rows per page
    #[serde(default = "default_size")]
    #[param(default = 10, minimum = 1)]
    pub size: i64,
    /// Case-insensitive substring of the role name
    #[serde(rename = "searchKey")]
    pub search_key: Option<String>,
}

/// Creates role-related routes.
///
/// Routes:
/// - GET /roles          - List roles page by page
/// - POST /roles         - Create a role
/// - GET /roles/{id}     - Get role by id
/// - PUT /roles/{id}     - Partially update a role
/// - DELETE /roles/{id}  - Delete a role
pub fn role_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_roles, create_role))
        .routes(routes!(get_role, update_role, delete_role))
}

/// GET /roles - List roles
#[utoipa::path(
    get,
    path = "/roles",
    tag = ROLE_TAG,
    params(ListRolesQuery),
    responses(
        (status = 200, description = "Page of roles; an empty page carries code 204", body = PageableResponse),
        (status = 400, description = "Page or size below 1", body = PageableResponse),
        (status = 500, description = "Store failure", body = PageableResponse)
    )
)]
async fn list_roles(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListRolesQuery>,
) -> PageableResponse {
    state
        .services
        .roles
        .list(query.page, query.size, query.search_key.as_deref())
        .await
}

/// POST /roles - Create role
#[utoipa::path(
    post,
    path = "/roles",
    tag = ROLE_TAG,
    request_body = CreateRole,
    responses(
        (status = 201, description = "Role created", body = ResponseBo),
        (status = 400, description = "Invalid input", body = ResponseBo),
        (status = 409, description = "Name already taken", body = ResponseBo),
        (status = 500, description = "Store failure", body = ResponseBo)
    )
)]
async fn create_role(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateRole>,
) -> ResponseBo {
    state.services.roles.create(payload).await
}

/// GET /roles/{id} - Get role by id
#[utoipa::path(
    get,
    path = "/roles/{id}",
    tag = ROLE_TAG,
    params(("id" = i32, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role found", body = ResponseBo),
        (status = 404, description = "Role not found", body = ResponseBo),
        (status = 500, description = "Store failure", body = ResponseBo)
    )
)]
async fn get_role(State(state): State<AppState>, PathParam(id): PathParam<i32>) -> ResponseBo {
    state.services.roles.get_by_id(id).await
}

/// PUT /roles/{id} - Update role
///
/// Fields left out of the body keep their stored value.
#[utoipa::path(
    put,
    path = "/roles/{id}",
    tag = ROLE_TAG,
    params(("id" = i32, Path, description = "Role id")),
    request_body = UpdateRole,
    responses(
        (status = 200, description = "Role updated", body = ResponseBo),
        (status = 400, description = "Invalid input", body = ResponseBo),
        (status = 404, description = "Role not found", body = ResponseBo),
        (status = 409, description = "Name already taken", body = ResponseBo),
        (status = 500, description = "Store failure", body = ResponseBo)
    )
)]
async fn update_role(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateRole>,
) -> ResponseBo {
    state.services.roles.update(id, payload).await
}

/// DELETE /roles/{id} - Delete role
#[utoipa::path(
    delete,
    path = "/roles/{id}",
    tag = ROLE_TAG,
    params(("id" = i32, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role deleted", body = ResponseBo),
        (status = 404, description = "Role not found", body = ResponseBo),
        (status = 500, description = "Store failure", body = ResponseBo)
    )
)]
async fn delete_role(State(state): State<AppState>, PathParam(id): PathParam<i32>) -> ResponseBo {
    state.services.roles.delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryRoleRepository;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(store: &MemoryRoleRepository) -> Router {
        let (router, _) = role_routes().split_for_parts();
        router.with_state(AppState::in_memory(store.clone()))
    }

    async fn send(
        store: &MemoryRoleRepository,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app(store)
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let store = MemoryRoleRepository::new();

        let (status, body) = send(
            &store,
            Method::POST,
            "/roles",
            Some(json!({"name": "admin", "description": "Full access"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["code"], 201);
        assert_eq!(body["status"], "SUCCESS");
        assert_eq!(body["message"], "Created Successfully");
        assert_eq!(body["data"]["name"], "admin");

        let id = body["data"]["id"].as_i64().unwrap();
        let (status, body) = send(&store, Method::GET, &format!("/roles/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Retrieved Successfully");
        assert_eq!(body["data"]["description"], "Full access");
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let store = MemoryRoleRepository::new();
        send(&store, Method::POST, "/roles", Some(json!({"name": "admin"}))).await;

        let (status, body) =
            send(&store, Method::POST, "/roles", Some(json!({"name": "admin"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "FAILURE");
        assert_eq!(body["message"], "Role 'admin' Already Exists");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request_envelope() {
        let store = MemoryRoleRepository::new();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/roles")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app(&store).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Bad Request");
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let store = MemoryRoleRepository::new();
        let (status, body) = send(&store, Method::GET, "/roles/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_list_pages_and_filters() {
        let store = MemoryRoleRepository::new();
        for name in ["admin", "viewer", "sysadmin"] {
            send(&store, Method::POST, "/roles", Some(json!({"name": name}))).await;
        }

        let (status, body) = send(&store, Method::GET, "/roles?page=1&size=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Records Retrieved Successfully");
        assert_eq!(body["totalElements"], 3);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (_, body) = send(&store, Method::GET, "/roles?searchKey=ADMIN", None).await;
        assert_eq!(body["page"], 1);
        assert_eq!(body["size"], 10);
        assert_eq!(body["totalElements"], 2);
    }

    #[tokio::test]
    async fn test_list_empty_page_keeps_body() {
        let store = MemoryRoleRepository::new();
        let (status, body) = send(&store, Method::GET, "/roles", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 204);
        assert_eq!(body["message"], "No Record Found");
        assert_eq!(body["totalElements"], 0);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_list_rejects_page_zero() {
        let store = MemoryRoleRepository::new();
        let (status, body) = send(&store, Method::GET, "/roles?page=0&size=5", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["page"], 0);
        assert_eq!(body["size"], 5);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_update_clears_description_with_null() {
        let store = MemoryRoleRepository::new();
        send(
            &store,
            Method::POST,
            "/roles",
            Some(json!({"name": "ops", "description": "on call"})),
        )
        .await;

        let (status, body) = send(
            &store,
            Method::PUT,
            "/roles/1",
            Some(json!({"description": null})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Updated Successfully");
        assert_eq!(body["data"]["name"], "ops");
        assert!(body["data"]["description"].is_null());
    }

    #[tokio::test]
    async fn test_update_missing_role_is_not_found() {
        let store = MemoryRoleRepository::new();
        let (status, body) =
            send(&store, Method::PUT, "/roles/9", Some(json!({"name": ""}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Role Not Found");
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let store = MemoryRoleRepository::new();
        send(&store, Method::POST, "/roles", Some(json!({"name": "temp"}))).await;

        let (status, body) = send(&store, Method::DELETE, "/roles/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Deleted Successfully");
        assert!(body["data"].is_null());

        let (status, _) = send(&store, Method::DELETE, "/roles/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_failure_hides_details() {
        let store = MemoryRoleRepository::new();
        store.set_read_failure(true);

        let (status, body) = send(&store, Method::GET, "/roles/1", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An Error Occurred");
    }
}
