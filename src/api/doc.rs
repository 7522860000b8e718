use utoipa::OpenApi;

pub const ROLE_TAG: &str = "Role";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Role Management API",
        description = "API for managing roles",
        version = "1.0.11",
        license(name = "Apache 2.0", url = "https://www.apache.org/licenses/LICENSE-2.0.html"),
    ),
    components(
        schemas(
            crate::dto::ResponseStatus,
            crate::dto::RoleDto,
        )
    ),
    tags(
        (name = ROLE_TAG, description = "Role management endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
