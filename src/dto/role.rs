//! Role transfer shapes.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{NewRole, Role, RoleChanges};

// ============================================================================
// Request DTOs
// ============================================================================

/// Input for creating a role.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateRole {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(min_length = 1, max_length = 100, example = "admin")]
    pub name: String,
    #[validate(length(max = 512, message = "Description must be at most 512 characters"))]
    #[schema(max_length = 512, example = "Full administrative access")]
    pub description: Option<String>,
}

/// Partial update of a role.
///
/// Absent fields are left untouched. An explicit `"description": null`
/// clears the description.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateRole {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(min_length = 1, max_length = 100)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    #[validate(length(max = 512, message = "Description must be at most 512 characters"))]
    #[schema(value_type = Option<String>, nullable, max_length = 512)]
    pub description: Option<Option<String>>,
}

/// Distinguishes a field sent as `null` from a missing one.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<CreateRole> for NewRole {
    fn from(input: CreateRole) -> Self {
        NewRole {
            name: input.name,
            description: input.description,
        }
    }
}

impl From<UpdateRole> for RoleChanges {
    fn from(input: UpdateRole) -> Self {
        RoleChanges {
            name: input.name,
            description: input.description,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Read projection of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "admin")]
    pub name: String,
    pub description: Option<String>,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            description: role.description,
        }
    }
}
