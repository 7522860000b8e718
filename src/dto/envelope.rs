//! Uniform response envelopes.
//!
//! Every role operation answers with a [`ResponseBo`] or, for listings, a
//! [`PageableResponse`]. The `code` and `status` fields are derived from a
//! [`StatusMessage`], so a message can never travel with the wrong code.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::RoleDto;
use crate::error::AppError;

/// Outcome marker carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Success,
    Failure,
}

/// Fixed message vocabulary, rendered to text at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Retrieved,
    RecordsRetrieved,
    Created,
    Updated,
    Deleted,
    AlreadyExists { entity: String, value: String },
    NoRecordFound,
    BadRequest,
    NotFound { entity: String },
    InternalServerError,
    MethodNotAllowed,
    UnsupportedMediaType,
    ServiceUnavailable,
}

impl StatusMessage {
    pub fn code(&self) -> u16 {
        match self {
            StatusMessage::Retrieved
            | StatusMessage::RecordsRetrieved
            | StatusMessage::Updated
            | StatusMessage::Deleted => 200,
            StatusMessage::Created => 201,
            StatusMessage::NoRecordFound => 204,
            StatusMessage::BadRequest => 400,
            StatusMessage::NotFound { .. } => 404,
            StatusMessage::MethodNotAllowed => 405,
            StatusMessage::AlreadyExists { .. } => 409,
            StatusMessage::UnsupportedMediaType => 415,
            StatusMessage::InternalServerError => 500,
            StatusMessage::ServiceUnavailable => 503,
        }
    }

    pub fn status(&self) -> ResponseStatus {
        if self.code() < 400 {
            ResponseStatus::Success
        } else {
            ResponseStatus::Failure
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Retrieved => f.write_str("Retrieved Successfully"),
            StatusMessage::RecordsRetrieved => f.write_str("Records Retrieved Successfully"),
            StatusMessage::Created => f.write_str("Created Successfully"),
            StatusMessage::Updated => f.write_str("Updated Successfully"),
            StatusMessage::Deleted => f.write_str("Deleted Successfully"),
            StatusMessage::AlreadyExists { entity, value } => {
                write!(f, "{} '{}' Already Exists", entity, value)
            }
            StatusMessage::NoRecordFound => f.write_str("No Record Found"),
            StatusMessage::BadRequest => f.write_str("Bad Request"),
            StatusMessage::NotFound { entity } => write!(f, "{} Not Found", entity),
            StatusMessage::InternalServerError => f.write_str("An Error Occurred"),
            StatusMessage::MethodNotAllowed => f.write_str("Method Not Allowed"),
            StatusMessage::UnsupportedMediaType => f.write_str("Unsupported File Type"),
            StatusMessage::ServiceUnavailable => f.write_str("Service Unavailable"),
        }
    }
}

impl From<&AppError> for StatusMessage {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::NotFound { entity, .. } => StatusMessage::NotFound {
                entity: entity.clone(),
            },
            AppError::Duplicate { entity, value, .. } => StatusMessage::AlreadyExists {
                entity: entity.clone(),
                value: value.clone(),
            },
            AppError::Validation { .. }
            | AppError::ValidationErrors { .. }
            | AppError::BadRequest { .. } => StatusMessage::BadRequest,
            AppError::Database { .. }
            | AppError::Configuration { .. }
            | AppError::ConnectionPool { .. }
            | AppError::Internal { .. } => StatusMessage::InternalServerError,
        }
    }
}

/// Single-record envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResponseBo {
    #[schema(example = 200)]
    pub code: u16,
    pub status: ResponseStatus,
    #[schema(example = "Retrieved Successfully")]
    pub message: String,
    pub data: Option<RoleDto>,
}

impl ResponseBo {
    pub fn new(message: StatusMessage, data: Option<RoleDto>) -> Self {
        Self {
            code: message.code(),
            status: message.status(),
            message: message.to_string(),
            data,
        }
    }

    /// Failure envelope for an error; internal details never reach the message.
    pub fn from_error(error: &AppError) -> Self {
        Self::new(StatusMessage::from(error), None)
    }
}

/// Paged listing envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageableResponse {
    #[schema(example = 200)]
    pub code: u16,
    pub status: ResponseStatus,
    #[schema(example = "Records Retrieved Successfully")]
    pub message: String,
    #[schema(example = 1)]
    pub page: i64,
    #[schema(example = 10)]
    pub size: i64,
    pub total_pages: i64,
    pub total_elements: i64,
    pub data: Option<Vec<RoleDto>>,
}

impl PageableResponse {
    pub fn page(
        message: StatusMessage,
        page: i64,
        size: i64,
        total_elements: i64,
        data: Vec<RoleDto>,
    ) -> Self {
        Self {
            code: message.code(),
            status: message.status(),
            message: message.to_string(),
            page,
            size,
            total_pages: total_pages(total_elements, size),
            total_elements,
            data: Some(data),
        }
    }

    /// Failure envelope echoing the requested page and size with zero totals.
    pub fn failure(message: StatusMessage, page: i64, size: i64) -> Self {
        Self {
            code: message.code(),
            status: message.status(),
            message: message.to_string(),
            page,
            size,
            total_pages: 0,
            total_elements: 0,
            data: None,
        }
    }
}

/// Number of pages needed for `total` rows at `size` rows per page.
pub fn total_pages(total: i64, size: i64) -> i64 {
    if size <= 0 {
        return 0;
    }
    total / size + i64::from(total % size > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_messages_render_fixed_vocabulary() {
        let exists = StatusMessage::AlreadyExists {
            entity: "Role".to_string(),
            value: "admin".to_string(),
        };
        assert_eq!(exists.to_string(), "Role 'admin' Already Exists");
        assert_eq!(exists.code(), 409);

        let missing = StatusMessage::NotFound {
            entity: "Role".to_string(),
        };
        assert_eq!(missing.to_string(), "Role Not Found");
        assert_eq!(StatusMessage::InternalServerError.to_string(), "An Error Occurred");
        assert_eq!(StatusMessage::NoRecordFound.code(), 204);
        assert_eq!(StatusMessage::NoRecordFound.status(), ResponseStatus::Success);
        assert_eq!(StatusMessage::BadRequest.status(), ResponseStatus::Failure);
    }

    #[test]
    fn test_errors_never_leak_details() {
        let error = AppError::Database {
            operation: "insert role".to_string(),
            source: anyhow::anyhow!("password=hunter2"),
        };
        let envelope = ResponseBo::from_error(&error);

        assert_eq!(envelope.code, 500);
        assert_eq!(envelope.message, "An Error Occurred");
        assert_eq!(envelope.data, None);
    }

    #[test]
    fn test_pageable_serializes_camel_case() {
        let envelope = PageableResponse::failure(StatusMessage::BadRequest, 0, 10);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["status"], "FAILURE");
        assert_eq!(json["totalPages"], 0);
        assert_eq!(json["totalElements"], 0);
        assert_eq!(json["page"], 0);
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_total_pages_examples() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(1, 10), 1);
    }

    proptest! {
        #[test]
        fn test_total_pages_covers_every_row(total in 0i64..1_000_000, size in 1i64..1_000) {
            let pages = total_pages(total, size);
            prop_assert!(pages * size >= total);
            prop_assert!(pages == 0 || (pages - 1) * size < total);
        }
    }
}
