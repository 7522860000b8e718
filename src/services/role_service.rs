//! Role service for business logic operations.
//!
//! Every public operation opens exactly one unit of work, commits it when the
//! operation succeeds and rolls it back otherwise. Failures never escape as
//! errors: they are logged and turned into a failure envelope.

use std::sync::Arc;

use validator::Validate;

use crate::dto::{CreateRole, PageableResponse, ResponseBo, RoleDto, StatusMessage, UpdateRole};
use crate::error::{AppError, AppResult};
use crate::models::{NewRole, Role, RoleChanges};
use crate::repositories::{RoleSession, UnitOfWork};

const ENTITY: &str = "Role";

fn role_not_found(role_id: i32) -> AppError {
    AppError::not_found(ENTITY, "id", role_id)
}

fn already_exists(role_name: &str) -> AppError {
    AppError::duplicate(ENTITY, "name", role_name)
}

/// Maps a store-level uniqueness violation onto the same conflict the
/// name check reports, so both sides of a check-then-write race look alike.
fn remap_conflict(error: AppError, role_name: &str) -> AppError {
    match error {
        AppError::Duplicate { .. } => already_exists(role_name),
        other => other,
    }
}

fn log_failure(operation: &str, error: &AppError) {
    if error.is_client_error() {
        tracing::warn!(operation, error = %error, "Role operation rejected");
    } else {
        tracing::error!(operation, error = ?error, "Role operation failed");
    }
}

/// Commits on success and rolls back on failure.
///
/// A failed rollback is only logged: the session is dropped right after, and
/// an unfinished transaction is never persisted.
async fn finish<T>(mut session: Box<dyn RoleSession>, outcome: AppResult<T>) -> AppResult<T> {
    match outcome {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = session.rollback().await {
                tracing::warn!(error = %rollback_error, "Rollback failed");
            }
            Err(error)
        }
    }
}

async fn create_in(session: &mut dyn RoleSession, input: CreateRole) -> AppResult<Role> {
    if session.name_taken(&input.name, None).await? {
        return Err(already_exists(&input.name));
    }

    let role_name = input.name.clone();
    session
        .insert(&NewRole::from(input))
        .await
        .map_err(|e| remap_conflict(e, &role_name))
}

async fn update_in(
    session: &mut dyn RoleSession,
    role_id: i32,
    input: UpdateRole,
) -> AppResult<Role> {
    let existing = session
        .find_by_id(role_id)
        .await?
        .ok_or_else(|| role_not_found(role_id))?;

    input.validate()?;

    if let Some(role_name) = &input.name {
        if session.name_taken(role_name, Some(role_id)).await? {
            return Err(already_exists(role_name));
        }
    }

    let changes = RoleChanges::from(input);
    if changes.is_empty() {
        return Ok(existing);
    }

    let role_name = changes.name.clone().unwrap_or(existing.name);
    session
        .update(role_id, &changes)
        .await
        .map_err(|e| remap_conflict(e, &role_name))
}

async fn get_in(session: &mut dyn RoleSession, role_id: i32) -> AppResult<Role> {
    session
        .find_by_id(role_id)
        .await?
        .ok_or_else(|| role_not_found(role_id))
}

async fn delete_in(session: &mut dyn RoleSession, role_id: i32) -> AppResult<()> {
    if session.find_by_id(role_id).await?.is_none() {
        return Err(role_not_found(role_id));
    }
    match session.delete(role_id).await? {
        0 => Err(role_not_found(role_id)),
        _ => Ok(()),
    }
}

async fn list_in(
    session: &mut dyn RoleSession,
    search_key: Option<&str>,
    offset: i64,
    limit: i64,
) -> AppResult<(Vec<Role>, i64)> {
    let rows = session.search(search_key, offset, limit).await?;
    if rows.is_empty() {
        return Ok((rows, 0));
    }
    let total = session.count(search_key).await?;
    Ok((rows, total))
}

/// Role service over an abstract unit of work.
///
/// Cloning is cheap: the unit of work is shared behind an `Arc`.
#[derive(Clone)]
pub struct RoleService {
    uow: Arc<dyn UnitOfWork>,
}

impl RoleService {
    /// Creates a new RoleService over the given unit of work.
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    /// Creates a role.
    ///
    /// # Returns
    /// - 201 with the stored role
    /// - 400 when the input is invalid
    /// - 409 when the name is already taken
    /// - 500 on store failure
    pub async fn create(&self, input: CreateRole) -> ResponseBo {
        let outcome: AppResult<Role> = async {
            input.validate()?;
            let mut session = self.uow.begin().await?;
            let outcome = create_in(session.as_mut(), input).await;
            finish(session, outcome).await
        }
        .await;

        match outcome {
            Ok(role) => {
                tracing::info!(role_id = role.id, role_name = %role.name, "Role created");
                ResponseBo::new(StatusMessage::Created, Some(RoleDto::from(role)))
            }
            Err(error) => {
                log_failure("create", &error);
                ResponseBo::from_error(&error)
            }
        }
    }

    /// Applies a partial update to a role.
    ///
    /// A missing role answers 404 before the input is even validated.
    pub async fn update(&self, role_id: i32, input: UpdateRole) -> ResponseBo {
        let outcome: AppResult<Role> = async {
            let mut session = self.uow.begin().await?;
            let outcome = update_in(session.as_mut(), role_id, input).await;
            finish(session, outcome).await
        }
        .await;

        match outcome {
            Ok(role) => {
                tracing::info!(role_id, role_name = %role.name, "Role updated");
                ResponseBo::new(StatusMessage::Updated, Some(RoleDto::from(role)))
            }
            Err(error) => {
                log_failure("update", &error);
                ResponseBo::from_error(&error)
            }
        }
    }

    /// Fetches one role by id.
    pub async fn get_by_id(&self, role_id: i32) -> ResponseBo {
        let outcome: AppResult<Role> = async {
            let mut session = self.uow.begin().await?;
            let outcome = get_in(session.as_mut(), role_id).await;
            finish(session, outcome).await
        }
        .await;

        match outcome {
            Ok(role) => ResponseBo::new(StatusMessage::Retrieved, Some(RoleDto::from(role))),
            Err(error) => {
                log_failure("get", &error);
                ResponseBo::from_error(&error)
            }
        }
    }

    /// Lists roles page by page.
    ///
    /// # Arguments
    /// * `page` - 1-based page number
    /// * `size` - Rows per page
    /// * `search_key` - Optional case-insensitive name filter; empty means none
    ///
    /// # Returns
    /// 200 with the page, 204 when the page is empty, 400 for a page or size
    /// below 1, 500 on store failure. Failures echo `page` and `size`.
    pub async fn list(&self, page: i64, size: i64, search_key: Option<&str>) -> PageableResponse {
        if page < 1 || size < 1 {
            tracing::warn!(page, size, "Rejected list request with invalid paging");
            return PageableResponse::failure(StatusMessage::BadRequest, page, size);
        }

        let search_key = search_key.filter(|key| !key.is_empty());
        let offset = (page - 1).saturating_mul(size);
        let outcome: AppResult<(Vec<Role>, i64)> = async {
            let mut session = self.uow.begin().await?;
            let outcome = list_in(session.as_mut(), search_key, offset, size).await;
            finish(session, outcome).await
        }
        .await;

        match outcome {
            Ok((rows, _)) if rows.is_empty() => {
                PageableResponse::page(StatusMessage::NoRecordFound, page, size, 0, Vec::new())
            }
            Ok((rows, total)) => {
                tracing::debug!(page, size, total, "Roles listed");
                let data = rows.into_iter().map(RoleDto::from).collect();
                PageableResponse::page(StatusMessage::RecordsRetrieved, page, size, total, data)
            }
            Err(error) => {
                log_failure("list", &error);
                PageableResponse::failure(StatusMessage::from(&error), page, size)
            }
        }
    }

    /// Deletes a role; the lookup, delete and commit form one transaction.
    pub async fn delete(&self, role_id: i32) -> ResponseBo {
        let outcome: AppResult<()> = async {
            let mut session = self.uow.begin().await?;
            let outcome = delete_in(session.as_mut(), role_id).await;
            finish(session, outcome).await
        }
        .await;

        match outcome {
            Ok(()) => {
                tracing::info!(role_id, "Role deleted");
                ResponseBo::new(StatusMessage::Deleted, None)
            }
            Err(error) => {
                log_failure("delete", &error);
                ResponseBo::from_error(&error)
            }
        }
    }

    /// Checks that the backing store answers.
    pub async fn ping(&self) -> AppResult<()> {
        self.uow.ping().await
    }
}
