//! Unit-of-work contract between the role service and the store.
//!
//! A service operation calls [`UnitOfWork::begin`] once, performs all of its
//! reads and writes through the returned [`RoleSession`], and then either
//! commits or rolls back. A session dropped without `commit` never persists
//! its writes, so early returns and panics leave the store untouched.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{NewRole, Role, RoleChanges};

/// Factory for transactional role sessions.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Opens a session with a transaction already started.
    async fn begin(&self) -> AppResult<Box<dyn RoleSession>>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// One open transaction over the roles table.
#[async_trait]
pub trait RoleSession: Send {
    async fn find_by_id(&mut self, role_id: i32) -> AppResult<Option<Role>>;

    /// Whether a role other than `exclude_id` already holds `role_name`.
    ///
    /// The comparison is exact and case-sensitive.
    async fn name_taken(&mut self, role_name: &str, exclude_id: Option<i32>) -> AppResult<bool>;

    /// Inserts a role and returns it with its store-assigned id.
    async fn insert(&mut self, new_role: &NewRole) -> AppResult<Role>;

    async fn update(&mut self, role_id: i32, changes: &RoleChanges) -> AppResult<Role>;

    /// Returns the number of deleted rows (0 or 1).
    async fn delete(&mut self, role_id: i32) -> AppResult<usize>;

    /// Loads one page of roles ordered by id.
    ///
    /// # Arguments
    /// * `search_key` - Case-insensitive substring filter on the name
    /// * `offset` - Rows to skip
    /// * `limit` - Maximum rows to return
    async fn search(
        &mut self,
        search_key: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Role>>;

    /// Counts every role matching the filter, ignoring pagination.
    async fn count(&mut self, search_key: Option<&str>) -> AppResult<i64>;

    async fn commit(&mut self) -> AppResult<()>;

    async fn rollback(&mut self) -> AppResult<()>;
}
