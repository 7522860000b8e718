//! In-memory role unit of work.
//!
//! Sessions are serialized through an owned mutex guard and work on a staged
//! copy of the table that only replaces the shared one on commit. The unique
//! name rule is enforced on insert and update the same way the `roles_name_key`
//! constraint is in PostgreSQL. Faults can be injected to exercise the
//! failure paths of the service.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{AppError, AppResult};
use crate::models::{NewRole, Role, RoleChanges};
use crate::repositories::{RoleSession, UnitOfWork};

#[derive(Debug, Clone, Default)]
struct RoleTable {
    rows: BTreeMap<i32, Role>,
    last_id: i32,
}

#[derive(Debug, Default)]
struct Faults {
    reads: AtomicBool,
    writes: AtomicBool,
    stale_name_check: AtomicBool,
}

#[derive(Clone, Default)]
pub struct MemoryRoleRepository {
    table: Arc<Mutex<RoleTable>>,
    faults: Arc<Faults>,
}

impl MemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every read fail with a database error.
    pub fn set_read_failure(&self, enabled: bool) {
        self.faults.reads.store(enabled, Ordering::SeqCst);
    }

    /// Makes every insert, update and delete fail with a database error.
    pub fn set_write_failure(&self, enabled: bool) {
        self.faults.writes.store(enabled, Ordering::SeqCst);
    }

    /// Makes `name_taken` always answer `false`, as if a concurrent writer
    /// inserted the name between the check and the write.
    pub fn set_stale_name_check(&self, enabled: bool) {
        self.faults.stale_name_check.store(enabled, Ordering::SeqCst);
    }

    /// Committed rows, ordered by id.
    pub async fn snapshot(&self) -> Vec<Role> {
        self.table.lock().await.rows.values().cloned().collect()
    }
}

#[async_trait]
impl UnitOfWork for MemoryRoleRepository {
    async fn begin(&self) -> AppResult<Box<dyn RoleSession>> {
        let guard = self.table.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryRoleSession {
            guard,
            staged,
            faults: self.faults.clone(),
        }))
    }

    async fn ping(&self) -> AppResult<()> {
        if self.faults.reads.load(Ordering::SeqCst) {
            return Err(injected("ping"));
        }
        Ok(())
    }
}

fn injected(operation: &str) -> AppError {
    AppError::Database {
        operation: operation.to_string(),
        source: anyhow::anyhow!("injected failure"),
    }
}

fn matches_key(role: &Role, search_key: Option<&str>) -> bool {
    match search_key {
        Some(key) => role.name.to_lowercase().contains(&key.to_lowercase()),
        None => true,
    }
}

struct MemoryRoleSession {
    guard: OwnedMutexGuard<RoleTable>,
    staged: RoleTable,
    faults: Arc<Faults>,
}

impl MemoryRoleSession {
    fn check_read(&self, operation: &str) -> AppResult<()> {
        if self.faults.reads.load(Ordering::SeqCst) {
            return Err(injected(operation));
        }
        Ok(())
    }

    fn check_write(&self, operation: &str) -> AppResult<()> {
        if self.faults.writes.load(Ordering::SeqCst) {
            return Err(injected(operation));
        }
        Ok(())
    }

    fn ensure_unique(&self, role_name: &str, exclude_id: Option<i32>) -> AppResult<()> {
        let clash = self
            .staged
            .rows
            .values()
            .any(|role| role.name == role_name && Some(role.id) != exclude_id);
        if clash {
            return Err(AppError::duplicate("roles", "name", role_name));
        }
        Ok(())
    }
}

#[async_trait]
impl RoleSession for MemoryRoleSession {
    async fn find_by_id(&mut self, role_id: i32) -> AppResult<Option<Role>> {
        self.check_read("find role")?;
        Ok(self.staged.rows.get(&role_id).cloned())
    }

    async fn name_taken(&mut self, role_name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        self.check_read("check role name")?;
        if self.faults.stale_name_check.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self.ensure_unique(role_name, exclude_id).is_err())
    }

    async fn insert(&mut self, new_role: &NewRole) -> AppResult<Role> {
        self.check_write("insert role")?;
        self.ensure_unique(&new_role.name, None)?;

        self.staged.last_id += 1;
        let role = Role {
            id: self.staged.last_id,
            name: new_role.name.clone(),
            description: new_role.description.clone(),
        };
        self.staged.rows.insert(role.id, role.clone());
        Ok(role)
    }

    async fn update(&mut self, role_id: i32, changes: &RoleChanges) -> AppResult<Role> {
        self.check_write("update role")?;
        if let Some(role_name) = &changes.name {
            self.ensure_unique(role_name, Some(role_id))?;
        }

        let role = self
            .staged
            .rows
            .get_mut(&role_id)
            .ok_or_else(|| AppError::not_found("Role", "id", role_id))?;
        changes.apply_to(role);
        Ok(role.clone())
    }

    async fn delete(&mut self, role_id: i32) -> AppResult<usize> {
        self.check_write("delete role")?;
        Ok(usize::from(self.staged.rows.remove(&role_id).is_some()))
    }

    async fn search(
        &mut self,
        search_key: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Role>> {
        self.check_read("search roles")?;
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .staged
            .rows
            .values()
            .filter(|role| matches_key(role, search_key))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&mut self, search_key: Option<&str>) -> AppResult<i64> {
        self.check_read("count roles")?;
        let total = self
            .staged
            .rows
            .values()
            .filter(|role| matches_key(role, search_key))
            .count();
        Ok(total as i64)
    }

    async fn commit(&mut self) -> AppResult<()> {
        *self.guard = self.staged.clone();
        Ok(())
    }

    async fn rollback(&mut self) -> AppResult<()> {
        self.staged = self.guard.clone();
        Ok(())
    }
}
