//! Repository layer for data access operations.
//!
//! The role service only sees the [`UnitOfWork`] trait; the PostgreSQL and
//! in-memory backends both implement it.

mod memory;
mod role_repo;
mod unit_of_work;

pub use memory::MemoryRoleRepository;
pub use role_repo::RoleRepository;
pub use unit_of_work::{RoleSession, UnitOfWork};

use std::sync::Arc;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// Cloning is cheap: every field is reference counted.
#[derive(Clone)]
pub struct Repositories {
    pub roles: Arc<dyn UnitOfWork>,
}

impl Repositories {
    /// Creates the PostgreSQL-backed repositories.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            roles: Arc::new(RoleRepository::new(pool)),
        }
    }

    /// Creates repositories over an in-memory store.
    pub fn in_memory(roles: MemoryRoleRepository) -> Self {
        Self {
            roles: Arc::new(roles),
        }
    }
}
