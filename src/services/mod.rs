//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod role_service;

pub use role_service::RoleService;

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since the underlying stores are shared behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub roles: RoleService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories) -> Self {
        Self {
            roles: RoleService::new(repos.roles),
        }
    }
}
