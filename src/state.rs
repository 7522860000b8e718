//! Application state for Axum web framework.

use crate::db::AsyncDbPool;
use crate::repositories::{MemoryRoleRepository, Repositories};
use crate::services::Services;

/// Shared state handed to every handler through axum's `State` extractor.
///
/// Cloning is cheap since the services hold their stores behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
}

impl AppState {
    /// Builds the PostgreSQL-backed services over `pool`.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            services: Services::new(Repositories::new(pool)),
        }
    }

    /// Builds the services over an in-memory role store.
    pub fn in_memory(roles: MemoryRoleRepository) -> Self {
        Self {
            services: Services::new(Repositories::in_memory(roles)),
        }
    }
}
