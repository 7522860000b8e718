//! Transfer shapes shared by the service layer and the HTTP surface.

mod envelope;
mod role;

pub use envelope::{PageableResponse, ResponseBo, ResponseStatus, StatusMessage, total_pages};
pub use role::{CreateRole, RoleDto, UpdateRole};
