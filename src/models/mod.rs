mod role;

pub use role::{NewRole, Role, RoleChanges};
