mod app_error;
mod constraint_parser;
mod database_converter;

pub use app_error::{AppError, AppResult, ValidationFieldError};
pub use constraint_parser::ConstraintParser;
pub use database_converter::DatabaseErrorConverter;
