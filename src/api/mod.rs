//! HTTP surface: handlers, middleware, OpenAPI document and router.

pub mod doc;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
