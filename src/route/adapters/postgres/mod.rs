//! `PostgreSQL` adapters for route assignment persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresRouteAssignmentRepository, RoutePgPool};
