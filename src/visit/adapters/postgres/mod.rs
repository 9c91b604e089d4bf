//! `PostgreSQL` adapters for visit record persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresVisitRepository, VisitPgPool};
