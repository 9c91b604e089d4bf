//! `PostgreSQL` adapters for directory reference data.

mod models;
mod repository;
mod schema;

pub use repository::{DirectoryPgPool, PostgresDirectory};
