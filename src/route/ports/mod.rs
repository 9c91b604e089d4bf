//! Port contracts for route planning.
//!
//! Ports define infrastructure-agnostic interfaces used by route services.

pub mod repository;

pub use repository::{
    AssignmentQuery, RouteAssignmentRepository, RouteRepositoryError, RouteRepositoryResult,
};
