//! In-memory adapter implementations for testing.

mod assignment;

pub use assignment::InMemoryRouteAssignmentRepository;
