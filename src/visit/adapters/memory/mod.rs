//! In-memory adapter implementations for testing.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! unit testing without database or filesystem dependencies.

mod evidence;
mod visit;

pub use evidence::InMemoryEvidenceStore;
pub use visit::InMemoryVisitRepository;
