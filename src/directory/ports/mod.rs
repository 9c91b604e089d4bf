//! Port contracts for reference-data lookup.
//!
//! Ports define infrastructure-agnostic interfaces used by the visit and
//! route services.

pub mod lookup;

pub use lookup::{DirectoryLookup, DirectoryLookupError, DirectoryResult};
