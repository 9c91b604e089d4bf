//! Reference data shared by the visit and route contexts.
//!
//! The directory holds the read-only master data the field workflows lean
//! on: customers, assignees, districts, and the catalogue of no-visit
//! reasons. Visit capture and route reconciliation both consume this data
//! through the [`ports::DirectoryLookup`] port; neither mutates it. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
