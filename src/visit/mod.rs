//! Visit capture for field assignees.
//!
//! This module implements the visit half of the field workflow: starting a
//! visit session from the daily plan, saving the visit form (outcome,
//! notes, evidence photos) exactly once per customer per day, and ending
//! the session with a recorded duration. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
