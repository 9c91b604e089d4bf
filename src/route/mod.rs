//! Route planning and plan-versus-actual reconciliation.
//!
//! This module implements the reporting half of the field workflow: weekly
//! route assignments recur on an ISO day-of-week, a calendar window expands
//! them into planned stops, and logged visits are left-joined onto the plan
//! so every stop reads completed, no-visit, or pending. The module follows
//! hexagonal architecture:
//!
//! - Domain types and pure join steps in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
