//! Fieldcall: field-sales visit tracking and route reconciliation core.
//!
//! This crate provides the persistence-backed core of a field-sales and
//! merchandising application: the active-visit session lifecycle, visit
//! record capture with photo evidence, and reconciliation of recurring
//! weekly route plans against logged visits.
//!
//! # Architecture
//!
//! Fieldcall follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, storage)
//!
//! # Modules
//!
//! - [`directory`]: Identity scalars and reference-data lookups
//! - [`visit`]: Visit records, session lifecycle, and evidence uploads
//! - [`route`]: Route assignments and plan-versus-actual reconciliation
//! - [`test_support`]: Clock doubles shared by the test suites

pub mod directory;
pub mod route;
pub mod test_support;
pub mod visit;
