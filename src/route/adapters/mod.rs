//! Adapter implementations of the route planning ports.

pub mod memory;
pub mod postgres;
