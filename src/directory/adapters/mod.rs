//! Adapter implementations of the directory lookup port.

pub mod memory;
pub mod postgres;
