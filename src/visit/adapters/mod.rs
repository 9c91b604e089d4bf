//! Adapter implementations of the visit capture ports.

pub mod fs;
pub mod memory;
pub mod postgres;
