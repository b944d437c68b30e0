//! Adapter implementations of the project repository port.

pub mod memory;
pub mod postgres;
