//! Adapter implementations for the identity directory.

pub mod memory;
pub mod postgres;
