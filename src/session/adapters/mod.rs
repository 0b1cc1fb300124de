//! Adapter implementations for session storage.

pub mod memory;
