//! Step definitions for task progress scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
