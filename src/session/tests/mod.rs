//! Unit tests for the session gate.
