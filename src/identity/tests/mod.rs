//! Unit tests for the identity directory.
