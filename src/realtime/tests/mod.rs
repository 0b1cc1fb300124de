//! Unit tests for realtime fan-out and presence.
