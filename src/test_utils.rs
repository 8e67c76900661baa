//! Shared test utilities for extbuild tests
//!
//! Provides a command runner that records what it is asked to run instead of
//! launching anything, plus small project fixtures.
