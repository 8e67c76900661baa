//! Common test utilities and helpers
//!
//! This module provides shared functionality used across integration tests:
//! - Binary path resolution (via `get_extbuild_binary`)
//! - Project fixtures and a recording command runner (via `helpers`)

pub(crate) mod helpers;

// Re-export get_extbuild_binary for convenient access
#[allow(unused_imports)]
pub(crate) use helpers::get_extbuild_binary;
