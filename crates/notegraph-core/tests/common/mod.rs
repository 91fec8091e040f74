//! Common test utilities for integration tests.
//!
//! Provides a temporary on-disk vault builder and an in-memory document
//! source with injectable read failures.

#![allow(dead_code)]

pub mod memory_source;
pub mod vault;

pub use memory_source::MemorySource;
pub use vault::TestVault;
